//! Voucher command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use perkly_core::{Catalog, Voucher, VoucherId, ViewQuery, resolve_logo};

use crate::cli::{OutputFormat, VouchersArgs, VouchersCommand};
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, Render};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VoucherRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Voucher")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Points")]
    points: u32,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&Arc<Voucher>> for VoucherRow {
    fn from(v: &Arc<Voucher>) -> Self {
        Self {
            id: v.id.to_string(),
            brand: v.brand_name.clone(),
            name: v.voucher_name.clone(),
            value: v.voucher_value.clone(),
            points: v.primary_points(),
            category: v.category.clone(),
        }
    }
}

/// Voucher plus the logo URL a viewer should actually load.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoucherDetail<'a> {
    #[serde(flatten)]
    voucher: &'a Voucher,
    resolved_logo_url: String,
}

fn detail(d: &VoucherDetail<'_>, color: bool) -> String {
    let v = d.voucher;
    let mut lines = vec![
        format!("ID:       {}", v.id),
        format!("Brand:    {}", v.brand_name),
        format!("Voucher:  {}", v.voucher_name),
        format!("Value:    {}", v.voucher_value),
        format!("Category: {}", v.category),
        format!("Logo:     {}", d.resolved_logo_url),
        "Redeem with:".to_owned(),
    ];
    for tier in &v.point_tiers {
        lines.push(format!(
            "  {}  {}",
            output::points(tier.points, color),
            output::dim(&format!("({})", tier.code), color)
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    catalog: &Catalog,
    args: VouchersArgs,
    cfg: &Config,
    render: Render,
) -> Result<(), CliError> {
    match args.command {
        VouchersCommand::List { category, sort } => {
            let query = ViewQuery::new(
                category.unwrap_or_else(|| cfg.defaults.category.clone()),
                sort.unwrap_or_else(|| cfg.defaults.sort.clone()),
            );
            tracing::debug!(filter = %query.filter, sort = %query.sort, "listing vouchers");

            let vouchers = catalog.view(&query);
            let out = output::render_list(
                render.format,
                &vouchers,
                output::EMPTY_VOUCHERS,
                |v| VoucherRow::from(v),
                |v| v.id.to_string(),
            );
            output::print_output(&out, render.quiet);
            Ok(())
        }

        VouchersCommand::Get { id } => {
            let voucher = lookup(catalog, &id)?;
            let placeholder = perkly_config::placeholder_logo(cfg)?;
            let data = VoucherDetail {
                resolved_logo_url: resolve_logo(&voucher.brand_logo_url, &placeholder).to_string(),
                voucher: &voucher,
            };
            let out = output::render_single(
                render.format,
                &data,
                |d| detail(d, render.color),
                |d| d.voucher.id.to_string(),
            );
            output::print_output(&out, render.quiet);
            Ok(())
        }

        VouchersCommand::Redeem { id } => {
            let id = voucher_id(&id)?;
            let notice = catalog.redeem(&id)?;
            let out = match render.format {
                OutputFormat::Table => output::success(&notice.message, render.color),
                format => output::render_single(
                    format,
                    &notice,
                    |n| n.message.clone(),
                    |n| n.voucher_id.to_string(),
                ),
            };
            output::print_output(&out, render.quiet);
            Ok(())
        }
    }
}

fn voucher_id(raw: &str) -> Result<VoucherId, CliError> {
    // Ids are matched exactly; only an all-blank argument is rejected.
    let id = VoucherId::from(raw);
    if id.is_empty() {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: "voucher id cannot be empty".into(),
        });
    }
    Ok(id)
}

fn lookup(catalog: &Catalog, raw: &str) -> Result<Arc<Voucher>, CliError> {
    let id = voucher_id(raw)?;
    catalog.get(&id).ok_or_else(|| CliError::NotFound {
        resource_type: "voucher".into(),
        identifier: id.to_string(),
        list_command: "vouchers list".into(),
    })
}
