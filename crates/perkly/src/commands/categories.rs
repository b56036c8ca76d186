//! Category command handler.

use tabled::Tabled;

use perkly_core::{Catalog, CategoryCount};

use crate::error::CliError;
use crate::output::{self, Render};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Vouchers")]
    count: usize,
    #[tabled(rename = "Filter Option")]
    listed: &'static str,
}

impl From<&CategoryCount> for CategoryRow {
    fn from(c: &CategoryCount) -> Self {
        Self {
            category: c.category.clone(),
            count: c.count,
            listed: if c.listed { "yes" } else { "no (use \"all\")" },
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
pub fn handle(catalog: &Catalog, render: Render) -> Result<(), CliError> {
    let counts = catalog.category_counts();
    for stray in counts.iter().filter(|c| !c.listed) {
        tracing::warn!(
            category = %stray.category,
            "catalog category is not a configured filter option"
        );
    }

    let out = output::render_list(
        render.format,
        &counts,
        "No categories configured.",
        |c| CategoryRow::from(c),
        |c| c.category.clone(),
    );
    output::print_output(&out, render.quiet);
    Ok(())
}
