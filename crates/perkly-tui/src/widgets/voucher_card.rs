//! A single voucher card in the catalog grid.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use url::Url;

use perkly_core::{Voucher, resolve_logo};

use crate::theme;

/// Rows a card needs when the tallest card in its grid has `max_tiers` tiers.
///
/// Borders, name, value, "Redeem with:", the tiers, logo host and button.
pub fn card_height(max_tiers: usize) -> u16 {
    let tiers = u16::try_from(max_tiers.max(1)).unwrap_or(u16::MAX);
    tiers.saturating_add(7)
}

/// Body lines for one voucher, everything inside the border.
pub fn card_lines(voucher: &Voucher, placeholder: &Url, selected: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            voucher.voucher_name.clone(),
            Style::default()
                .fg(theme::DIM_WHITE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            voucher.voucher_value.clone(),
            Style::default().fg(theme::NEON_CYAN),
        )),
        Line::from(Span::styled("Redeem with:", theme::key_hint())),
    ];

    for tier in &voucher.point_tiers {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", tier.points), theme::points()),
            Span::styled(" Points", theme::status_bar()),
            Span::styled(format!("  {}", tier.code), theme::key_hint()),
        ]));
    }

    let logo = resolve_logo(&voucher.brand_logo_url, placeholder);
    lines.push(Line::from(Span::styled(
        format!("logo {}", logo.host_str().unwrap_or_default()),
        theme::key_hint(),
    )));
    lines.push(Line::from(Span::styled(" Redeem Now ", theme::button(selected))));

    lines
}

pub fn render_voucher_card(
    frame: &mut Frame,
    area: Rect,
    voucher: &Voucher,
    placeholder: &Url,
    selected: bool,
) {
    let border = if selected {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let block = Block::default()
        .title(format!(" {} ", voucher.brand_name))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(card_lines(voucher, placeholder, selected)),
        inner,
    );
}
