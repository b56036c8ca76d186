//! Catalog screen: category tabs, sort selector and the voucher card grid.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use strum::IntoEnumIterator;
use tracing::{debug, warn};
use url::Url;

use perkly_core::{Catalog, CatalogSnapshot, CategoryFilter, SortOrder, ViewQuery, Voucher};

use crate::action::{Action, Direction};
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs::render_sub_tabs;
use crate::widgets::voucher_card::{card_height, render_voucher_card};

pub const ALL_CATEGORIES_LABEL: &str = "All Categories";
pub const EMPTY_MESSAGE: &str = "No vouchers found for the selected filters.";

/// Card columns for a terminal `width`: one on narrow terminals, up to four
/// on wide ones.
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..60 => 1,
        60..100 => 2,
        100..140 => 3,
        _ => 4,
    }
}

pub struct CatalogScreen {
    catalog: Catalog,
    placeholder: Url,
    /// 0 is "All Categories", `n` is `catalog.categories()[n - 1]`.
    category_index: usize,
    sort: SortOrder,
    snapshot: Arc<CatalogSnapshot>,
    vouchers: Arc<Vec<Arc<Voucher>>>,
    selected: usize,
    columns: usize,
}

impl CatalogScreen {
    pub fn new(catalog: Catalog, placeholder: Url, initial: &ViewQuery) -> Self {
        let category_index = match &initial.filter {
            CategoryFilter::All => 0,
            CategoryFilter::Category(name) => {
                if let Some(pos) = catalog.categories().iter().position(|c| c == name) {
                    pos + 1
                } else {
                    // The tab strip can only select listed options, so an
                    // unlisted default lands on "All Categories" here instead
                    // of the empty view the core query would give.
                    warn!(category = %name, "default category is not a filter option, showing all");
                    0
                }
            }
        };

        let snapshot = catalog.snapshot();
        let mut screen = Self {
            catalog,
            placeholder,
            category_index,
            sort: initial.sort,
            snapshot,
            vouchers: Arc::new(Vec::new()),
            selected: 0,
            columns: 1,
        };
        screen.refresh();
        screen
    }

    /// Current control selections as a view query.
    pub fn query(&self) -> ViewQuery {
        let filter = match self.category_index {
            0 => CategoryFilter::All,
            n => self
                .catalog
                .categories()
                .get(n - 1)
                .map_or(CategoryFilter::All, |c| CategoryFilter::from(c.as_str())),
        };
        ViewQuery {
            filter,
            sort: self.sort,
        }
    }

    pub fn selected_voucher(&self) -> Option<&Arc<Voucher>> {
        self.vouchers.get(self.selected)
    }

    pub fn shown(&self) -> usize {
        self.vouchers.len()
    }

    fn refresh(&mut self) {
        let query = self.query();
        self.vouchers = self.catalog.view(&query);
        self.selected = self.selected.min(self.vouchers.len().saturating_sub(1));
        debug!(
            filter = %query.filter,
            sort = %query.sort,
            shown = self.vouchers.len(),
            "catalog view refreshed"
        );
    }

    fn option_count(&self) -> usize {
        self.catalog.categories().len() + 1
    }

    fn move_selection(&mut self, direction: Direction) {
        let len = self.vouchers.len();
        if len == 0 {
            return;
        }
        let cols = self.columns.max(1);
        let last = len - 1;
        let current = self.selected;

        self.selected = match direction {
            Direction::Left => current.saturating_sub(1),
            Direction::Right => (current + 1).min(last),
            Direction::Up => current.checked_sub(cols).unwrap_or(current),
            Direction::Down if current + cols <= last => current + cols,
            // Partial last row: drop onto its final card.
            Direction::Down if current / cols < last / cols => last,
            Direction::Down => current,
            Direction::First => 0,
            Direction::Last => last,
        };
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_controls(&self, frame: &mut Frame, category_area: Rect, sort_area: Rect) {
        let mut labels = vec![ALL_CATEGORIES_LABEL];
        labels.extend(self.catalog.categories().iter().map(String::as_str));
        let mut categories = render_sub_tabs(&labels, self.category_index);
        categories
            .spans
            .insert(0, Span::styled(" Category  ", theme::key_hint()));
        frame.render_widget(Paragraph::new(categories), category_area);

        // Catalog order only shows up when it is the active order.
        let orders: Vec<SortOrder> = SortOrder::iter()
            .filter(|o| *o != SortOrder::Unsorted || *o == self.sort)
            .collect();
        let sort_labels: Vec<&str> = orders.iter().copied().map(SortOrder::label).collect();
        let active = orders
            .iter()
            .position(|o| *o == self.sort)
            .unwrap_or(orders.len());
        let mut sort = render_sub_tabs(&sort_labels, active);
        sort.spans
            .insert(0, Span::styled(" Sort      ", theme::key_hint()));
        frame.render_widget(Paragraph::new(sort), sort_area);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .title(format!(
                " Vouchers ({}/{}) ",
                self.shown(),
                self.snapshot.len()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.vouchers.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(inner);
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_MESSAGE, theme::status_bar()))
                    .alignment(Alignment::Center),
                middle,
            );
            return;
        }

        let cols = self.columns.max(1);
        let max_tiers = self
            .vouchers
            .iter()
            .map(|v| v.point_tiers.len())
            .max()
            .unwrap_or(1);
        let card_h = card_height(max_tiers);
        let inner = block.inner(area);
        let visible_rows = usize::from((inner.height / card_h).max(1));
        let total_rows = self.vouchers.len().div_ceil(cols);

        // Page through rows so the selected card is always on screen.
        let first_row = (self.selected / cols) / visible_rows * visible_rows;
        let end_row = (first_row + visible_rows).min(total_rows);
        if end_row < total_rows {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" row {}/{} ▼ ", self.selected / cols + 1, total_rows),
                theme::key_hint(),
            )));
        }
        frame.render_widget(block, area);

        let col_ratio = u32::try_from(cols).unwrap_or(1);
        let mut y = inner.y;
        for row in first_row..end_row {
            let height = card_h.min(inner.bottom().saturating_sub(y));
            if height == 0 {
                break;
            }
            let row_area = Rect::new(inner.x, y, inner.width, height);
            let cells =
                Layout::horizontal(vec![Constraint::Ratio(1, col_ratio); cols]).split(row_area);

            for (column, cell) in cells.iter().enumerate() {
                let index = row * cols + column;
                if let Some(voucher) = self.vouchers.get(index) {
                    render_voucher_card(
                        frame,
                        *cell,
                        voucher,
                        &self.placeholder,
                        index == self.selected,
                    );
                }
            }
            y = y.saturating_add(card_h);
        }
    }
}

impl Component for CatalogScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab | KeyCode::Char('c') => Action::NextCategory,
            KeyCode::BackTab | KeyCode::Char('C') => Action::PrevCategory,
            KeyCode::Char('s') => Action::ToggleSort,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Left | KeyCode::Char('h') => Action::Move(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => Action::Move(Direction::Right),
            KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
            KeyCode::Home | KeyCode::Char('g') => Action::Move(Direction::First),
            KeyCode::End | KeyCode::Char('G') => Action::Move(Direction::Last),
            KeyCode::Enter => match self.selected_voucher() {
                Some(v) => Action::RequestRedeem(v.id.clone()),
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NextCategory => {
                self.category_index = (self.category_index + 1) % self.option_count();
                self.selected = 0;
                self.refresh();
            }
            Action::PrevCategory => {
                let count = self.option_count();
                self.category_index = (self.category_index + count - 1) % count;
                self.selected = 0;
                self.refresh();
            }
            Action::ToggleSort => {
                self.sort = self.sort.toggled();
                self.selected = 0;
                self.refresh();
            }
            Action::Move(direction) => self.move_selection(*direction),
            Action::Resize(width, _) => self.columns = grid_columns(*width),
            Action::CatalogUpdated(snapshot) => {
                let keep = self.selected_voucher().map(|v| v.id.clone());
                self.snapshot = Arc::clone(snapshot);
                self.refresh();
                if let Some(id) = keep {
                    if let Some(pos) = self.vouchers.iter().position(|v| v.id == id) {
                        self.selected = pos;
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [title_area, category_area, sort_area, grid_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled("Rewards Redemption", theme::title_style()))
                .alignment(Alignment::Center),
            title_area,
        );
        self.render_controls(frame, category_area, sort_area);
        self.render_grid(frame, grid_area);
    }
}
