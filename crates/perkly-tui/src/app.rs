//! Application core: event loop, action dispatch, overlays.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use perkly_core::{Catalog, CatalogSnapshot, ViewQuery};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::catalog::CatalogScreen;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    running: bool,
    help_visible: bool,
    catalog: Catalog,
    /// Human description of where the catalog comes from.
    source: String,
    screen: CatalogScreen,
    /// Latest catalog snapshot, for the status bar.
    snapshot: Arc<CatalogSnapshot>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Confirmation dialog waiting for y/n.
    pending_confirm: Option<ConfirmAction>,
    /// Active toast and when it appeared.
    notification: Option<(Notification, Instant)>,
    /// A reload is running; further `Reload`s are dropped until it reports.
    reloading: bool,
    /// Cancels the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(catalog: Catalog, placeholder: Url, initial: &ViewQuery) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screen = CatalogScreen::new(catalog.clone(), placeholder, initial);

        Self {
            running: true,
            help_visible: false,
            source: catalog.source_description(),
            snapshot: catalog.snapshot(),
            catalog,
            screen,
            action_tx,
            action_rx,
            pending_confirm: None,
            notification: None,
            reloading: false,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size().unwrap_or((80, 24));
        self.action_tx.send(Action::Resize(width, height))?;

        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        let catalog = self.catalog.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(catalog, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(source = %self.source, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key to an action. Overlays capture input first, then global
    /// keys, then the catalog screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    /// Apply one action to app state and forward it to the screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Tick => {
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::Render => {}

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::CatalogUpdated(snapshot) => {
                debug!(version = snapshot.version, "catalog snapshot received");
                self.snapshot = Arc::clone(snapshot);
                self.forward(action)?;
            }

            Action::Reload => {
                if self.reloading {
                    debug!("reload already in flight, ignoring");
                } else {
                    self.execute_reload();
                }
            }

            Action::ReloadFinished(n) => {
                self.reloading = false;
                self.notification = Some((n.clone(), Instant::now()));
            }

            // ── Redemption pipeline ─────────────────────────────────
            Action::RequestRedeem(id) => {
                let name = self
                    .catalog
                    .get(id)
                    .map_or_else(|| id.to_string(), |v| v.voucher_name.clone());
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::Redeem {
                        id: id.clone(),
                        name,
                    }))?;
            }

            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(&confirm)?;
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            other => self.forward(other)?,
        }

        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    fn execute_confirm(&self, confirm: &ConfirmAction) -> Result<()> {
        match confirm {
            ConfirmAction::Redeem { id, .. } => {
                let notification = match self.catalog.redeem(id) {
                    Ok(notice) => Notification::success(notice.message),
                    Err(e) => {
                        warn!(id = %id, error = %e, "redemption failed");
                        Notification::error(e.to_string())
                    }
                };
                self.action_tx.send(Action::Notify(notification))?;
            }
        }
        Ok(())
    }

    /// Re-read the catalog source off the UI thread. The data bridge
    /// delivers the new snapshot; this only reports the outcome.
    fn execute_reload(&mut self) {
        self.reloading = true;
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        let _ = tx.send(Action::Notify(Notification::info("Reloading catalog\u{2026}")));
        tokio::task::spawn_blocking(move || {
            let notification = match catalog.reload() {
                Ok(_) => Notification::success(format!(
                    "Reloaded {} vouchers",
                    catalog.snapshot().len()
                )),
                Err(e) => {
                    warn!(error = %e, "catalog reload failed");
                    Notification::error(format!("Reload failed: {e}"))
                }
            };
            let _ = tx.send(Action::ReloadFinished(notification));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.screen.render(frame, content_area);
        self.render_status_bar(frame, status_area);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
        if let Some(confirm) = &self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if let Some((notification, _)) = &self.notification {
            render_notification(frame, area, notification);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let loaded = self
            .snapshot
            .loaded_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S");

        let line = Line::from(vec![
            Span::styled(" ● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled(
                format!(
                    "{} vouchers · v{} · loaded {loaded} · {}",
                    self.snapshot.len(),
                    self.snapshot.version,
                    self.source
                ),
                theme::status_bar(),
            ),
            Span::styled(" │ ", theme::key_hint()),
            Span::styled("Tab", theme::key_hint_key()),
            Span::styled(" category  ", theme::key_hint()),
            Span::styled("s", theme::key_hint_key()),
            Span::styled(" sort  ", theme::key_hint()),
            Span::styled("⏎", theme::key_hint_key()),
            Span::styled(" redeem  ", theme::key_hint()),
            Span::styled("?", theme::key_hint_key()),
            Span::styled(" help  ", theme::key_hint()),
            Span::styled("q", theme::key_hint_key()),
            Span::styled(" quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

// ── Overlays ─────────────────────────────────────────────────────────

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

const HELP_KEYS: [(&str, &str); 9] = [
    ("Tab / c", "Next category"),
    ("S-Tab / C", "Previous category"),
    ("s", "Toggle points sort"),
    ("←↓↑→ / hjkl", "Move between cards"),
    ("g / G", "First / last card"),
    ("Enter", "Redeem selected voucher"),
    ("r", "Reload catalog"),
    ("?", "Toggle this help"),
    ("q / Ctrl+C", "Quit"),
];

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let height = u16::try_from(HELP_KEYS.len()).unwrap_or(u16::MAX).saturating_add(4);
    let help_area = centered(area, 48, height);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let mut lines: Vec<Line> = HELP_KEYS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("  {keys:<14}"), theme::key_hint_key()),
                Span::styled(*what, theme::status_bar()),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Esc or ? to close",
        theme::key_hint(),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let dialog_area = centered(area, 56, 5);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_YELLOW))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(format!("  {confirm}"), theme::status_bar())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let msg_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 1);
    let toast_area = Rect::new(x, y, width, height.min(area.height));

    let (color, icon) = match notification.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), theme::status_bar()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use perkly_core::{BuiltinCatalog, DEFAULT_CATEGORIES, VoucherId, default_placeholder};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn app() -> App {
        let categories = DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect();
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories).unwrap();
        let mut app = App::new(catalog, default_placeholder(), &ViewQuery::default());
        app.process_action(&Action::Resize(120, 40)).unwrap();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Process queued follow-up actions, returning them in order.
    fn drain(app: &mut App) -> Vec<Action> {
        let mut seen = Vec::new();
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
            seen.push(action);
        }
        seen
    }

    fn rendered(app: &App) -> String {
        let (width, height) = (120, 40);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn toast(app: &App) -> Option<&Notification> {
        app.notification.as_ref().map(|(n, _)| n)
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::Quit)
        ));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(app.handle_key_event(ctrl_c).unwrap(), Some(Action::Quit)));

        app.process_action(&Action::Quit).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn help_overlay_captures_keys() {
        let mut app = app();
        let toggle = app.handle_key_event(key(KeyCode::Char('?'))).unwrap().unwrap();
        app.process_action(&toggle).unwrap();
        assert!(app.help_visible);
        assert!(rendered(&app).contains("Keybindings"));

        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ToggleHelp)
        ));
    }

    #[test]
    fn enter_confirms_then_redeems() {
        let mut app = app();
        let request = app.handle_key_event(key(KeyCode::Enter)).unwrap().unwrap();
        app.process_action(&request).unwrap();
        drain(&mut app);

        assert_eq!(
            app.pending_confirm,
            Some(ConfirmAction::Redeem {
                id: VoucherId::from("2"),
                name: "Starbucks Coffee Voucher".into(),
            })
        );
        assert!(rendered(&app).contains("Redeem Starbucks Coffee Voucher?"));

        let yes = app.handle_key_event(key(KeyCode::Char('y'))).unwrap().unwrap();
        app.process_action(&yes).unwrap();
        drain(&mut app);

        assert!(app.pending_confirm.is_none());
        assert_eq!(
            toast(&app),
            Some(&Notification::success(
                "Redeem functionality for Starbucks Coffee Voucher"
            ))
        );
        assert!(rendered(&app).contains("Redeem functionality for Starbucks Coffee Voucher"));
    }

    #[test]
    fn declining_the_dialog_redeems_nothing() {
        let mut app = app();
        app.process_action(&Action::RequestRedeem(VoucherId::from("5")))
            .unwrap();
        drain(&mut app);

        let no = app.handle_key_event(key(KeyCode::Esc)).unwrap().unwrap();
        app.process_action(&no).unwrap();
        assert!(app.pending_confirm.is_none());
        assert!(drain(&mut app).is_empty());
        assert!(toast(&app).is_none());
    }

    #[test]
    fn redeeming_a_vanished_voucher_reports_an_error() {
        let mut app = app();
        app.process_action(&Action::ShowConfirm(ConfirmAction::Redeem {
            id: VoucherId::from("404"),
            name: "Gone".into(),
        }))
        .unwrap();
        app.process_action(&Action::ConfirmYes).unwrap();
        drain(&mut app);
        assert_eq!(toast(&app).unwrap().level, NotificationLevel::Error);
    }

    #[test]
    fn status_bar_shows_catalog_summary() {
        let text = rendered(&app());
        assert!(text.contains("8 vouchers · v1"));
        assert!(text.contains("built-in catalog"));
    }

    #[tokio::test]
    async fn reload_reports_outcome() {
        let mut app = app();
        app.process_action(&Action::Reload).unwrap();

        let Some(Action::Notify(started)) = app.action_rx.recv().await else {
            panic!("expected a progress notification");
        };
        assert_eq!(started.level, NotificationLevel::Info);

        let Some(finished @ Action::ReloadFinished(_)) = app.action_rx.recv().await else {
            panic!("expected the reload outcome");
        };
        app.process_action(&finished).unwrap();
        assert_eq!(toast(&app), Some(&Notification::success("Reloaded 8 vouchers")));
        assert!(!app.reloading);
        assert_eq!(app.catalog.snapshot().version, 2);
    }

    #[tokio::test]
    async fn repeated_reload_while_running_is_ignored() {
        let mut app = app();
        app.process_action(&Action::Reload).unwrap();
        app.process_action(&Action::Reload).unwrap();
        app.process_action(&Action::Reload).unwrap();

        let mut started = 0;
        let mut finished = 0;
        while finished == 0 {
            match app.action_rx.recv().await.unwrap() {
                Action::Notify(_) => started += 1,
                Action::ReloadFinished(n) => {
                    assert_eq!(n.level, NotificationLevel::Success);
                    finished += 1;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(started, 1);
        assert!(app.action_rx.try_recv().is_err());
        assert_eq!(app.catalog.snapshot().version, 2);

        // Once the outcome lands, the next reload goes through.
        app.process_action(&Action::ReloadFinished(Notification::success("done")))
            .unwrap();
        assert!(!app.reloading);
        app.process_action(&Action::Reload).unwrap();
        assert!(app.reloading);
    }
}
