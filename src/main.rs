mod advisor;
mod config;
mod export;
mod logging;
mod model;
mod scan;
mod state;
mod ui;
mod util;

use crate::advisor::{Advisor, Analysis, GeminiAdvisor};
use crate::config::AppConfig;
use crate::export::export_snapshot;
use crate::model::ProcessRecord;
use crate::scan::ScanError;
use crate::state::{DashboardState, Filter, StateEvent};
use crate::ui::{
    action_component::ActionComponent, analysis_component::AnalysisComponent,
    chat_component::ChatComponent, footer_component::FooterComponent,
    keybindings_component::KeybindingsComponent, process_table_component::ProcessTableComponent,
    snapshots_component::SnapshotsComponent, stats_component, theme::Theme,
};
use crate::util::with_side_panel;

use chrono::Local;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Tabs},
};
use std::{sync::Arc, time::Duration};
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::{info, warn};

pub const ITEM_HEIGHT: u16 = 1;
const TICK_RATE: Duration = Duration::from_millis(100);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = AppConfig::load()?;
    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("logging disabled: {e}");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let advisor: Arc<dyn Advisor> = Arc::new(GeminiAdvisor::new(&config.advisor)?);
    info!(model = %config.advisor.model, "slimernet starting");

    let terminal = ratatui::init();
    let result = App::new(config, advisor, runtime.handle().clone()).run(terminal);
    ratatui::restore();
    result
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationMode {
    #[default]
    Normal,
    Editing,
}

enum AppControlFlow {
    Continue,
    Exit,
}

/// Results of background work, delivered back to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    ScanFinished(Result<Vec<ProcessRecord>, ScanError>),
    AnalysisReady { id: String, analysis: Analysis },
    ChatReply(String),
}

/// The main application which holds the state and logic of the application.
pub struct App {
    config: AppConfig,
    advisor: Arc<dyn Advisor>,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    state: DashboardState,
    mode: ApplicationMode,
    theme: Theme,

    table: ProcessTableComponent,
    actions: ActionComponent,
    analysis: AnalysisComponent,
    chat: ChatComponent,
    snapshots: SnapshotsComponent,
    keybindings: KeybindingsComponent,
    footer: FooterComponent,
}

impl App {
    pub fn new(config: AppConfig, advisor: Arc<dyn Advisor>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            config,
            advisor,
            runtime,
            events_tx,
            events_rx,
            state: DashboardState::default(),
            mode: ApplicationMode::Normal,
            theme: Theme::default(),
            table: ProcessTableComponent::default(),
            actions: ActionComponent::default(),
            analysis: AnalysisComponent::default(),
            chat: ChatComponent::default(),
            snapshots: SnapshotsComponent::default(),
            keybindings: KeybindingsComponent::default(),
            footer: FooterComponent::default(),
        }
    }

    /// Run the application's main loop.
    fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            self.drain_events();
            terminal.draw(|frame| self.render(frame))?;

            if !event::poll(TICK_RATE)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if matches!(self.handle_key_event(key), AppControlFlow::Exit) {
                        info!("slimernet exiting");
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn dispatch(&mut self, event: StateEvent) {
        self.state = std::mem::take(&mut self.state).reduce(event);
        self.table.set_items(self.state.visible());
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ScanFinished(Ok(records)) => {
                if let Some(stale) = self.actions.item.take() {
                    // the new scan replaced every record
                    self.actions.hide();
                    self.footer.set_message(format!(
                        "Scan complete: {} processes ({} is no longer present)",
                        records.len(),
                        stale.name
                    ));
                } else {
                    self.footer
                        .set_message(format!("Scan complete: {} processes", records.len()));
                }
                self.dispatch(StateEvent::ScanCompleted {
                    records,
                    at: Local::now(),
                });
            }
            AppEvent::ScanFinished(Err(e)) => {
                warn!(error = %e, "scan failed");
                self.footer.set_message("Scan failed, press [s] to retry");
                self.dispatch(StateEvent::ScanFailed(e.to_string()));
            }
            AppEvent::AnalysisReady { id, analysis } => {
                self.analysis.resolve(&id, analysis);
            }
            AppEvent::ChatReply(text) => self.chat.receive_reply(text),
        }
    }

    fn start_scan(&mut self) {
        if self.state.is_scanning {
            return;
        }
        self.dispatch(StateEvent::ScanStarted);

        let tx = self.events_tx.clone();
        let config = self.config.scan();
        self.runtime.spawn(async move {
            let result = scan::run_scan(config).await;
            let _ = tx.send(AppEvent::ScanFinished(result));
        });
    }

    fn analyze_selected(&mut self) {
        let Some(record) = self.table.selected_item().cloned() else {
            return;
        };
        self.analysis.show_pending(&record);

        let advisor = Arc::clone(&self.advisor);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let analysis =
                advisor::analyze_or_fallback(advisor.as_ref(), &record.name, record.port).await;
            let _ = tx.send(AppEvent::AnalysisReady {
                id: record.id,
                analysis,
            });
        });
    }

    fn send_chat(&mut self) {
        let Some((history, message)) = self.chat.begin_send() else {
            return;
        };
        let context = self.state.context_snapshot();

        let advisor = Arc::clone(&self.advisor);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let reply =
                advisor::chat_or_fallback(advisor.as_ref(), &history, &message, &context).await;
            let _ = tx.send(AppEvent::ChatReply(reply));
        });
    }

    fn open_actions(&mut self) {
        let Some(record) = self.table.selected_item().cloned() else {
            return;
        };
        if record.status.is_running() {
            self.actions.show(record);
        } else {
            self.footer
                .set_message(format!("{} is already {}", record.name, record.status));
        }
    }

    fn export(&mut self, format: export::ExportFormat) {
        match export_snapshot(
            &self.state.processes,
            format,
            self.config.snapshot_dir.as_deref(),
        ) {
            Ok(path) => {
                info!(path = %path.display(), "snapshot exported");
                self.footer
                    .set_message(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "snapshot export failed");
                self.footer.set_message(format!("Export failed: {e}"));
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> AppControlFlow {
        if is_quit_combo(&key) {
            return AppControlFlow::Exit;
        }
        if self.mode == ApplicationMode::Editing {
            self.handle_editing_mode_key(key);
            return AppControlFlow::Continue;
        }
        if self.handle_popup_key(key) {
            return AppControlFlow::Continue;
        }
        self.handle_normal_mode_key(key)
    }

    /// Keys for whichever popup is on top; returns false when none is open.
    fn handle_popup_key(&mut self, key: KeyEvent) -> bool {
        if self.actions.display {
            match key.code {
                KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.actions.focus_prev(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.actions.focus_next(),
                KeyCode::Enter => {
                    if let Some((id, action)) = self.actions.confirm() {
                        self.dispatch(StateEvent::Action { id, action });
                    }
                }
                KeyCode::Esc | KeyCode::Char('q') => self.actions.hide(),
                _ => {}
            }
            return true;
        }
        if self.snapshots.display {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.snapshots.prev_format(),
                KeyCode::Down | KeyCode::Char('j') => self.snapshots.next_format(),
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.snapshots.toggle_action(),
                KeyCode::Enter => {
                    if let Some(format) = self.snapshots.confirm() {
                        self.export(format);
                    }
                }
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => self.snapshots.toggle(),
                _ => {}
            }
            return true;
        }
        if self.analysis.display {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.analysis.hide();
            }
            return true;
        }
        if self.keybindings.display {
            match (key.modifiers, key.code) {
                (_, KeyCode::Down | KeyCode::Char('j')) => self.keybindings.next_row(),
                (_, KeyCode::Up | KeyCode::Char('k')) => self.keybindings.previous_row(),
                (KeyModifiers::SHIFT, KeyCode::PageDown) => self.keybindings.last_row(),
                (KeyModifiers::SHIFT, KeyCode::PageUp) => self.keybindings.first_row(),
                (_, KeyCode::PageDown) => self.keybindings.page_down(),
                (_, KeyCode::PageUp) => self.keybindings.page_up(),
                (_, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?' | 'q')) => {
                    self.keybindings.toggle()
                }
                _ => {}
            }
            return true;
        }
        false
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) -> AppControlFlow {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) if self.chat.display => self.chat.toggle(),
            (KeyModifiers::NONE, KeyCode::Char('q' | 'Q')) | (_, KeyCode::Esc) => {
                return AppControlFlow::Exit;
            }
            (_, KeyCode::Char('s')) => self.start_scan(),
            (_, KeyCode::Char('f')) => {
                self.dispatch(StateEvent::FilterChanged(self.state.filter.next()))
            }
            (_, KeyCode::Char('1')) => self.dispatch(StateEvent::FilterChanged(Filter::All)),
            (_, KeyCode::Char('2')) => self.dispatch(StateEvent::FilterChanged(Filter::Threats)),
            (_, KeyCode::Char('3')) => self.dispatch(StateEvent::FilterChanged(Filter::Running)),
            (_, KeyCode::Enter) => self.open_actions(),
            (_, KeyCode::Char('a')) => self.analyze_selected(),
            (_, KeyCode::Char('c')) => {
                if self.chat.display {
                    self.chat.toggle();
                } else {
                    self.chat.display = true;
                    self.mode = ApplicationMode::Editing;
                }
            }
            (_, KeyCode::Char('i')) if self.chat.display => self.mode = ApplicationMode::Editing,
            (_, KeyCode::Char('x')) => self.snapshots.toggle(),
            (_, KeyCode::F(1) | KeyCode::Char('?')) => self.keybindings.toggle(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.table.next_row(),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.table.previous_row(),
            (KeyModifiers::SHIFT, KeyCode::PageDown) => self.table.last_row(),
            (KeyModifiers::SHIFT, KeyCode::PageUp) => self.table.first_row(),
            (_, KeyCode::PageDown) => self.table.page_down(),
            (_, KeyCode::PageUp) => self.table.page_up(),
            (KeyModifiers::SHIFT, KeyCode::Right) | (_, KeyCode::Char('l')) => {
                self.theme.cycle_next()
            }
            (KeyModifiers::SHIFT, KeyCode::Left) | (_, KeyCode::Char('h')) => {
                self.theme.cycle_prev()
            }
            _ => {}
        }
        AppControlFlow::Continue
    }

    fn handle_editing_mode_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.send_chat(),
            KeyCode::Char(to_insert) => self.chat.insert_char(to_insert),
            KeyCode::Backspace => self.chat.delete_char(),
            KeyCode::Left => self.chat.move_cursor_left(),
            KeyCode::Right => self.chat.move_cursor_right(),
            KeyCode::Esc => self.mode = ApplicationMode::Normal,
            _ => {}
        }
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let colors = self.theme.table.clone();
        let show_stats = !self.state.processes.is_empty();
        let show_banner = self.state.show_critical_banner();

        let [header_area, stats_area, tabs_area, body_area, banner_area, footer_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(if show_stats { 9 } else { 0 }),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(if show_banner { 4 } else { 0 }),
                Constraint::Length(3),
            ])
            .areas(frame.area());

        self.render_header(frame, header_area);
        if show_stats {
            stats_component::render(frame, stats_area, &colors, &self.state);
        }
        self.render_tabs(frame, tabs_area);

        let (table_area, chat_area) = with_side_panel(body_area, self.chat.display, 40);
        let placeholder = if self.state.is_scanning {
            "Scanning ports and protocols..."
        } else if self.state.last_scan_at.is_some() && self.state.processes.is_empty() {
            "Nothing found. Press [s] to scan again."
        } else if self.state.last_scan_at.is_some() {
            "No processes match the current filter."
        } else {
            "System Idle. Press [s] to Initialize Scan and detect APIs. (Simulated environment)"
        };
        self.table.render(frame, table_area, &colors, placeholder);
        if let Some(chat_area) = chat_area {
            self.chat.render(frame, chat_area, &colors, &self.mode);
        }

        if show_banner {
            self.footer
                .render_banner(frame, banner_area, &colors, self.state.stats().critical);
        }
        self.footer.render(frame, footer_area, &colors, &self.state);

        let area = frame.area();
        self.actions.render(frame, area, &colors);
        self.analysis.render(frame, area, &colors);
        self.snapshots
            .render(frame, area, &colors, self.state.processes.len());
        self.keybindings.render(frame, area, &colors);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.table;
        let scan_hint = if self.state.is_scanning {
            Span::styled("Scanning...", Style::default().add_modifier(Modifier::BOLD))
        } else {
            Span::raw("[s] Initialize Scan")
        };
        let title = Line::from(vec![
            Span::styled(
                "SlimerNet",
                Style::default()
                    .fg(colors.selected_row_style_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  API Threat Monitor v1.0   "),
            scan_hint,
        ]);
        let header = Paragraph::new(title).bg(colors.buffer_bg).block(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::new().fg(colors.footer_border_color)),
        );
        frame.render_widget(header, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.table;
        let filters = [Filter::All, Filter::Threats, Filter::Running];
        let selected = filters
            .iter()
            .position(|f| *f == self.state.filter)
            .unwrap_or(0);
        let tabs = Tabs::new(
            filters
                .iter()
                .enumerate()
                .map(|(i, f)| format!("[{}] {}", i + 1, f.label())),
        )
        .select(selected)
        .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
        .highlight_style(
            Style::default()
                .fg(colors.selected_row_style_fg)
                .add_modifier(Modifier::REVERSED),
        );
        frame.render_widget(tabs, area);
    }
}

fn is_quit_combo(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C'))
}
