//! Interactive terminal browser for IPython history
//!
//! Full-screen, page-at-a-time view of the history store:
//! - Browse entries with a detail pane
//! - Page forwards and backwards
//! - Filter by substring
//! - Mark entries and delete them in one batch
//!
//! All store access goes through [`MessageHandler`], the same path the
//! stdio bridge uses.

use crate::backend::HistoryBackend;
use crate::error::{Error, Result};
use crate::message::{MessageHandler, Request, Response};
use crate::types::{Entry, EntryId, Page};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::collections::BTreeSet;
use std::io::{self, IsTerminal};
use std::time::Duration;
use tracing::{debug, warn};

const HELP_TEXT: &[&str] = &[
    "Keybindings:",
    "",
    "  ↑/k  ↓/j      - Move up / down",
    "  ←/h/p  →/l/n  - Previous / next page",
    "  /             - Edit search (Enter applies, Esc cancels)",
    "  Backspace     - Clear search",
    "  Space/d       - Mark/unmark for deletion",
    "  x             - Delete marked entries",
    "  r             - Reload page",
    "  ?/F1          - Toggle help",
    "  q/Esc         - Quit",
];

/// Browser state, independent of the terminal it is drawn on
pub struct Browser<B> {
    handler: MessageHandler<B>,
    page: u32,
    page_size: u32,
    /// Applied search term
    search: String,
    /// Search being typed, if the search prompt is open
    input: Option<String>,
    current: Option<Page<Entry>>,
    selected: usize,
    list_state: ListState,
    /// Marks survive paging
    marked: BTreeSet<EntryId>,
    status: Option<String>,
    running: bool,
    show_help: bool,
}

impl<B: HistoryBackend> Browser<B> {
    pub fn new(handler: MessageHandler<B>, page_size: u32) -> Self {
        let mut browser = Self {
            handler,
            page: 1,
            page_size,
            search: String::new(),
            input: None,
            current: None,
            selected: 0,
            list_state: ListState::default(),
            marked: BTreeSet::new(),
            status: None,
            running: true,
            show_help: false,
        };
        browser.list_state.select(Some(0));
        browser
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn current(&self) -> Option<&Page<Entry>> {
        self.current.as_ref()
    }

    pub fn marked(&self) -> &BTreeSet<EntryId> {
        &self.marked
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.current.as_ref()?.data.get(self.selected)
    }

    /// Reload the current page
    pub fn refresh(&mut self) {
        let request = Request::GetHistory {
            page: self.page,
            page_size: self.page_size,
            search_term: (!self.search.is_empty()).then(|| self.search.clone()),
        };

        match self.handler.handle(request) {
            Response::HistoryData { data } => {
                // A deletion can leave us past the last page.
                if data.data.is_empty() && data.total_pages > 0 && u64::from(self.page) > data.total_pages {
                    self.page = u32::try_from(data.total_pages).unwrap_or(u32::MAX);
                    self.refresh();
                    return;
                }
                self.selected = self.selected.min(data.data.len().saturating_sub(1));
                self.list_state.select(Some(self.selected));
                self.current = Some(data);
            }
            Response::Error { message } => {
                self.status = Some(message);
            }
            other => {
                debug!(?other, "unexpected response to getHistory");
            }
        }
    }

    fn go_to_page(&mut self, page: u32) {
        self.page = page;
        self.selected = 0;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        if self.current.as_ref().is_some_and(|p| !p.is_last()) {
            self.go_to_page(self.page + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.go_to_page(self.page - 1);
        }
    }

    /// Apply `term` as typed; whitespace is part of the term
    pub fn apply_search(&mut self, term: String) {
        self.search = term;
        self.go_to_page(1);
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    fn select_next(&mut self) {
        let len = self.current.as_ref().map_or(0, |p| p.data.len());
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn toggle_mark_current(&mut self) {
        if let Some(id) = self.selected_entry().map(|e| e.id) {
            if !self.marked.remove(&id) {
                self.marked.insert(id);
            }
        }
    }

    /// Delete every marked entry with a single request
    pub fn delete_marked(&mut self) {
        if self.marked.is_empty() {
            self.status = Some("Nothing marked for deletion".to_string());
            return;
        }

        let ids: Vec<String> = self.marked.iter().map(|id| id.to_string()).collect();
        let count = ids.len();
        match self.handler.handle(Request::DeleteItems { ids }) {
            Response::DeleteComplete { success: true, .. } => {
                self.marked.clear();
                self.status = Some(format!("Deleted {} entries", count));
                self.refresh();
            }
            Response::DeleteComplete { error, .. } => {
                self.status = Some(format!(
                    "Failed to delete history items: {}",
                    error.unwrap_or_default()
                ));
            }
            other => {
                debug!(?other, "unexpected response to deleteItems");
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if let Some(input) = self.input.as_mut() {
            match key.code {
                KeyCode::Enter => {
                    let term = std::mem::take(input);
                    self.input = None;
                    self.apply_search(term);
                }
                KeyCode::Esc => self.input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return;
        }

        self.status = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => self.previous_page(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => self.next_page(),
            KeyCode::Char('/') => self.input = Some(self.search.clone()),
            KeyCode::Backspace if !self.search.is_empty() => self.apply_search(String::new()),
            KeyCode::Char(' ') | KeyCode::Char('d') | KeyCode::Delete => {
                self.toggle_mark_current()
            }
            KeyCode::Char('x') => self.delete_marked(),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),      // Header
                Constraint::Min(8),         // List
                Constraint::Percentage(35), // Details or help
                Constraint::Length(1),      // Status
            ])
            .split(frame.area());

        let (total_count, total_pages) = self
            .current
            .as_ref()
            .map_or((0, 0), |p| (p.total_count, p.total_pages));
        let mut title = format!(
            "IPython History - page {} of {} ({} entries, {} marked)",
            self.page,
            total_pages.max(1),
            total_count,
            self.marked.len()
        );
        if !self.search.trim().is_empty() {
            title.push_str(&format!(" - filter: {}", self.search));
        }
        let header = Paragraph::new(title)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = self
            .current
            .as_ref()
            .map(|p| p.data.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|entry| {
                let marker = if self.marked.contains(&entry.id) { "[x] " } else { "[ ] " };
                let mut lines = entry.source.lines();
                let first = lines.next().unwrap_or("");
                let more = if lines.next().is_some() { " …" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Red)),
                    Span::styled(format!("{:>6} ", entry.id.as_i64()), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{}{}", first, more), Style::default().fg(Color::White)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Commands"))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        if self.show_help {
            let help = Paragraph::new(HELP_TEXT.join("\n"))
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: false });
            frame.render_widget(help, chunks[2]);
        } else if let Some(entry) = self.selected_entry() {
            let details = Paragraph::new(entry.source.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Entry {}", entry.id)),
                )
                .style(Style::default().fg(Color::Green))
                .wrap(Wrap { trim: false });
            frame.render_widget(details, chunks[2]);
        }

        let footer = match (&self.input, &self.status) {
            (Some(input), _) => Line::from(format!("Search: {}_", input)),
            (None, Some(status)) => Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Yellow),
            )),
            (None, None) => Line::from(Span::styled(
                "? help  / search  space mark  x delete  q quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(footer), chunks[3]);
    }
}

/// Terminal restore steps, run on drop in reverse order of registration
///
/// A failing step is logged and the remaining steps still run.
#[derive(Default)]
struct Teardown {
    steps: Vec<Box<dyn FnOnce() -> io::Result<()>>>,
}

impl Teardown {
    fn push(&mut self, step: impl FnOnce() -> io::Result<()> + 'static) {
        self.steps.push(Box::new(step));
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        while let Some(step) = self.steps.pop() {
            if let Err(e) = step() {
                warn!(error = %e, "failed to restore terminal");
            }
        }
    }
}

/// Run the browser on the current terminal until the user quits
pub fn run_browser<B: HistoryBackend>(handler: MessageHandler<B>, page_size: u32) -> Result<()> {
    if !io::stdout().is_terminal() {
        return Err(Error::terminal("browse needs an interactive terminal"));
    }

    let mut browser = Browser::new(handler, page_size);
    browser.refresh();

    let mut restore = Teardown::default();
    enable_raw_mode()?;
    restore.push(disable_raw_mode);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    restore.push(move || execute!(stdout, LeaveAlternateScreen, Show));

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = (|| -> Result<()> {
        while browser.is_running() {
            terminal.draw(|f| browser.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        browser.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    })();

    drop(restore);
    result
}
