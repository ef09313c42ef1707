//! 晒し者履歴モード: 過去の批評を新しい順に表示

use super::{AppMode, Mode};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pokeroast_core::history::{Offender, ShameEntry};
use pokeroast_core::{RoastConfig, ShameLog};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::Stylize,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use tracing::warn;

const OFFENDER_LIMIT: usize = 5;

pub struct ShameMode {
    /// 新しい順
    pub entries: Vec<ShameEntry>,
    pub offenders: Vec<Offender>,
    pub selected: usize,
    pub error: Option<String>,
    config: RoastConfig,
}

impl ShameMode {
    pub fn with_config(config: RoastConfig) -> Self {
        let mut mode = Self { entries: Vec::new(), offenders: Vec::new(), selected: 0, error: None, config };
        mode.reload();
        mode
    }

    /// DB から読み直す。失敗は画面に表示する
    pub fn reload(&mut self) {
        match self.read() {
            Ok((mut entries, offenders)) => {
                entries.reverse();
                self.entries = entries;
                self.offenders = offenders;
                self.selected = 0;
                self.error = None;
            }
            Err(e) => {
                warn!(target: "app", error = %e, "hall of shame unavailable");
                self.error = Some(e.to_string());
            }
        }
    }

    fn read(&self) -> Result<(Vec<ShameEntry>, Vec<Offender>)> {
        let log = ShameLog::open_or_create(&self.config.history_path)?;
        Ok((log.list()?, log.worst_offenders(OFFENDER_LIMIT)?))
    }

    pub fn selected_entry(&self) -> Option<&ShameEntry> {
        self.entries.get(self.selected)
    }
}

impl Mode for ShameMode {
    fn update(&mut self) {}

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(f.area());
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(OFFENDER_LIMIT as u16 + 2)])
            .split(chunks[0]);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let style = if i == self.selected {
                    Style::default().fg(Color::Black).bg(Color::Red)
                } else {
                    Style::default().fg(Color::Red)
                };
                ListItem::new(format!("#{} {} ({})", e.id, e.worst_pokemon, e.game)).style(style)
            })
            .collect();
        let title = format!("Hall of Shame ({})", self.entries.len());
        f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title(title)), left[0]);

        let offenders: Vec<ListItem> = self
            .offenders
            .iter()
            .map(|o| ListItem::new(format!("{:<14} x{}", o.name, o.times)))
            .collect();
        f.render_widget(
            List::new(offenders).block(Block::default().borders(Borders::ALL).title("Repeat Offenders")),
            left[1],
        );

        let detail: Vec<Line> = if let Some(err) = &self.error {
            vec![Line::from(Span::styled(format!("ERROR: {}", err), Style::default().fg(Color::Red)))]
        } else if let Some(e) = self.selected_entry() {
            vec![
                Line::from(Span::styled(format!("TEAM: {}", e.team.join(", ")), Style::default().bold())),
                Line::from(format!("GAME: {}", e.game)),
                Line::from(""),
                Line::from(e.roast.clone()),
            ]
        } else {
            vec![Line::from("(まだ誰も晒されていません)")]
        };
        let widget = Paragraph::new(detail)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("↑/↓: Select | r: Reload | Esc: Menu"));
        f.render_widget(widget, chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>> {
        match key.code {
            KeyCode::Esc => Ok(Some(AppMode::Menu(super::MenuMode::with_config(self.config.clone())))),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Ok(Some(AppMode::Exit)),
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Ok(None)
            }
            KeyCode::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
                Ok(None)
            }
            KeyCode::Char('r') => {
                self.reload();
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}
