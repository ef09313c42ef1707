//! チーム端末モード
//!
//! 名前入力でメンバーを追加し、Ctrl+R で批評と人事レポートを依頼する。
//! 図鑑・LLM 呼び出しはすべてワーカースレッド経由。

use super::{AppMode, Mode};
use crate::worker::{self, Reply, Request};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pokeroast_core::analysis::{average_stats, defense_matrix, Effectiveness};
use pokeroast_core::dex::GameCatalog;
use pokeroast_core::{AnalysisOutcome, Creature, RoastConfig, Team, TeamError, TypeChart, PARTY_SIZE};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Stylize,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

/// 右ペインのタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Report,
    Matrix,
}

impl Tab {
    fn toggle(self) -> Tab {
        match self {
            Tab::Report => Tab::Matrix,
            Tab::Matrix => Tab::Report,
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Report => 0,
            Tab::Matrix => 1,
        }
    }
}

/// チーム端末モード状態
pub struct TerminalMode {
    /// 現在の入力テキスト
    pub input: String,
    pub team: Team,
    /// スロット順の詳細 (`team` と同じ並び)
    pub members: [Option<Creature>; PARTY_SIZE],
    pub game_index: usize,
    pub roster: Vec<String>,
    pub tab: Tab,
    /// 解放対象として選択中のスロット
    pub selected_slot: usize,
    pub outcome: Option<AnalysisOutcome>,
    /// 直近のメッセージ (エラー含む)
    pub status: String,
    pub lookup_pending: bool,
    pub analysis_pending: bool,
    config: RoastConfig,
    tx: Sender<Request>,
    rx: Receiver<Reply>,
}

impl TerminalMode {
    /// ワーカーを起動して作成
    pub fn with_config(config: RoastConfig) -> Result<Self> {
        let (tx_req, rx_req) = mpsc::channel::<Request>();
        let (tx_reply, rx_reply) = mpsc::channel::<Reply>();
        worker::start_live_worker(rx_req, tx_reply, config.clone())?;
        Self::with_channels(config, tx_req, rx_reply)
    }

    /// 既存のチャンネルで作成 (ワーカーは呼び出し側が用意する)
    pub fn with_channels(config: RoastConfig, tx: Sender<Request>, rx: Receiver<Reply>) -> Result<Self> {
        let catalog = GameCatalog::shared();
        let game_index = catalog
            .games()
            .iter()
            .position(|g| g.name.eq_ignore_ascii_case(&config.default_game))
            .unwrap_or(0);
        let mode = Self {
            input: String::new(),
            team: Team::new(),
            members: Default::default(),
            game_index,
            roster: Vec::new(),
            tab: Tab::Report,
            selected_slot: 0,
            outcome: None,
            status: String::from("READY."),
            lookup_pending: false,
            analysis_pending: false,
            config,
            tx,
            rx,
        };
        mode.tx.send(Request::Roster(mode.game().to_string()))?;
        Ok(mode)
    }

    /// 選択中のゲーム名
    pub fn game(&self) -> &str {
        &GameCatalog::shared().games()[self.game_index].name
    }

    /// 詳細が揃っているメンバー (スロット順)
    pub fn creatures(&self) -> Vec<Creature> {
        self.members.iter().flatten().cloned().collect()
    }

    /// 入力に前方一致する名簿の候補 (最大5件)
    pub fn suggestions(&self) -> Vec<&str> {
        let prefix = self.input.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.roster
            .iter()
            .filter(|n| n.starts_with(&prefix))
            .take(5)
            .map(String::as_str)
            .collect()
    }

    /// 入力中の名前で追加を依頼
    pub fn submit_add(&mut self) -> Result<()> {
        let name = self.input.trim().to_string();
        if name.is_empty() || self.lookup_pending {
            return Ok(());
        }
        if self.team.is_full() {
            self.status = TeamError::PartyFull.to_string();
            return Ok(());
        }
        self.input.clear();
        self.lookup_pending = true;
        self.status = format!("SEARCHING {}...", name.to_uppercase());
        info!(target: "app", "lookup requested: {}", name);
        self.tx.send(Request::Lookup(name))?;
        Ok(())
    }

    /// 批評を依頼
    pub fn request_analysis(&mut self) -> Result<()> {
        if self.team.is_empty() {
            self.status = String::from("NO DATA.");
            return Ok(());
        }
        if self.analysis_pending {
            return Ok(());
        }
        self.analysis_pending = true;
        self.status = String::from("ANALYZING...");
        self.tx.send(Request::Analyze { game: self.game().to_string(), names: self.team.names() })?;
        Ok(())
    }

    /// 選択中のスロットを空ける
    pub fn release_selected(&mut self) {
        match self.team.release(self.selected_slot) {
            Ok(Some(name)) => {
                self.members[self.selected_slot] = None;
                self.status = format!("RELEASED {}", name.to_uppercase());
            }
            Ok(None) => {}
            Err(e) => self.status = e.to_string(),
        }
    }

    /// チーム・レポート・批評をリセット
    pub fn flush(&mut self) {
        self.team.flush();
        self.members = Default::default();
        self.outcome = None;
        self.status = String::from("PARTY FLUSHED.");
    }

    /// ゲームを切り替えて名簿を取り直す
    pub fn shift_game(&mut self, forward: bool) -> Result<()> {
        let len = GameCatalog::shared().games().len();
        self.game_index = if forward { (self.game_index + 1) % len } else { (self.game_index + len - 1) % len };
        self.roster.clear();
        self.tx.send(Request::Roster(self.game().to_string()))?;
        Ok(())
    }

    /// ワーカー応答を反映
    pub fn apply_reply(&mut self, reply: Reply) {
        match reply {
            Reply::Creature { requested, result } => {
                self.lookup_pending = false;
                match result {
                    Ok(Some(creature)) => match self.team.add(&creature.name) {
                        Ok(slot) => {
                            self.status = format!("ADDED {} TO SLOT {}", creature.name.to_uppercase(), slot + 1);
                            self.members[slot] = Some(creature);
                        }
                        Err(e) => self.status = e.to_string(),
                    },
                    Ok(None) => self.status = format!("UNKNOWN CREATURE: {}", requested),
                    Err(e) => self.status = format!("LOOKUP FAILED: {}", e),
                }
            }
            Reply::Roster { game, result } => match result {
                Ok(names) if game == self.game() => self.roster = names,
                Ok(_) => {} // 切り替え前のゲームの応答
                Err(e) => self.status = format!("ROSTER FAILED: {}", e),
            },
            Reply::Analysis(outcome) => {
                self.analysis_pending = false;
                info!(target: "app", worst = %outcome.verdict.worst_pokemon, has_report = outcome.report.is_some(), "analysis received");
                self.status = if outcome.report.is_some() {
                    String::from("ROAST COMPLETE.")
                } else {
                    String::from("ROAST COMPLETE. (NO REPORT: DEX UNREACHABLE)")
                };
                self.outcome = Some(outcome);
                self.tab = Tab::Report;
            }
        }
    }
}

impl Mode for TerminalMode {
    fn update(&mut self) {
        // ワーカー応答の非ブロッキングチェック
        while let Ok(reply) = self.rx.try_recv() {
            self.apply_reply(reply);
        }
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // ヘッダ
                Constraint::Length(3), // 入力欄
                Constraint::Min(10),   // 本体
                Constraint::Length(1), // フッター
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_input(f, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(20)])
            .split(chunks[2]);
        self.render_slots(f, body[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(body[1]);
        self.render_tabs(f, right[0]);
        match self.tab {
            Tab::Report => self.render_report(f, right[1]),
            Tab::Matrix => self.render_matrix(f, right[1]),
        }

        self.render_footer(f, chunks[3]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Ok(Some(AppMode::Menu(super::MenuMode::with_config(self.config.clone())))),
            KeyCode::Char('c') if ctrl => Ok(Some(AppMode::Exit)),
            KeyCode::Char('r') if ctrl => {
                self.request_analysis()?;
                Ok(None)
            }
            KeyCode::Char('x') if ctrl => {
                self.flush();
                Ok(None)
            }
            KeyCode::Tab => {
                self.tab = self.tab.toggle();
                Ok(None)
            }
            KeyCode::Left => {
                self.shift_game(false)?;
                Ok(None)
            }
            KeyCode::Right => {
                self.shift_game(true)?;
                Ok(None)
            }
            KeyCode::Up => {
                self.selected_slot = (self.selected_slot + PARTY_SIZE - 1) % PARTY_SIZE;
                Ok(None)
            }
            KeyCode::Down => {
                self.selected_slot = (self.selected_slot + 1) % PARTY_SIZE;
                Ok(None)
            }
            KeyCode::Delete => {
                self.release_selected();
                Ok(None)
            }
            KeyCode::Enter => {
                self.submit_add()?;
                Ok(None)
            }
            KeyCode::Backspace => {
                self.input.pop();
                Ok(None)
            }
            KeyCode::Char(ch) if !ctrl => {
                self.input.push(ch);
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

// ===== Private render methods =====

fn effectiveness_color(e: Effectiveness) -> Color {
    match e {
        Effectiveness::Immune => Color::DarkGray,
        Effectiveness::DoubleResist => Color::Blue,
        Effectiveness::Resist => Color::Cyan,
        Effectiveness::Neutral => Color::Reset,
        Effectiveness::Weak => Color::Yellow,
        Effectiveness::DoubleWeak => Color::Red,
    }
}

impl TerminalMode {
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let guide = vec![
            Line::from("> POKÉROAST TERMINAL_".bold().fg(Color::Green)),
            Line::from(format!("GAME: < {} >  (←/→ で切替, 名簿 {} 件)", self.game(), self.roster.len())),
        ];
        let widget = Paragraph::new(guide).block(Block::default().borders(Borders::ALL).title("Guide"));
        f.render_widget(widget, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let mut current = self.input.clone();
        current.push('_'); // 簡易カーソル表示
        let hints = self.suggestions();
        let title = if hints.is_empty() { self.status.clone() } else { format!("{} | {}", self.status, hints.join(" ")) };
        let widget = Paragraph::new(current).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(widget, area);
    }

    fn render_slots(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let label = match m {
                    Some(c) => format!("{}. {:<12} {}", i + 1, c.name.to_uppercase(), c.type_label()),
                    None => format!("{}. [ EMPTY ]", i + 1),
                };
                let style = if i == self.selected_slot {
                    Style::default().fg(Color::Black).bg(Color::Green)
                } else {
                    Style::default().fg(Color::Green)
                };
                ListItem::new(label).style(style)
            })
            .collect();
        let title = format!("Party {}/{}", self.team.len(), PARTY_SIZE);
        f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title(title)), area);
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let tabs = Tabs::new(vec!["Report", "Matrix"])
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_report(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(5), Constraint::Length(9)])
            .split(area);

        let roast = if self.analysis_pending {
            "ANALYZING...".to_string()
        } else if let Some(o) = &self.outcome {
            format!("{}\n\nWORST: {}", o.verdict.roast, o.verdict.worst_pokemon)
        } else {
            "(Ctrl+R で批評)".to_string()
        };
        let roast_widget = Paragraph::new(roast)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Roast"));
        f.render_widget(roast_widget, chunks[0]);

        let lines: Vec<Line> = match self.outcome.as_ref().and_then(|o| o.report.as_ref()) {
            Some(r) => {
                let mut lines = vec![Line::from(vec![
                    Span::raw("THREAT: "),
                    Span::styled(r.threat_type.to_string().to_uppercase(), Style::default().fg(Color::Red).bold()),
                    Span::raw(format!(" (score {})", r.threat_score)),
                ])];
                if let Some(fire) = &r.fire {
                    lines.push(Line::from(format!("FIRE:   {} (x{})", fire.name.to_uppercase(), fire.multiplier)));
                }
                lines.push(Line::from(match &r.hire {
                    Some(h) => format!("HIRE:   {} (x{})", h.name.to_uppercase(), h.multiplier),
                    None => "HIRE:   (no candidate in this game)".to_string(),
                }));
                lines
            }
            None => vec![Line::from("(no report)")],
        };
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Tactical Report")),
            chunks[1],
        );

        let members = self.creatures();
        if let Some(avg) = average_stats(&members) {
            let data: Vec<(&str, u64)> = avg.axes().iter().map(|(label, v)| (*label, v.round() as u64)).collect();
            let chart = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title("Average Stats"))
                .bar_width(6)
                .bar_gap(1)
                .bar_style(Style::default().fg(Color::Green))
                .data(data.as_slice());
            f.render_widget(chart, chunks[2]);
        } else {
            f.render_widget(Block::default().borders(Borders::ALL).title("Average Stats"), chunks[2]);
        }
    }

    fn render_matrix(&self, f: &mut Frame, area: Rect) {
        let matrix = defense_matrix(TypeChart::shared(), &self.creatures());
        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(matrix.attacking.iter().map(|t| Cell::from(t.as_str().chars().take(3).collect::<String>()))),
        )
        .style(Style::default().bold());
        let rows = matrix.rows.iter().map(|row| {
            Row::new(std::iter::once(Cell::from(row.name.clone())).chain(row.multipliers.iter().map(|m| {
                let text = if *m == 1.0 { String::from("·") } else { m.to_string() };
                Cell::from(text).style(Style::default().fg(effectiveness_color(Effectiveness::from_multiplier(*m))))
            })))
        });
        let widths = std::iter::once(Constraint::Length(12))
            .chain(std::iter::repeat(Constraint::Length(4)).take(matrix.attacking.len()));
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Defense Matrix"));
        f.render_widget(table, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let footer = Paragraph::new("Enter: Add | ↑/↓ + Del: Release | Ctrl+R: Roast | Ctrl+X: Flush | Tab: View | Esc: Menu")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(footer, area);
    }
}
