//! メニューモード: 起動時の選択画面

use super::{AppMode, Mode};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use pokeroast_core::RoastConfig;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::fmt;

/// メニューの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Terminal,
    HallOfShame,
    Exit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Terminal => write!(f, "Team Terminal"),
            MenuItem::HallOfShame => write!(f, "Hall of Shame"),
            MenuItem::Exit => write!(f, "Exit"),
        }
    }
}

impl MenuItem {
    fn all() -> [MenuItem; 3] {
        [MenuItem::Terminal, MenuItem::HallOfShame, MenuItem::Exit]
    }

    fn next(self) -> MenuItem {
        match self {
            MenuItem::Terminal => MenuItem::HallOfShame,
            MenuItem::HallOfShame => MenuItem::Exit,
            MenuItem::Exit => MenuItem::Terminal,
        }
    }

    fn prev(self) -> MenuItem {
        match self {
            MenuItem::Terminal => MenuItem::Exit,
            MenuItem::HallOfShame => MenuItem::Terminal,
            MenuItem::Exit => MenuItem::HallOfShame,
        }
    }
}

/// メニューモード状態
pub struct MenuMode {
    selected: MenuItem,
    config: RoastConfig,
}

impl MenuMode {
    /// 環境変数から設定を読み込んで作成
    pub fn new() -> Self {
        Self::with_config(RoastConfig::from_env())
    }

    pub fn with_config(config: RoastConfig) -> Self {
        Self { selected: MenuItem::Terminal, config }
    }

    pub fn selected(&self) -> MenuItem {
        self.selected
    }
}

impl Default for MenuMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for MenuMode {
    fn update(&mut self) {
        // メニューには定期更新は不要
    }

    fn render(&self, f: &mut Frame) {
        let area = f.area();

        let block = Block::default()
            .title("PokéRoast - Mode Selection")
            .borders(Borders::ALL);
        f.render_widget(block, area);

        // コンテンツエリア（パディング考慮）
        let content_area = Rect {
            x: area.x + 2,
            y: area.y + 2,
            width: area.width.saturating_sub(4),
            height: area.height.saturating_sub(4),
        };

        let title = Paragraph::new("> SELECT PROGRAM_")
            .style(Style::default().fg(Color::Green).bold());
        f.render_widget(title, Rect {
            x: content_area.x,
            y: content_area.y,
            width: content_area.width,
            height: 2,
        });

        let key_state = if self.config.api_key.is_some() { "API key: loaded" } else { "API key: MISSING (roasts will fail)" };
        let key_line = Paragraph::new(key_state).style(Style::default().fg(Color::DarkGray));
        f.render_widget(key_line, Rect {
            x: content_area.x,
            y: content_area.y + 1,
            width: content_area.width,
            height: 1,
        });

        let menu_start_y = content_area.y + 3;
        for (index, item) in MenuItem::all().iter().enumerate() {
            let is_selected = self.selected == *item;
            let prefix = if is_selected { "▶ " } else { "  " };
            let style = if is_selected {
                Style::default().fg(Color::Black).bg(Color::Green).bold()
            } else {
                Style::default().fg(Color::Green)
            };
            let paragraph = Paragraph::new(format!("{}{}", prefix, item)).style(style);
            f.render_widget(paragraph, Rect {
                x: content_area.x,
                y: menu_start_y + index as u16,
                width: content_area.width,
                height: 1,
            });
        }

        // フッター（操作説明）
        let footer = Paragraph::new("↑/↓: Navigate | Enter: Select | Esc/q: Exit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(footer, Rect {
            x: area.x,
            y: area.height.saturating_sub(2),
            width: area.width,
            height: 1,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.prev();
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = self.selected.next();
                Ok(None)
            }
            KeyCode::Enter => {
                let next_mode = match self.selected {
                    MenuItem::Terminal => AppMode::Terminal(super::TerminalMode::with_config(self.config.clone())?),
                    MenuItem::HallOfShame => AppMode::Shame(super::ShameMode::with_config(self.config.clone())),
                    MenuItem::Exit => AppMode::Exit,
                };
                Ok(Some(next_mode))
            }
            KeyCode::Esc | KeyCode::Char('q') => Ok(Some(AppMode::Exit)),
            _ => Ok(None),
        }
    }
}
