//! モードシステム: メニュー、チーム端末、晒し者履歴を管理

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;

/// 各モードが実装すべきトレイト
pub trait Mode {
    /// フレーム毎の非ブロッキング更新処理（ワーカー応答のチェックなど）
    fn update(&mut self);

    /// 画面描画
    fn render(&self, f: &mut Frame);

    /// キーイベント処理
    /// 戻り値: Some(次のモード) でモード遷移、None で同じモード継続
    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>>;
}

/// アプリケーションが取り得るモードの列挙型
pub enum AppMode {
    Menu(MenuMode),
    Terminal(TerminalMode),
    Shame(ShameMode),
    Exit,
}

impl AppMode {
    /// 現在のモードで update() を呼び出す
    pub fn update(&mut self) {
        match self {
            AppMode::Menu(m) => m.update(),
            AppMode::Terminal(m) => m.update(),
            AppMode::Shame(m) => m.update(),
            AppMode::Exit => {}
        }
    }

    /// 現在のモードで render() を呼び出す
    pub fn render(&self, f: &mut Frame) {
        match self {
            AppMode::Menu(m) => m.render(f),
            AppMode::Terminal(m) => m.render(f),
            AppMode::Shame(m) => m.render(f),
            AppMode::Exit => {}
        }
    }

    /// 現在のモードで handle_key() を呼び出す
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Option<AppMode>> {
        match self {
            AppMode::Menu(m) => m.handle_key(key),
            AppMode::Terminal(m) => m.handle_key(key),
            AppMode::Shame(m) => m.handle_key(key),
            AppMode::Exit => Ok(None),
        }
    }
}

pub mod menu;
pub mod shame;
pub mod terminal;

pub use menu::MenuMode;
pub use shame::ShameMode;
pub use terminal::{Tab, TerminalMode};
