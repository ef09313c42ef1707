//! pokeroast_cli
//!
//! ratatui による端末版 PokéRoast。モード切替のメインループとワーカーを提供。

pub mod modes;
pub mod worker;

use color_eyre::Result;
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use pokeroast_core::RoastConfig;
use ratatui::DefaultTerminal;
use std::time::Duration;

/// イベント待ちの間隔
pub const POLL_INTERVAL_MS: u64 = 100;

// Ensure .env is loaded for tests before anything else runs in the test process.
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}

/// アプリケーションのメインループを実行
pub fn run(mut terminal: DefaultTerminal, config: RoastConfig) -> Result<()> {
    let mut current_mode = modes::AppMode::Menu(modes::MenuMode::with_config(config.clone()));

    loop {
        // 現在のモードで更新処理を実行
        current_mode.update();

        // 画面を描画
        terminal.draw(|f| current_mode.render(f))?;

        // 100ms以内にイベントが来たら処理
        if crossterm_event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            match crossterm_event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match current_mode.handle_key(key) {
                        Ok(Some(modes::AppMode::Exit)) => break,
                        Ok(Some(next_mode)) => current_mode = next_mode,
                        Ok(None) => {}
                        Err(e) => {
                            // エラーが発生した場合はメニューに戻す
                            tracing::error!(target: "app", "Error in mode: {:?}", e);
                            current_mode = modes::AppMode::Menu(modes::MenuMode::with_config(config.clone()));
                        }
                    }
                }
                Event::Resize(_, _) => {
                    // 次ループで再描画されるので特別な処理なし
                }
                _ => {}
            }
        }
    }
    Ok(())
}
