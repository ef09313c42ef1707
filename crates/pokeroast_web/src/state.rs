//! 全リクエストで共有するアプリケーション状態

use std::sync::{Mutex, MutexGuard};

use color_eyre::Result;
use pokeroast_core::dex::{CreatureSource, PokeApiClient};
use pokeroast_core::roast::{ChatBackend, OpenAiBackend};
use pokeroast_core::speech::Narrator;
use pokeroast_core::{RoastConfig, RoastService, ShameLog};

/// 本番構成 (PokeAPI + OpenAI互換API)
pub type LiveState = AppState<PokeApiClient, OpenAiBackend>;

pub struct AppState<S, B> {
    pub config: RoastConfig,
    pub service: RoastService<S, B>,
    pub narrator: Narrator,
    history: Mutex<ShameLog>,
}

impl LiveState {
    /// 設定から本番状態を構築 (履歴DBを開く)
    pub fn from_config(config: RoastConfig) -> Result<Self> {
        let service = RoastService::from_config(&config)?;
        let history = ShameLog::open_or_create(&config.history_path)?;
        let narrator = Narrator::from_config(&config);
        Ok(Self::new(config, service, history, narrator))
    }
}

impl<S: CreatureSource, B: ChatBackend> AppState<S, B> {
    pub fn new(config: RoastConfig, service: RoastService<S, B>, history: ShameLog, narrator: Narrator) -> Self {
        Self { config, service, narrator, history: Mutex::new(history) }
    }

    /// 履歴DBのロック。await をまたいで保持しないこと
    pub fn history(&self) -> MutexGuard<'_, ShameLog> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}
