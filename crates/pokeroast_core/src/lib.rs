//! pokeroast_core
//!
//! タイプ相性分析、図鑑取得、LLMによる辛口批評、晒し者履歴などの共通ロジックを提供するコアクレート。
//! TUI/Web両方で利用可能。

pub mod config;
pub mod types;
pub mod creature;
pub mod team;
pub mod analysis;
pub mod dex;
pub mod roast;
pub mod speech;
pub mod history;
pub mod services;

// 主要な型を再エクスポート
pub use config::RoastConfig;
pub use creature::{BaseStats, Creature, StatAverages};
pub use history::{ShameEntry, ShameLog};
pub use services::{AnalysisOutcome, RoastService};
pub use team::{Team, TeamError, PARTY_SIZE};
pub use types::{ElementType, TypeChart};
