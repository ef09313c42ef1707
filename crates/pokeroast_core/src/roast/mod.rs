//! LLMによる辛口批評 (roast)

pub mod prompt;
pub mod backend;
pub mod failover;

use serde::{Deserialize, Serialize};

pub use backend::{ChatBackend, OpenAiBackend};
pub use failover::{FailoverEvent, Roaster};
pub use prompt::{parse_verdict, RoastPrompt};

/// 全モデル失敗時に「最弱」として返す名前
pub const FALLBACK_WORST: &str = "Magikarp";

/// 批評結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastVerdict {
    pub roast: String,
    #[serde(default)]
    pub worst_pokemon: String,
    /// 応答したモデル。合成応答なら `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl RoastVerdict {
    /// 全モデル失敗時の合成応答
    pub fn machine_broke<E: std::fmt::Display>(error: E) -> Self {
        Self {
            roast: format!("The roast machine broke. Error: {error}"),
            worst_pokemon: FALLBACK_WORST.to_string(),
            model: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.model.is_none()
    }
}
