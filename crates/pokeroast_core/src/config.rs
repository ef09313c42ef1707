//! アプリケーション設定
//!
//! `Default` が組み込みの既定値、`from_env` が `.env` / 環境変数で上書きした値を返す。

use std::env;
use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};

/// OpenAI互換APIの既定エンドポイント (Groq)
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// PokeAPI の既定エンドポイント
pub const DEFAULT_POKEAPI_BASE: &str = "https://pokeapi.co/api/v2";

/// 既定の候補モデル (この順に試す)
pub const DEFAULT_MODELS: [&str; 3] = [
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "gemma2-9b-it",
];

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct RoastConfig {
    /// LLM APIキー (未設定なら辛口批評は合成エラー応答になる)
    pub api_key: Option<String>,
    /// OpenAI互換APIのベースURL
    pub api_base: String,
    /// 失敗時に順に試すモデル名
    pub models: Vec<String>,
    pub temperature: f32,
    /// 最大トークン数
    pub max_tokens: u32,
    pub pokeapi_base: String,
    /// HTTPタイムアウト（秒）
    pub request_timeout_secs: u64,
    /// 晒し者履歴の SQLite ファイル
    pub history_path: PathBuf,
    /// 読み上げの有効/無効
    pub speech_enabled: bool,
    /// 読み上げ速度 (words per minute)
    pub speech_rate: u32,
    pub default_game: String,
}

impl Default for RoastConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: 0.7,
            // NOTE: Keep in sync with tests (tests/config_tests.rs).
            max_tokens: 1024,
            pokeapi_base: DEFAULT_POKEAPI_BASE.to_string(),
            request_timeout_secs: 20,
            history_path: PathBuf::from("pokeroast.sqlite"),
            speech_enabled: true,
            speech_rate: 155,
            default_game: "Scarlet / Violet".to_string(),
        }
    }
}

impl RoastConfig {
    /// 新しい設定インスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// `.env` を読み込んだ上で環境変数から設定を構築する
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut cfg = Self::default();

        cfg.api_key = ["GROQ_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|k| env::var(k).ok().filter(|v| !v.trim().is_empty()));

        if let Ok(base) = env::var("ROAST_API_BASE") {
            cfg.api_base = base;
        }
        if let Ok(raw) = env::var("ROAST_MODELS") {
            let parsed = parse_model_list(&raw);
            if !parsed.is_empty() {
                cfg.models = parsed;
            }
        }
        if let Ok(base) = env::var("POKEAPI_BASE") {
            cfg.pokeapi_base = base;
        }
        if let Ok(path) = env::var("POKEROAST_DB") {
            cfg.history_path = PathBuf::from(path);
        }
        if let Ok(v) = env::var("POKEROAST_SPEECH") {
            cfg.speech_enabled = parse_flag(&v).unwrap_or(cfg.speech_enabled);
        }
        if let Some(rate) = env::var("POKEROAST_SPEECH_RATE").ok().and_then(|v| v.trim().parse().ok()) {
            cfg.speech_rate = rate;
        }
        if let Ok(game) = env::var("POKEROAST_DEFAULT_GAME") {
            cfg.default_game = game;
        }
        cfg
    }

    /// APIキーを取得。未設定ならエラー
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| eyre!("GROQ_API_KEY is missing. Add it to .env or the environment."))
    }
}

/// カンマ区切りのモデル名を分解。空要素は捨て、`models/` 接頭辞を取り除く
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| m.strip_prefix("models/").unwrap_or(m).to_string())
        .collect()
}

/// "1"/"true"/"on"/"yes" 系の真偽値
pub fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_list_strips_prefix_and_blanks() {
        let m = parse_model_list(" models/gemini-2.0-flash, ,llama-3.3-70b-versatile,");
        assert_eq!(m, vec!["gemini-2.0-flash", "llama-3.3-70b-versatile"]);
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
