use std::path::PathBuf;

use pokeroast_core::config::{RoastConfig, DEFAULT_API_BASE, DEFAULT_MODELS};
mod common;

#[ctor::ctor]
fn _init() { common::init(); }

#[test]
fn config_defaults() {
    let c = RoastConfig::new();
    assert_eq!(c.api_base, DEFAULT_API_BASE);
    assert_eq!(c.models, DEFAULT_MODELS.to_vec());
    assert_eq!(c.max_tokens, 1024);
    assert_eq!(c.temperature, 0.7);
    assert_eq!(c.speech_rate, 155);
    assert_eq!(c.history_path, PathBuf::from("pokeroast.sqlite"));
    assert!(c.require_api_key().is_err());
}

// 環境変数を触るテストはこの1本だけ (並列実行で干渉しないように)
#[test]
fn env_overrides() {
    std::env::set_var("ROAST_MODELS", "models/alpha, ,beta");
    std::env::set_var("POKEROAST_SPEECH", "off");
    std::env::set_var("POKEROAST_SPEECH_RATE", "200");
    std::env::set_var("POKEROAST_DB", "custom.sqlite");
    std::env::set_var("POKEROAST_DEFAULT_GAME", "Sword / Shield");

    let c = RoastConfig::from_env();
    assert_eq!(c.models, vec!["alpha", "beta"]);
    assert!(!c.speech_enabled);
    assert_eq!(c.speech_rate, 200);
    assert_eq!(c.history_path, PathBuf::from("custom.sqlite"));
    assert_eq!(c.default_game, "Sword / Shield");

    for k in ["ROAST_MODELS", "POKEROAST_SPEECH", "POKEROAST_SPEECH_RATE", "POKEROAST_DB", "POKEROAST_DEFAULT_GAME"] {
        std::env::remove_var(k);
    }
}
