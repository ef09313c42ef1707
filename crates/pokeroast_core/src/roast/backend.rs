//! チャット補完バックエンド
//!
//! OpenAI互換API (既定は Groq) に1モデル分の問い合わせを行う。
//! モデルの切り替えは呼び出し側 (`failover`) が担当する。

use std::future::Future;

use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat};
use async_openai::Client;
use color_eyre::{eyre::eyre, Result};
use tracing::{debug, info, instrument};

use super::prompt::RoastPrompt;
use crate::config::RoastConfig;

/// 1モデルへの問い合わせ
pub trait ChatBackend: Send + Sync {
    /// 応答本文を返す。空応答はエラー
    fn complete(&self, model: &str, prompt: &RoastPrompt) -> impl Future<Output = Result<String>> + Send;
}

/// トークン制限戦略を表現する列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenLimitStrategy {
    /// `max_tokens` と `temperature` を使用（通常のチャットモデル向け）
    MaxTokens,
    /// `max_completion_tokens` を使用（推論系モデル向け。temperature は送らない）
    MaxCompletionTokens,
}

/// モデル名からトークン制限戦略を判定する
fn determine_token_limit_strategy(model: &str) -> TokenLimitStrategy {
    let reasoning = ["o1", "o3", "o4", "gpt-5"].iter().any(|p| model.starts_with(p));
    if reasoning {
        debug!(model = %model, strategy = "MaxCompletionTokens", "推論系モデル");
        TokenLimitStrategy::MaxCompletionTokens
    } else {
        debug!(model = %model, strategy = "MaxTokens", "通常モデル");
        TokenLimitStrategy::MaxTokens
    }
}

/// async-openai による実装
pub struct OpenAiBackend {
    client: Option<Client<OpenAIConfig>>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiBackend {
    /// APIキーが無い場合も構築は成功し、問い合わせ時にエラーになる
    pub fn new(config: &RoastConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            let cfg = OpenAIConfig::new()
                .with_api_key(key.clone())
                .with_api_base(config.api_base.clone());
            Client::with_config(cfg)
        });
        Self { client, temperature: config.temperature, max_tokens: config.max_tokens }
    }

    /// 戦略に応じてリクエストを構築する
    fn build_request(&self, model: &str, prompt: &RoastPrompt) -> Result<CreateChatCompletionRequest> {
        let strategy = determine_token_limit_strategy(model);
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(model)
            .messages(prompt.to_messages()?)
            .response_format(ResponseFormat::JsonObject);

        let req = match strategy {
            TokenLimitStrategy::MaxTokens => {
                builder.temperature(self.temperature).max_tokens(self.max_tokens).build()?
            }
            TokenLimitStrategy::MaxCompletionTokens => {
                builder.max_completion_tokens(self.max_tokens).build()?
            }
        };
        Ok(req)
    }
}

impl ChatBackend for OpenAiBackend {
    #[instrument(name = "chat_complete", skip(self, prompt))]
    async fn complete(&self, model: &str, prompt: &RoastPrompt) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| eyre!("GROQ_API_KEY is missing. Add it to .env or the environment."))?;
        let req = self.build_request(model, prompt)?;

        info!(target: "roast", "chat_request: model={}, max_tokens={}", model, self.max_tokens);
        let resp = client.chat().create(req).await?;
        debug!(target: "roast", "chat_response_choices: {}", resp.choices.len());

        resp.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| eyre!("model {model} returned an empty reply"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_by_model_family() {
        assert_eq!(determine_token_limit_strategy("llama-3.3-70b-versatile"), TokenLimitStrategy::MaxTokens);
        assert_eq!(determine_token_limit_strategy("gpt-4o-mini"), TokenLimitStrategy::MaxTokens);
        assert_eq!(determine_token_limit_strategy("gpt-5-mini"), TokenLimitStrategy::MaxCompletionTokens);
        assert_eq!(determine_token_limit_strategy("o3-mini"), TokenLimitStrategy::MaxCompletionTokens);
    }

    #[test]
    fn request_uses_json_mode() {
        let backend = OpenAiBackend::new(&RoastConfig::default());
        let prompt = RoastPrompt::for_team(&["pikachu"], "Red / Blue / Yellow");
        let req = backend.build_request("llama-3.3-70b-versatile", &prompt).unwrap();
        assert_eq!(req.model, "llama-3.3-70b-versatile");
        assert_eq!(req.messages.len(), 2);
        assert!(matches!(req.response_format, Some(ResponseFormat::JsonObject)));
        assert_eq!(req.temperature, Some(0.7));
    }

    #[tokio::test]
    async fn missing_key_fails_at_call_time() {
        let backend = OpenAiBackend::new(&RoastConfig::default());
        let prompt = RoastPrompt::for_team(&["pikachu"], "");
        let err = backend.complete("llama-3.3-70b-versatile", &prompt).await.unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
