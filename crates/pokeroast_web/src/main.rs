use std::sync::Arc;

use color_eyre::Result;
use pokeroast_core::RoastConfig;
use pokeroast_web::{router, LiveState, DEFAULT_ADDR};

#[tokio::main]
async fn main() -> Result<()> {
    // エラーハンドリングの初期化
    color_eyre::install()?;

    // 環境変数のロード
    dotenvy::dotenv().ok();

    // ロギングの初期化
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pokeroast_web=debug"))
        )
        .init();

    tracing::info!(target: "pokeroast_web", "Starting web server...");

    let config = RoastConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!(target: "pokeroast_web", "GROQ_API_KEY is not set; roasts will report a broken machine");
    }
    let state = Arc::new(LiveState::from_config(config)?);
    let app = router(state);

    // サーバー起動
    let addr = std::env::var("POKEROAST_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let local = listener.local_addr()?;
    tracing::info!(target: "pokeroast_web", "Server running on http://{}", local);
    println!("🔥 PokéRoast terminal running on http://{}", local);

    axum::serve(listener, app).await?;

    Ok(())
}
