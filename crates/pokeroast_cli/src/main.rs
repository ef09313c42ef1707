use color_eyre::Result;
use pokeroast_core::RoastConfig;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;

    // .env を読み込む (無ければ無視)。RoastConfig::from_env でも読むが、ログ設定より先に反映させる
    let _ = dotenvy::dotenv();

    // ログ: 標準出力は使わず、ファイルへのみ出力してratatuiと衝突しないようにする
    let file_appender = rolling::daily("logs", "pokeroast.log");
    // guard は drop するとログが失われるため main の終わりまで保持
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // ファイルにANSIカラー不要
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    let config = RoastConfig::from_env();
    tracing::info!(target: "app", models = ?config.models, key_loaded = config.api_key.is_some(), "starting terminal");

    let terminal = ratatui::init();
    let res = pokeroast_cli::run(terminal, config);
    ratatui::restore();
    res
}
