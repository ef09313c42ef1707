//! pokeroast_web
//!
//! ブラウザ向けの端末風UI。チーム編成・相性表・辛口批評・晒し者履歴をHTTPで提供する。

pub mod handlers;
pub mod models;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_sessions::{cookie::time::Duration, MemoryStore, SessionManagerLayer};

use pokeroast_core::dex::CreatureSource;
use pokeroast_core::roast::ChatBackend;

pub use state::{AppState, LiveState};

/// 既定の待ち受けアドレス
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// ルーティング設定 (セッションレイヤー込み)
pub fn router<S, B>(state: Arc<AppState<S, B>>) -> Router
where
    S: CreatureSource + 'static,
    B: ChatBackend + 'static,
{
    // セッションストアの設定
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(tower_sessions::Expiry::OnInactivity(Duration::seconds(3600)));

    Router::new()
        // ページルート
        .route("/", get(handlers::home::<S, B>))

        // チームAPI
        .route("/api/games", get(handlers::games::<S, B>))
        .route("/api/roster", get(handlers::roster::<S, B>))
        .route("/api/team", get(handlers::team_view::<S, B>).post(handlers::add_member::<S, B>))
        .route("/api/team/flush", post(handlers::flush_team))
        .route("/api/team/:slot", delete(handlers::release_member))

        // 分析API
        .route("/api/matrix", get(handlers::matrix::<S, B>))
        .route("/api/analyze", get(handlers::last_outcome).post(handlers::analyze::<S, B>))
        .route("/api/history", get(handlers::shame_history::<S, B>))

        // セッションレイヤー適用
        .layer(session_layer)
        .with_state(state)
}
