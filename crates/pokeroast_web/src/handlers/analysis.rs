use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tower_sessions::Session;

use pokeroast_core::analysis::defense_matrix;
use pokeroast_core::dex::CreatureSource;
use pokeroast_core::roast::ChatBackend;
use pokeroast_core::ShameEntry;

use super::{load_outcome, load_team, save_outcome};
use crate::models::{AnalyzeRequest, ErrorResponse, MatrixResponse};
use crate::state::AppState;

/// GET /api/matrix - セッションのチームの防御相性表
pub async fn matrix<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
    session: Session,
) -> impl IntoResponse {
    let team = load_team(&session).await;
    match state.service.resolve_team(&team.names()).await {
        Ok(members) => Json(MatrixResponse::from(defense_matrix(state.service.chart(), &members))).into_response(),
        Err(e) => {
            tracing::error!(target: "web::analysis", error = %e, "team resolve failed");
            ErrorResponse::reply(StatusCode::BAD_GATEWAY, format!("Failed to load team: {}", e))
        }
    }
}

/// GET /api/analyze - このセッションの直近の分析結果 (無ければ null)
pub async fn last_outcome(session: Session) -> impl IntoResponse {
    Json(load_outcome(&session).await)
}

/// POST /api/analyze - 辛口批評と人事レポート
///
/// 結果は晒し者履歴に追記し、有効なら読み上げる。
pub async fn analyze<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
    session: Session,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let team = load_team(&session).await;
    if team.is_empty() {
        return ErrorResponse::reply(StatusCode::BAD_REQUEST, "NO DATA.");
    }

    let requested = req.game.unwrap_or_default();
    let game = state.service.catalog().find_or(&requested, state.service.default_game()).name.clone();
    tracing::info!(target: "web::analysis", %game, team = ?team.names(), "analysis requested");

    // 図鑑が落ちていても批評は名前だけで返す (report: null)
    let outcome = state.service.analyze_names(&game, &team.names()).await;

    let entry = ShameEntry::new(team.names(), &outcome.verdict.roast, &outcome.verdict.worst_pokemon, &game);
    if let Err(e) = state.history().append(&entry) {
        tracing::error!(target: "web::analysis", error = %e, "history append failed");
    }
    if state.narrator.narrate(&outcome.verdict.roast).is_some() {
        tracing::debug!(target: "web::analysis", "narration started");
    }

    save_outcome(&session, &outcome).await;
    Json(outcome).into_response()
}
