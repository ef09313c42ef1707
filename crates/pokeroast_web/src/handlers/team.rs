use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tower_sessions::Session;

use pokeroast_core::analysis::average_stats;
use pokeroast_core::dex::CreatureSource;
use pokeroast_core::roast::ChatBackend;
use pokeroast_core::TeamError;

use super::{load_team, reset_session, save_team};
use crate::models::{
    team_error_response, AddMemberRequest, AddMemberResponse, ErrorResponse, GamesResponse, RosterQuery,
    RosterResponse, SlotView, TeamResponse,
};
use crate::state::AppState;

/// GET /api/games - ゲーム一覧と既定ゲーム
pub async fn games<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
) -> Json<GamesResponse> {
    Json(GamesResponse {
        games: state.service.catalog().names().into_iter().map(String::from).collect(),
        default: state.service.default_game().to_string(),
    })
}

/// GET /api/roster?game= - ゲームの名簿 (昇順)
pub async fn roster<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
    Query(q): Query<RosterQuery>,
) -> impl IntoResponse {
    let requested = q.game.unwrap_or_default();
    let game = state.service.catalog().find_or(&requested, state.service.default_game()).name.clone();
    match state.service.roster(&game).await {
        Ok(roster) => Json(RosterResponse { game, roster }).into_response(),
        Err(e) => {
            tracing::error!(target: "web::team", error = %e, %game, "roster fetch failed");
            ErrorResponse::reply(StatusCode::BAD_GATEWAY, format!("Failed to load roster: {}", e))
        }
    }
}

/// GET /api/team - セッションのチーム (詳細・平均種族値つき)
pub async fn team_view<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
    session: Session,
) -> impl IntoResponse {
    let team = load_team(&session).await;
    let mut slots = Vec::with_capacity(team.slots().len());
    let mut members = Vec::new();
    for (slot, name) in team.slots().iter().enumerate() {
        let Some(name) = name else {
            slots.push(None);
            continue;
        };
        match state.service.lookup(name).await {
            Ok(Some(creature)) => {
                members.push(creature.clone());
                slots.push(Some(SlotView { slot, creature }));
            }
            Ok(None) => slots.push(None),
            Err(e) => {
                tracing::error!(target: "web::team", error = %e, %name, "details fetch failed");
                return ErrorResponse::reply(StatusCode::BAD_GATEWAY, format!("Failed to load {}: {}", name, e));
            }
        }
    }
    Json(TeamResponse { slots, averages: average_stats(&members), full: team.is_full() }).into_response()
}

/// POST /api/team - メンバー追加
pub async fn add_member<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
    session: Session,
    Json(req): Json<AddMemberRequest>,
) -> impl IntoResponse {
    let mut team = load_team(&session).await;
    if req.name.trim().is_empty() {
        return team_error_response(&TeamError::EmptyName);
    }
    // 満員なら外部APIを呼ぶ前に断る
    if team.is_full() {
        return team_error_response(&TeamError::PartyFull);
    }

    let creature = match state.service.lookup(&req.name).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return ErrorResponse::reply(StatusCode::NOT_FOUND, format!("Unknown creature: {}", req.name.trim()));
        }
        Err(e) => {
            tracing::error!(target: "web::team", error = %e, name = %req.name, "lookup failed");
            return ErrorResponse::reply(StatusCode::BAD_GATEWAY, format!("Lookup failed: {}", e));
        }
    };

    match team.add(&creature.name) {
        Ok(slot) => {
            save_team(&session, &team).await;
            tracing::info!(target: "web::team", name = %creature.name, slot, "member added");
            (StatusCode::CREATED, Json(AddMemberResponse { slot, creature })).into_response()
        }
        Err(e) => team_error_response(&e),
    }
}

/// DELETE /api/team/{slot} - スロットを空ける
pub async fn release_member(session: Session, Path(slot): Path<usize>) -> impl IntoResponse {
    let mut team = load_team(&session).await;
    match team.release(slot) {
        Ok(released) => {
            save_team(&session, &team).await;
            tracing::info!(target: "web::team", slot, released = ?released, "member released");
            Json(team).into_response()
        }
        Err(e) => team_error_response(&e),
    }
}

/// POST /api/team/flush - チーム・レポート・批評をリセット
pub async fn flush_team(session: Session) -> impl IntoResponse {
    reset_session(&session).await;
    tracing::info!(target: "web::team", "team flushed");
    StatusCode::NO_CONTENT
}
