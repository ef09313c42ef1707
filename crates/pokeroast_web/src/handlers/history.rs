use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use color_eyre::Result;
use pokeroast_core::dex::CreatureSource;
use pokeroast_core::history::{Offender, ShameEntry};
use pokeroast_core::roast::ChatBackend;
use pokeroast_core::ShameLog;

use crate::models::{ErrorResponse, HistoryResponse, OffenderView};
use crate::state::AppState;

const OFFENDER_LIMIT: usize = 5;

/// GET /api/history - 晒し者履歴 (新しい順) と常連ワースト (画像付き)
pub async fn shame_history<S: CreatureSource + 'static, B: ChatBackend + 'static>(
    State(state): State<Arc<AppState<S, B>>>,
) -> impl IntoResponse {
    // ロックは画像取得の await より前に手放す
    let result = {
        let log = state.history();
        read_history(&log)
    };
    match result {
        Ok((mut entries, offenders)) => {
            entries.reverse();
            let mut views = Vec::with_capacity(offenders.len());
            for offender in offenders {
                // 画像は取れなければ無しで表示
                let sprite = match state.service.lookup(&offender.name).await {
                    Ok(found) => found.and_then(|c| c.sprite),
                    Err(e) => {
                        tracing::warn!(target: "web::history", error = %e, name = %offender.name, "sprite lookup failed");
                        None
                    }
                };
                views.push(OffenderView::new(offender, sprite));
            }
            Json(HistoryResponse { entries, offenders: views }).into_response()
        }
        Err(e) => {
            tracing::error!(target: "web::history", error = %e, "history read failed");
            ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to read history: {}", e))
        }
    }
}

fn read_history(log: &ShameLog) -> Result<(Vec<ShameEntry>, Vec<Offender>)> {
    Ok((log.list()?, log.worst_offenders(OFFENDER_LIMIT)?))
}
