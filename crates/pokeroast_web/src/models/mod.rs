use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use pokeroast_core::analysis::{DefenseMatrix, Effectiveness};
use pokeroast_core::history::{Offender, ShameEntry};
use pokeroast_core::{Creature, StatAverages, TeamError};

/// メンバー追加リクエスト
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
}

/// 分析リクエスト。ゲーム省略時は既定ゲーム
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub game: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    pub game: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<String>,
    pub default: String,
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub game: String,
    pub roster: Vec<String>,
}

/// 1スロット分の表示データ
#[derive(Debug, Serialize)]
pub struct SlotView {
    pub slot: usize,
    pub creature: Creature,
}

/// GET /api/team のレスポンス
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    /// 6要素。空きスロットは null
    pub slots: Vec<Option<SlotView>>,
    pub averages: Option<StatAverages>,
    pub full: bool,
}

#[derive(Debug, Serialize)]
pub struct AddMemberResponse {
    pub slot: usize,
    pub creature: Creature,
}

/// 相性表の1マス
#[derive(Debug, Serialize)]
pub struct MatrixCell {
    pub multiplier: f64,
    pub class: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MatrixRowView {
    pub name: String,
    pub cells: Vec<MatrixCell>,
}

/// GET /api/matrix のレスポンス (ヒートマップ用)
#[derive(Debug, Serialize)]
pub struct MatrixResponse {
    pub attacking: Vec<String>,
    pub rows: Vec<MatrixRowView>,
}

impl From<DefenseMatrix> for MatrixResponse {
    fn from(m: DefenseMatrix) -> Self {
        Self {
            attacking: m.attacking.iter().map(|t| t.to_string()).collect(),
            rows: m
                .rows
                .into_iter()
                .map(|r| MatrixRowView {
                    name: r.name,
                    cells: r
                        .multipliers
                        .into_iter()
                        .map(|multiplier| MatrixCell {
                            multiplier,
                            class: Effectiveness::from_multiplier(multiplier).as_str(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// 常連ワースト1体分 (画像付き)
#[derive(Debug, Serialize)]
pub struct OffenderView {
    pub name: String,
    pub times: i64,
    pub sprite: Option<String>,
}

impl OffenderView {
    pub fn new(offender: Offender, sprite: Option<String>) -> Self {
        Self { name: offender.name, times: offender.times, sprite }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<ShameEntry>,
    pub offenders: Vec<OffenderView>,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn reply<S: Into<String>>(status: StatusCode, error: S) -> Response {
        (status, Json(ErrorResponse { error: error.into() })).into_response()
    }
}

/// チーム操作エラー → HTTPステータス
pub fn team_error_response(err: &TeamError) -> Response {
    let status = match err {
        TeamError::PartyFull => StatusCode::CONFLICT,
        TeamError::SlotOutOfRange(_) | TeamError::EmptyName => StatusCode::BAD_REQUEST,
    };
    ErrorResponse::reply(status, err.to_string())
}
