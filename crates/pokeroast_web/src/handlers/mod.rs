pub mod analysis;
pub mod history;
pub mod pages;
pub mod team;

use pokeroast_core::{AnalysisOutcome, Team};
use tower_sessions::Session;

pub use analysis::{analyze, last_outcome, matrix};
pub use history::shame_history;
pub use pages::home;
pub use team::{add_member, flush_team, games, release_member, roster, team_view};

const TEAM_KEY: &str = "team";
const OUTCOME_KEY: &str = "last_outcome";

/// セッションのチーム (無ければ空)
pub(crate) async fn load_team(session: &Session) -> Team {
    session.get(TEAM_KEY).await.unwrap_or_default().unwrap_or_default()
}

pub(crate) async fn save_team(session: &Session, team: &Team) {
    if let Err(e) = session.insert(TEAM_KEY, team).await {
        tracing::warn!(target: "web::session", error = %e, "failed to store team");
    }
}

/// 直近の分析結果 (リロード後の再表示用)
pub(crate) async fn load_outcome(session: &Session) -> Option<AnalysisOutcome> {
    session.get(OUTCOME_KEY).await.unwrap_or_default()
}

pub(crate) async fn save_outcome(session: &Session, outcome: &AnalysisOutcome) {
    if let Err(e) = session.insert(OUTCOME_KEY, outcome).await {
        tracing::warn!(target: "web::session", error = %e, "failed to store outcome");
    }
}

/// チーム・レポート・批評をまとめて消す
pub(crate) async fn reset_session(session: &Session) {
    session.remove::<Team>(TEAM_KEY).await.ok();
    session.remove::<AnalysisOutcome>(OUTCOME_KEY).await.ok();
}
