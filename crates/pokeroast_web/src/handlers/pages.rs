use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};

use pokeroast_core::dex::CreatureSource;
use pokeroast_core::roast::ChatBackend;
use pokeroast_core::PARTY_SIZE;

use crate::state::AppState;

/// 端末風トップページ
#[derive(Template)]
#[template(path = "terminal.html")]
pub struct TerminalTemplate {
    pub games: Vec<String>,
    pub default_game: String,
    pub party_size: usize,
}

/// GET / - トップページ
pub async fn home<S: CreatureSource + 'static, B: ChatBackend + 'static>(State(state): State<Arc<AppState<S, B>>>) -> impl IntoResponse {
    let template = TerminalTemplate {
        games: state.service.catalog().names().into_iter().map(String::from).collect(),
        default_game: state.service.default_game().to_string(),
        party_size: PARTY_SIZE,
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", e),
        )
            .into_response(),
    }
}
