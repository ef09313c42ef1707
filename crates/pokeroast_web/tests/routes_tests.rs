use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use color_eyre::{eyre::eyre, Result};
use serde_json::{json, Value};
use tower::ServiceExt;

use pokeroast_core::dex::{CreatureSource, GameVersion, StaticDex};
use pokeroast_core::roast::{ChatBackend, RoastPrompt, Roaster};
use pokeroast_core::speech::Narrator;
use pokeroast_core::{Creature, ElementType, RoastConfig, RoastService, ShameLog};
use pokeroast_web::{router, AppState};

#[ctor::ctor]
fn _init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .with_writer(std::io::stderr)
        .try_init();
}

/// 常に同じ JSON を返すバックエンド
struct CannedBackend;

impl ChatBackend for CannedBackend {
    async fn complete(&self, _model: &str, _prompt: &RoastPrompt) -> Result<String> {
        Ok(r#"{"roast": "All water, no brain.", "worst_pokemon": "magikarp"}"#.to_string())
    }
}

/// 最初の `details` だけ答え、その後は落ちる図鑑
struct FlakyDex {
    inner: StaticDex,
    answered: AtomicUsize,
}

impl CreatureSource for FlakyDex {
    async fn details(&self, name: &str) -> Result<Option<Creature>> {
        if self.answered.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(eyre!("pokeapi down"));
        }
        self.inner.details(name).await
    }

    async fn roster(&self, _game: &GameVersion) -> Result<Vec<String>> {
        Err(eyre!("pokeapi down"))
    }

    async fn members_of_type(&self, _t: ElementType) -> Result<Vec<String>> {
        Err(eyre!("pokeapi down"))
    }
}

fn app() -> Router {
    app_with(StaticDex::sample())
}

fn app_with<S: CreatureSource + 'static>(dex: S) -> Router {
    let service = RoastService::new(dex, Roaster::new(CannedBackend, vec!["canned".into()]))
        .with_default_game("Red / Blue / Yellow");
    let state = AppState::new(
        RoastConfig::default(),
        service,
        ShameLog::in_memory().expect("in-memory db"),
        Narrator::new(false, 155),
    );
    router(Arc::new(state))
}

/// セッションCookieを引き回す小さなクライアント
struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    fn new() -> Self {
        Self::with_app(app())
    }

    fn with_app(app: Router) -> Self {
        Self { app, cookie: None }
    }

    async fn send(&mut self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(c) = &self.cookie {
            req = req.header(header::COOKIE, c);
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = self.app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        if let Some(set) = resp.headers().get(header::SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }
}

#[tokio::test]
async fn home_page_lists_games() {
    let resp = app().oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(html.contains("POKÉROAST TERMINAL"));
    assert!(html.contains("Scarlet / Violet"));
    // モデル出力や履歴は DOM ノードとして組み立てる
    assert!(!html.contains(".innerHTML"));
    assert!(html.contains("textContent"));
}

#[tokio::test]
async fn games_include_default() {
    let mut c = Client::new();
    let (status, body) = c.send("GET", "/api/games", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default"], "Red / Blue / Yellow");
    assert_eq!(body["games"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn roster_is_sorted() {
    let mut c = Client::new();
    let (status, body) = c.send("GET", "/api/roster?game=Sword%20%2F%20Shield", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game"], "Sword / Shield");
    assert_eq!(body["roster"][0], "blastoise");
}

#[tokio::test]
async fn add_view_release_and_flush() {
    let mut c = Client::new();
    let (status, body) = c.send("POST", "/api/team", Some(json!({"name": "Pikachu"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slot"], 0);
    assert_eq!(body["creature"]["name"], "pikachu");

    c.send("POST", "/api/team", Some(json!({"name": "onix"}))).await;
    let (_, team) = c.send("GET", "/api/team", None).await;
    assert_eq!(team["slots"].as_array().unwrap().len(), 6);
    assert_eq!(team["slots"][1]["creature"]["name"], "onix");
    assert_eq!(team["averages"]["hp"], 35.0);

    let (status, _) = c.send("DELETE", "/api/team/0", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, team) = c.send("GET", "/api/team", None).await;
    assert!(team["slots"][0].is_null());

    let (status, _) = c.send("DELETE", "/api/team/9", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = c.send("POST", "/api/team/flush", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, team) = c.send("GET", "/api/team", None).await;
    assert!(team["averages"].is_null());
}

#[tokio::test]
async fn add_rejects_blank_unknown_and_full() {
    let mut c = Client::new();
    let (status, _) = c.send("POST", "/api/team", Some(json!({"name": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = c.send("POST", "/api/team", Some(json!({"name": "missingno"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for _ in 0..6 {
        let (status, _) = c.send("POST", "/api/team", Some(json!({"name": "magikarp"}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, body) = c.send("POST", "/api/team", Some(json!({"name": "gyarados"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ERROR: PARTY IS FULL!");
}

#[tokio::test]
async fn analyze_empty_team_is_no_data() {
    let mut c = Client::new();
    let (status, body) = c.send("POST", "/api/analyze", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "NO DATA.");
}

#[tokio::test]
async fn analyze_reports_and_records_history() {
    let mut c = Client::new();
    c.send("POST", "/api/team", Some(json!({"name": "charizard"}))).await;
    c.send("POST", "/api/team", Some(json!({"name": "blastoise"}))).await;

    let (_, m) = c.send("GET", "/api/matrix", None).await;
    assert_eq!(m["rows"].as_array().unwrap().len(), 2);
    assert_eq!(m["attacking"][12], "rock");
    assert_eq!(m["rows"][0]["cells"][12]["class"], "double_weak");

    let (status, out) = c.send("POST", "/api/analyze", Some(json!({"game": "Red / Blue / Yellow"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["verdict"]["roast"], "All water, no brain.");
    assert_eq!(out["report"]["threat_type"], "electric");
    assert_eq!(out["report"]["fire"]["name"], "charizard");
    assert_eq!(out["report"]["hire"]["name"], "onix");

    let (_, h) = c.send("GET", "/api/history", None).await;
    assert_eq!(h["entries"].as_array().unwrap().len(), 1);
    assert_eq!(h["entries"][0]["team"], json!(["charizard", "blastoise"]));
    assert_eq!(h["offenders"][0]["name"], "magikarp");
}

#[tokio::test]
async fn last_outcome_survives_reload_until_flush() {
    let mut c = Client::new();
    let (status, body) = c.send("GET", "/api/analyze", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    c.send("POST", "/api/team", Some(json!({"name": "onix"}))).await;
    c.send("POST", "/api/analyze", Some(json!({}))).await;

    let (status, body) = c.send("GET", "/api/analyze", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verdict"]["roast"], "All water, no brain.");
    assert_eq!(body["report"]["threat_type"], "water");

    c.send("POST", "/api/team/flush", None).await;
    let (_, body) = c.send("GET", "/api/analyze", None).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn dex_outage_still_roasts_without_report() {
    let dex = FlakyDex { inner: StaticDex::sample(), answered: AtomicUsize::new(0) };
    let mut c = Client::with_app(app_with(dex));
    let (status, _) = c.send("POST", "/api/team", Some(json!({"name": "pikachu"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, out) = c.send("POST", "/api/analyze", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["verdict"]["roast"], "All water, no brain.");
    assert!(out["report"].is_null());

    let (_, h) = c.send("GET", "/api/history", None).await;
    assert_eq!(h["entries"][0]["team"], json!(["pikachu"]));
}

#[tokio::test]
async fn hire_and_offenders_carry_sprites() {
    let creatures = StaticDex::sample()
        .creatures()
        .iter()
        .cloned()
        .map(|c| {
            let url = format!("https://sprites.test/{}.png", c.name);
            c.with_sprite(url)
        })
        .collect();
    let mut c = Client::with_app(app_with(StaticDex::new(creatures)));
    c.send("POST", "/api/team", Some(json!({"name": "charizard"}))).await;
    c.send("POST", "/api/team", Some(json!({"name": "blastoise"}))).await;

    let (_, out) = c.send("POST", "/api/analyze", Some(json!({}))).await;
    assert_eq!(out["report"]["hire"]["name"], "onix");
    assert_eq!(out["report"]["hire"]["sprite"], "https://sprites.test/onix.png");

    let (_, h) = c.send("GET", "/api/history", None).await;
    assert_eq!(h["offenders"][0]["name"], "magikarp");
    assert_eq!(h["offenders"][0]["times"], 1);
    assert_eq!(h["offenders"][0]["sprite"], "https://sprites.test/magikarp.png");
}
