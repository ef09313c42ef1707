//! 図鑑・批評ワーカー（TUIとは別スレッドで動く）
//!
//! 専用スレッドで Tokio ランタイムを持ち、`Request` を受けて `Reply` を返す。
//! UI側は `try_recv` でポーリングするので描画が止まらない。

use std::sync::mpsc::{Receiver, Sender};

use color_eyre::Result;
use tokio::runtime::Runtime;
use tracing::{error, info, instrument, warn};

use pokeroast_core::dex::CreatureSource;
use pokeroast_core::roast::ChatBackend;
use pokeroast_core::speech::Narrator;
use pokeroast_core::{AnalysisOutcome, Creature, RoastConfig, RoastService, ShameEntry, ShameLog};

/// UI → ワーカー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// 名前から詳細を引く
    Lookup(String),
    /// ゲームの名簿
    Roster(String),
    /// 批評と人事レポート
    Analyze { game: String, names: Vec<String> },
}

/// ワーカー → UI。エラーは表示用の文字列
#[derive(Debug, Clone)]
pub enum Reply {
    Creature { requested: String, result: std::result::Result<Option<Creature>, String> },
    Roster { game: String, result: std::result::Result<Vec<String>, String> },
    /// 図鑑に届かなければ report は None
    Analysis(AnalysisOutcome),
}

/// 本番構成でワーカーを開始
pub fn start_live_worker(rx: Receiver<Request>, tx: Sender<Reply>, config: RoastConfig) -> Result<()> {
    let service = RoastService::from_config(&config)?;
    let history = match ShameLog::open_or_create(&config.history_path) {
        Ok(log) => Some(log),
        Err(e) => {
            warn!(target: "worker", error = %e, "history unavailable; roasts will not be recorded");
            None
        }
    };
    start_worker(service, history, Narrator::from_config(&config), rx, tx);
    Ok(())
}

/// 任意の取得元・バックエンドでワーカーを開始
pub fn start_worker<S, B>(
    service: RoastService<S, B>,
    mut history: Option<ShameLog>,
    narrator: Narrator,
    rx: Receiver<Request>,
    tx: Sender<Reply>,
) where
    S: CreatureSource + 'static,
    B: ChatBackend + 'static,
{
    std::thread::spawn(move || {
        // 専用スレッド内でTokioランタイムを構築
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!(target: "worker", error = %e, "tokio runtime could not start");
                return;
            }
        };
        rt.block_on(async move {
            while let Ok(req) = rx.recv() {
                info!(target: "worker", request = ?req, "request_received");
                let reply = process_request(&service, history.as_mut(), &narrator, req).await;
                if tx.send(reply).is_err() {
                    // UI側が閉じた
                    break;
                }
            }
        });
    });
}

#[instrument(name = "process_request", skip(service, history, narrator))]
async fn process_request<S: CreatureSource, B: ChatBackend>(
    service: &RoastService<S, B>,
    history: Option<&mut ShameLog>,
    narrator: &Narrator,
    req: Request,
) -> Reply {
    match req {
        Request::Lookup(requested) => {
            let result = service.lookup(&requested).await.map_err(|e| e.to_string());
            Reply::Creature { requested, result }
        }
        Request::Roster(game) => {
            let result = service.roster(&game).await.map_err(|e| e.to_string());
            Reply::Roster { game, result }
        }
        Request::Analyze { game, names } => {
            let outcome = service.analyze_names(&game, &names).await;

            if let Some(log) = history {
                let entry = ShameEntry::new(names, &outcome.verdict.roast, &outcome.verdict.worst_pokemon, &game);
                if let Err(e) = log.append(&entry) {
                    error!(target: "worker", error = %e, "history append failed");
                }
            }
            narrator.narrate(&outcome.verdict.roast);
            Reply::Analysis(outcome)
        }
    }
}
