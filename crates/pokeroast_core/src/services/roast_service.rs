//! RoastService
//!
//! 図鑑取得・相性分析・LLM批評をまとめたビジネスロジック層。
//! UI層（TUI/Web）から独立した形で分析機能を提供。

use std::collections::HashSet;

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::analysis::{self, Hire, TacticalReport};
use crate::config::RoastConfig;
use crate::creature::{normalize_name, Creature};
use crate::dex::{CreatureSource, GameCatalog, PokeApiClient};
use crate::roast::{ChatBackend, OpenAiBackend, Roaster, RoastVerdict};
use crate::types::{ElementType, TypeChart};

/// 1回の分析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub game: String,
    pub verdict: RoastVerdict,
    /// 空チーム、または図鑑取得に失敗した場合は `None`
    pub report: Option<TacticalReport>,
}

/// 分析サービス
pub struct RoastService<S, B> {
    source: S,
    roaster: Roaster<B>,
    chart: TypeChart,
    catalog: GameCatalog,
    default_game: String,
}

impl RoastService<PokeApiClient, OpenAiBackend> {
    /// PokeAPI + OpenAI互換API の本番構成
    pub fn from_config(config: &RoastConfig) -> Result<Self> {
        let source = PokeApiClient::new(config)?;
        let roaster = Roaster::new(OpenAiBackend::new(config), config.models.clone());
        Ok(Self::new(source, roaster).with_default_game(&config.default_game))
    }
}

impl<S: CreatureSource, B: ChatBackend> RoastService<S, B> {
    /// 新しいRoastServiceインスタンスを作成
    pub fn new(source: S, roaster: Roaster<B>) -> Self {
        Self {
            source,
            roaster,
            chart: TypeChart::default(),
            catalog: GameCatalog::default(),
            default_game: String::new(),
        }
    }

    pub fn with_default_game(mut self, game: &str) -> Self {
        self.default_game = game.to_string();
        self
    }

    pub fn chart(&self) -> &TypeChart {
        &self.chart
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// 既定ゲーム名 (カタログに無ければ先頭)
    pub fn default_game(&self) -> &str {
        &self.catalog.find_or(&self.default_game, &self.default_game).name
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 名前から詳細を取得
    pub async fn lookup(&self, name: &str) -> Result<Option<Creature>> {
        self.source.details(name).await
    }

    /// ゲームの名簿 (未知のゲーム名は既定ゲーム扱い)
    pub async fn roster(&self, game: &str) -> Result<Vec<String>> {
        let version = self.catalog.find_or(game, &self.default_game);
        self.source.roster(version).await
    }

    /// 名前一覧を詳細に解決。見つからない名前は読み飛ばす
    pub async fn resolve_team(&self, names: &[String]) -> Result<Vec<Creature>> {
        let mut team = Vec::with_capacity(names.len());
        for name in names {
            match self.source.details(name).await? {
                Some(c) => team.push(c),
                None => warn!(target: "roast_service", %name, "unknown creature skipped"),
            }
        }
        Ok(team)
    }

    /// 弱点タイプを受けられる補強候補を探す
    ///
    /// 耐性タイプを倍率の低い順に見て、そのタイプを持つ名前のうち
    /// 名簿に載っていてチームにいない最初の1体を選ぶ。名簿が空なら名簿条件は無視する。
    #[instrument(name = "recommend_hire", skip(self, team, roster), fields(threat = %threat))]
    pub async fn recommend_hire(&self, threat: ElementType, team: &[Creature], roster: &[String]) -> Result<Option<Hire>> {
        let allowed: HashSet<String> = roster.iter().map(|n| normalize_name(n)).collect();
        let taken: HashSet<String> = team.iter().map(|c| normalize_name(&c.name)).collect();

        for (resist_type, _) in analysis::resisting_types(&self.chart, threat) {
            for candidate in self.source.members_of_type(resist_type).await? {
                let slug = normalize_name(&candidate);
                if taken.contains(&slug) || (!allowed.is_empty() && !allowed.contains(&slug)) {
                    continue;
                }
                let details = self.source.details(&slug).await?;
                let (sprite, multiplier) = match &details {
                    Some(c) => (c.sprite.clone(), analysis::defensive_multiplier(&self.chart, &c.types, threat)),
                    None => (None, self.chart.multiplier(resist_type, threat)),
                };
                // 複合タイプで耐性が打ち消される候補は除外
                if multiplier >= 1.0 {
                    continue;
                }
                return Ok(Some(Hire { name: slug, sprite, multiplier }));
            }
        }
        Ok(None)
    }

    /// 最大弱点・解雇候補・補強候補のレポート。空チームは `None`
    pub async fn tactical_report(&self, team: &[Creature], roster: &[String]) -> Result<Option<TacticalReport>> {
        let Some(worst) = analysis::worst_weakness(&self.chart, team) else {
            return Ok(None);
        };
        let fire = analysis::most_exposed(&self.chart, team, worst.attacking);
        let hire = self.recommend_hire(worst.attacking, team, roster).await?;
        Ok(Some(TacticalReport {
            threat_type: worst.attacking,
            threat_score: worst.score,
            fire,
            hire,
        }))
    }

    /// 批評 (モデルフェイルオーバー付き) とレポートをまとめて実行
    ///
    /// 批評は失敗しない。レポート作成の失敗はログに残して `report: None` にする。
    #[instrument(name = "analyze", skip(self, team, roster), fields(team_len = team.len()))]
    pub async fn analyze(&self, game: &str, team: &[Creature], roster: &[String]) -> AnalysisOutcome {
        let names: Vec<&str> = team.iter().map(|c| c.name.as_str()).collect();
        let verdict = self.roast_names(&names, game).await;

        let report = match self.tactical_report(team, roster).await {
            Ok(r) => r,
            Err(e) => {
                warn!(target: "roast_service", error = %e, "tactical_report_failed");
                None
            }
        };
        info!(target: "roast_service", synthetic = verdict.is_synthetic(), has_report = report.is_some(), "analysis_done");
        AnalysisOutcome { game: game.to_string(), verdict, report }
    }

    /// 名前のまま分析する (名簿取得・図鑑解決込み)
    ///
    /// 図鑑に届かない場合も批評は名前だけで行い、`report: None` を返す。
    /// 名簿が取れない場合は補強候補の名簿条件が外れるだけ。
    #[instrument(name = "analyze_names", skip(self, names), fields(team_len = names.len()))]
    pub async fn analyze_names(&self, game: &str, names: &[String]) -> AnalysisOutcome {
        let team = match self.resolve_team(names).await {
            Ok(t) => t,
            Err(e) => {
                warn!(target: "roast_service", error = %e, "team_resolve_failed");
                let verdict = self.roast_names(names, game).await;
                return AnalysisOutcome { game: game.to_string(), verdict, report: None };
            }
        };
        let roster = match self.roster(game).await {
            Ok(r) => r,
            Err(e) => {
                warn!(target: "roast_service", error = %e, "roster_unavailable");
                Vec::new()
            }
        };
        self.analyze(game, &team, &roster).await
    }

    async fn roast_names<N: AsRef<str> + Sync>(&self, names: &[N], game: &str) -> RoastVerdict {
        self.roaster
            .roast_with_logger(names, game, |ev| {
                tracing::info!(target: "roast_service", event = %ev, "step");
            })
            .await
    }
}
