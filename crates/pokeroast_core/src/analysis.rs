//! チーム相性分析
//!
//! 防御倍率の集計、チーム全体の最大弱点 (脅威スコア)、その弱点に最も晒されている
//! メンバー、弱点を半減以下で受けられるタイプの列挙を行う。
//!
//! * 防御倍率: メンバーの各タイプについて `chart[t][攻撃]` の積 (未登録は 1.0)
//! * 脅威スコア: 倍率が 2.0 以上のメンバーについて `倍率 × 2` を合計
//! * 最大弱点: 脅威スコア最大の攻撃タイプ。同点は表の走査順で先のもの

use serde::{Deserialize, Serialize};

use crate::creature::{Creature, StatAverages};
use crate::types::{ElementType, TypeChart};

/// 脅威スコアに算入する倍率の下限
pub const WEAKNESS_THRESHOLD: f64 = 2.0;

/// 1〜2タイプの合成防御倍率
pub fn defensive_multiplier(chart: &TypeChart, types: &[ElementType], attacking: ElementType) -> f64 {
    types
        .iter()
        .map(|t| chart.multiplier(*t, attacking))
        .product()
}

/// 倍率の区分 (マトリクスの色分け用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    Immune,
    DoubleResist,
    Resist,
    Neutral,
    Weak,
    DoubleWeak,
}

impl Effectiveness {
    pub fn from_multiplier(m: f64) -> Self {
        if m <= 0.0 {
            Effectiveness::Immune
        } else if m <= 0.25 {
            Effectiveness::DoubleResist
        } else if m <= 0.5 {
            Effectiveness::Resist
        } else if m <= 1.0 {
            Effectiveness::Neutral
        } else if m <= 2.0 {
            Effectiveness::Weak
        } else {
            Effectiveness::DoubleWeak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Effectiveness::Immune => "immune",
            Effectiveness::DoubleResist => "double_resist",
            Effectiveness::Resist => "resist",
            Effectiveness::Neutral => "neutral",
            Effectiveness::Weak => "weak",
            Effectiveness::DoubleWeak => "double_weak",
        }
    }
}

/// 防御マトリクスの1行 (メンバー1体分)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub name: String,
    pub multipliers: Vec<f64>,
}

/// メンバー × 攻撃タイプ の防御倍率表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseMatrix {
    pub attacking: Vec<ElementType>,
    pub rows: Vec<MatrixRow>,
}

impl DefenseMatrix {
    pub fn get(&self, row: usize, attacking: ElementType) -> Option<f64> {
        let col = self.attacking.iter().position(|t| *t == attacking)?;
        self.rows.get(row).and_then(|r| r.multipliers.get(col)).copied()
    }
}

pub fn defense_matrix(chart: &TypeChart, team: &[Creature]) -> DefenseMatrix {
    let attacking: Vec<ElementType> = chart.attacking_types().collect();
    let rows = team
        .iter()
        .map(|member| MatrixRow {
            name: member.name.clone(),
            multipliers: attacking
                .iter()
                .map(|a| defensive_multiplier(chart, &member.types, *a))
                .collect(),
        })
        .collect();
    DefenseMatrix { attacking, rows }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatScore {
    pub attacking: ElementType,
    pub score: f64,
}

/// 攻撃タイプごとの脅威スコア (表の走査順)
pub fn threat_scores(chart: &TypeChart, team: &[Creature]) -> Vec<ThreatScore> {
    chart
        .attacking_types()
        .map(|attacking| {
            let score = team
                .iter()
                .map(|m| defensive_multiplier(chart, &m.types, attacking))
                .filter(|mul| *mul >= WEAKNESS_THRESHOLD)
                .map(|mul| mul * 2.0)
                .sum();
            ThreatScore { attacking, score }
        })
        .collect()
}

/// チーム全体の最大弱点。空チームは `None`
///
/// 全スコアが 0 の場合も同点扱いなので、走査順で最初の攻撃タイプが返る。
pub fn worst_weakness(chart: &TypeChart, team: &[Creature]) -> Option<ThreatScore> {
    if team.is_empty() {
        return None;
    }
    let mut best: Option<ThreatScore> = None;
    for ts in threat_scores(chart, team) {
        match best {
            Some(b) if ts.score <= b.score => {}
            _ => best = Some(ts),
        }
    }
    best
}

/// 弱点に最も晒されているメンバー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub name: String,
    pub multiplier: f64,
}

/// `attacking` に対する倍率が最大のメンバー (同点は先頭)。全員 0 倍なら `None`
pub fn most_exposed(chart: &TypeChart, team: &[Creature], attacking: ElementType) -> Option<Liability> {
    let mut best: Option<Liability> = None;
    for member in team {
        let mul = defensive_multiplier(chart, &member.types, attacking);
        let current = best.as_ref().map(|b| b.multiplier).unwrap_or(0.0);
        if mul > current {
            best = Some(Liability { name: member.name.clone(), multiplier: mul });
        }
    }
    best
}

/// `attacking` を等倍未満で受ける単タイプ。倍率昇順 (無効が先)、同倍率は表の順
pub fn resisting_types(chart: &TypeChart, attacking: ElementType) -> Vec<(ElementType, f64)> {
    let mut out: Vec<(ElementType, f64)> = chart
        .attacking_types()
        .map(|d| (d, chart.multiplier(d, attacking)))
        .filter(|(_, m)| *m < 1.0)
        .collect();
    // 安定ソートなので同倍率は表の順が保たれる
    out.sort_by(|a, b| a.1.total_cmp(&b.1));
    out
}

/// 種族値の平均。空チームは `None`
pub fn average_stats(team: &[Creature]) -> Option<StatAverages> {
    if team.is_empty() {
        return None;
    }
    let n = team.len() as f64;
    let sum = |f: fn(&Creature) -> u32| team.iter().map(|c| f64::from(f(c))).sum::<f64>() / n;
    Some(StatAverages {
        hp: sum(|c| c.stats.hp),
        attack: sum(|c| c.stats.attack),
        defense: sum(|c| c.stats.defense),
        special_attack: sum(|c| c.stats.special_attack),
        special_defense: sum(|c| c.stats.special_defense),
        speed: sum(|c| c.stats.speed),
    })
}

/// 補強候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hire {
    pub name: String,
    pub sprite: Option<String>,
    /// 候補が受ける倍率
    pub multiplier: f64,
}

/// 最大弱点・解雇候補・補強候補をまとめた人事レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalReport {
    pub threat_type: ElementType,
    pub threat_score: f64,
    pub fire: Option<Liability>,
    pub hire: Option<Hire>,
}
