//! タイプ相性表
//!
//! 18種類のタイプと、(防御タイプ, 攻撃タイプ) → 倍率 の静的な相性表を提供する。
//! 表に載っていない組み合わせは等倍 (1.0) として扱う。
//! 攻撃タイプの走査順は表の防御タイプ行の挿入順 (= `ElementType::ALL` の順) に一致する。

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::{eyre, Report};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// 属性タイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl ElementType {
    /// 相性表の正規順
    pub const ALL: [ElementType; 18] = [
        ElementType::Normal,
        ElementType::Fire,
        ElementType::Water,
        ElementType::Electric,
        ElementType::Grass,
        ElementType::Ice,
        ElementType::Fighting,
        ElementType::Poison,
        ElementType::Ground,
        ElementType::Flying,
        ElementType::Psychic,
        ElementType::Bug,
        ElementType::Rock,
        ElementType::Ghost,
        ElementType::Dragon,
        ElementType::Dark,
        ElementType::Steel,
        ElementType::Fairy,
    ];

    /// API上の小文字名
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Normal => "normal",
            ElementType::Fire => "fire",
            ElementType::Water => "water",
            ElementType::Electric => "electric",
            ElementType::Grass => "grass",
            ElementType::Ice => "ice",
            ElementType::Fighting => "fighting",
            ElementType::Poison => "poison",
            ElementType::Ground => "ground",
            ElementType::Flying => "flying",
            ElementType::Psychic => "psychic",
            ElementType::Bug => "bug",
            ElementType::Rock => "rock",
            ElementType::Ghost => "ghost",
            ElementType::Dragon => "dragon",
            ElementType::Dark => "dark",
            ElementType::Steel => "steel",
            ElementType::Fairy => "fairy",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| eyre!("unknown element type: {s}"))
    }
}

/// 防御タイプ1行分
#[derive(Debug, Clone, PartialEq)]
struct ChartRow {
    defending: ElementType,
    entries: HashMap<ElementType, f64>,
}

/// タイプ相性表 (防御側キー)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChart {
    rows: Vec<ChartRow>,
}

impl TypeChart {
    /// 防御タイプ行の列から表を作る。行の順序が攻撃タイプの走査順になる。
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (ElementType, Vec<(ElementType, f64)>)>,
    {
        let rows = rows
            .into_iter()
            .map(|(defending, entries)| ChartRow {
                defending,
                entries: entries.into_iter().collect(),
            })
            .collect();
        Self { rows }
    }

    /// 第6世代以降の標準相性表
    pub fn standard() -> Self {
        use ElementType::*;
        Self::from_rows([
            (Normal, vec![(Fighting, 2.0), (Ghost, 0.0)]),
            (Fire, vec![
                (Water, 2.0), (Ground, 2.0), (Rock, 2.0),
                (Fire, 0.5), (Grass, 0.5), (Ice, 0.5), (Bug, 0.5), (Steel, 0.5), (Fairy, 0.5),
            ]),
            (Water, vec![
                (Electric, 2.0), (Grass, 2.0),
                (Fire, 0.5), (Water, 0.5), (Ice, 0.5), (Steel, 0.5),
            ]),
            (Electric, vec![(Ground, 2.0), (Electric, 0.5), (Flying, 0.5), (Steel, 0.5)]),
            (Grass, vec![
                (Fire, 2.0), (Ice, 2.0), (Poison, 2.0), (Flying, 2.0), (Bug, 2.0),
                (Water, 0.5), (Electric, 0.5), (Grass, 0.5), (Ground, 0.5),
            ]),
            (Ice, vec![(Fire, 2.0), (Fighting, 2.0), (Rock, 2.0), (Steel, 2.0), (Ice, 0.5)]),
            (Fighting, vec![
                (Flying, 2.0), (Psychic, 2.0), (Fairy, 2.0),
                (Bug, 0.5), (Rock, 0.5), (Dark, 0.5),
            ]),
            (Poison, vec![
                (Ground, 2.0), (Psychic, 2.0),
                (Grass, 0.5), (Fighting, 0.5), (Poison, 0.5), (Bug, 0.5), (Fairy, 0.5),
            ]),
            (Ground, vec![
                (Water, 2.0), (Grass, 2.0), (Ice, 2.0),
                (Poison, 0.5), (Rock, 0.5), (Electric, 0.0),
            ]),
            (Flying, vec![
                (Electric, 2.0), (Ice, 2.0), (Rock, 2.0),
                (Grass, 0.5), (Fighting, 0.5), (Bug, 0.5), (Ground, 0.0),
            ]),
            (Psychic, vec![(Bug, 2.0), (Ghost, 2.0), (Dark, 2.0), (Fighting, 0.5), (Psychic, 0.5)]),
            (Bug, vec![
                (Fire, 2.0), (Flying, 2.0), (Rock, 2.0),
                (Grass, 0.5), (Fighting, 0.5), (Ground, 0.5),
            ]),
            (Rock, vec![
                (Water, 2.0), (Grass, 2.0), (Fighting, 2.0), (Ground, 2.0), (Steel, 2.0),
                (Normal, 0.5), (Fire, 0.5), (Poison, 0.5), (Flying, 0.5),
            ]),
            (Ghost, vec![
                (Ghost, 2.0), (Dark, 2.0),
                (Poison, 0.5), (Bug, 0.5), (Normal, 0.0), (Fighting, 0.0),
            ]),
            (Dragon, vec![
                (Ice, 2.0), (Dragon, 2.0), (Fairy, 2.0),
                (Fire, 0.5), (Water, 0.5), (Electric, 0.5), (Grass, 0.5),
            ]),
            (Dark, vec![
                (Fighting, 2.0), (Bug, 2.0), (Fairy, 2.0),
                (Ghost, 0.5), (Dark, 0.5), (Psychic, 0.0),
            ]),
            (Steel, vec![
                (Fire, 2.0), (Fighting, 2.0), (Ground, 2.0),
                (Normal, 0.5), (Grass, 0.5), (Ice, 0.5), (Flying, 0.5), (Psychic, 0.5),
                (Bug, 0.5), (Rock, 0.5), (Dragon, 0.5), (Steel, 0.5), (Fairy, 0.5),
                (Poison, 0.0),
            ]),
            (Fairy, vec![
                (Poison, 2.0), (Steel, 2.0),
                (Fighting, 0.5), (Bug, 0.5), (Dark, 0.5), (Dragon, 0.0),
            ]),
        ])
    }

    /// 共有の標準表
    pub fn shared() -> &'static TypeChart {
        &STANDARD_CHART
    }

    /// 単タイプの倍率。未登録なら 1.0
    pub fn multiplier(&self, defending: ElementType, attacking: ElementType) -> f64 {
        self.rows
            .iter()
            .find(|r| r.defending == defending)
            .and_then(|r| r.entries.get(&attacking).copied())
            .unwrap_or(1.0)
    }

    /// 攻撃タイプの走査順 (防御タイプ行の挿入順)
    pub fn attacking_types(&self) -> impl Iterator<Item = ElementType> + '_ {
        self.rows.iter().map(|r| r.defending)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        STANDARD_CHART.clone()
    }
}

lazy_static! {
    static ref STANDARD_CHART: TypeChart = TypeChart::standard();
}
