use serde::{Deserialize, Serialize};

use crate::types::ElementType;

/// 種族値 (6項目)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    pub fn new(hp: u32, attack: u32, defense: u32, special_attack: u32, special_defense: u32, speed: u32) -> Self {
        Self { hp, attack, defense, special_attack, special_defense, speed }
    }

    pub fn total(&self) -> u32 {
        self.hp + self.attack + self.defense + self.special_attack + self.special_defense + self.speed
    }

    /// APIの stat 名 ("special-attack" など) で値を設定。未知の名前は false
    pub fn set_by_api_name(&mut self, name: &str, value: u32) -> bool {
        match name {
            "hp" => self.hp = value,
            "attack" => self.attack = value,
            "defense" => self.defense = value,
            "special-attack" => self.special_attack = value,
            "special-defense" => self.special_defense = value,
            "speed" => self.speed = value,
            _ => return false,
        }
        true
    }
}

/// 平均種族値 (レーダーチャート用)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatAverages {
    pub hp: f64,
    pub attack: f64,
    pub defense: f64,
    pub special_attack: f64,
    pub special_defense: f64,
    pub speed: f64,
}

impl StatAverages {
    /// 表示ラベルと値の組 (チャートの軸順)
    pub fn axes(&self) -> [(&'static str, f64); 6] {
        [
            ("HP", self.hp),
            ("ATTACK", self.attack),
            ("DEFENSE", self.defense),
            ("SPECIAL-ATTACK", self.special_attack),
            ("SPECIAL-DEFENSE", self.special_defense),
            ("SPEED", self.speed),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    /// スロット順で1〜2個
    pub types: Vec<ElementType>,
    pub stats: BaseStats,
    pub sprite: Option<String>,
}

impl Creature {
    pub fn new<S: Into<String>>(name: S, types: Vec<ElementType>, stats: BaseStats) -> Self {
        Self { name: name.into(), types, stats, sprite: None }
    }

    pub fn with_sprite<S: Into<String>>(mut self, sprite: S) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn has_type(&self, t: ElementType) -> bool {
        self.types.contains(&t)
    }

    /// "fire/flying" 形式
    pub fn type_label(&self) -> String {
        self.types.iter().map(|t| t.as_str()).collect::<Vec<_>>().join("/")
    }
}

/// 名前をAPIのスラッグ形式に正規化 (小文字・前後空白除去・空白→ハイフン)
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_case_and_spaces() {
        assert_eq!(normalize_name("  Mr Mime "), "mr-mime");
        assert_eq!(normalize_name("PIKACHU"), "pikachu");
    }

    #[test]
    fn stats_by_api_name() {
        let mut s = BaseStats::default();
        assert!(s.set_by_api_name("special-attack", 120));
        assert!(!s.set_by_api_name("accuracy", 1));
        assert_eq!(s.special_attack, 120);
        assert_eq!(BaseStats::new(1, 2, 3, 4, 5, 6).total(), 21);
    }
}
