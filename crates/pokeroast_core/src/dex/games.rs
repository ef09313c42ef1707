//! ゲームバージョン → 地方図鑑 の対応表

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    /// 表示名 (批評プロンプトの文脈にも使う)
    pub name: String,
    /// PokeAPI の pokedex 名
    pub pokedexes: Vec<String>,
}

impl GameVersion {
    fn new(name: &str, pokedexes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            pokedexes: pokedexes.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCatalog {
    games: Vec<GameVersion>,
}

impl GameCatalog {
    pub fn standard() -> Self {
        Self {
            games: vec![
                GameVersion::new("Red / Blue / Yellow", &["kanto"]),
                GameVersion::new("Gold / Silver / Crystal", &["original-johto"]),
                GameVersion::new("Ruby / Sapphire / Emerald", &["hoenn"]),
                GameVersion::new("FireRed / LeafGreen", &["kanto"]),
                GameVersion::new("Diamond / Pearl", &["original-sinnoh"]),
                GameVersion::new("Platinum", &["extended-sinnoh"]),
                GameVersion::new("HeartGold / SoulSilver", &["updated-johto"]),
                GameVersion::new("Black / White", &["original-unova"]),
                GameVersion::new("Black 2 / White 2", &["updated-unova"]),
                GameVersion::new("X / Y", &["kalos-central", "kalos-coastal", "kalos-mountain"]),
                GameVersion::new("Omega Ruby / Alpha Sapphire", &["updated-hoenn"]),
                GameVersion::new("Sun / Moon", &["original-alola"]),
                GameVersion::new("Ultra Sun / Ultra Moon", &["updated-alola"]),
                GameVersion::new("Sword / Shield", &["galar"]),
                GameVersion::new("Scarlet / Violet", &["paldea"]),
                GameVersion::new("National Dex", &["national"]),
            ],
        }
    }

    pub fn shared() -> &'static GameCatalog {
        &CATALOG
    }

    pub fn games(&self) -> &[GameVersion] {
        &self.games
    }

    pub fn names(&self) -> Vec<&str> {
        self.games.iter().map(|g| g.name.as_str()).collect()
    }

    /// 表示名で検索 (大文字小文字は区別しない)
    pub fn find(&self, name: &str) -> Option<&GameVersion> {
        let name = name.trim();
        self.games.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// 見つからなければ `fallback`、それも無ければ先頭
    pub fn find_or(&self, name: &str, fallback: &str) -> &GameVersion {
        self.find(name)
            .or_else(|| self.find(fallback))
            .unwrap_or(&self.games[0])
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

lazy_static! {
    static ref CATALOG: GameCatalog = GameCatalog::standard();
}
