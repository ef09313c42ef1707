//! 固定データの図鑑 (テスト・オフライン用)

use color_eyre::Result;

use super::games::GameVersion;
use super::CreatureSource;
use crate::creature::{normalize_name, BaseStats, Creature};
use crate::types::ElementType;

/// メモリ上の図鑑。全ゲームで同じ名簿を返す
#[derive(Debug, Clone, Default)]
pub struct StaticDex {
    creatures: Vec<Creature>,
}

impl StaticDex {
    pub fn new(creatures: Vec<Creature>) -> Self {
        Self { creatures }
    }

    /// カントー御三家などの小さな見本データ
    pub fn sample() -> Self {
        use ElementType::*;
        let mk = |name: &str, types: &[ElementType], s: [u32; 6]| {
            Creature::new(name, types.to_vec(), BaseStats::new(s[0], s[1], s[2], s[3], s[4], s[5]))
        };
        Self::new(vec![
            mk("bulbasaur", &[Grass, Poison], [45, 49, 49, 65, 65, 45]),
            mk("charizard", &[Fire, Flying], [78, 84, 78, 109, 85, 100]),
            mk("blastoise", &[Water], [79, 83, 100, 85, 105, 78]),
            mk("pikachu", &[Electric], [35, 55, 40, 50, 50, 90]),
            mk("gyarados", &[Water, Flying], [95, 125, 79, 60, 100, 81]),
            mk("magikarp", &[Water], [20, 10, 55, 15, 20, 80]),
            mk("snorlax", &[Normal], [160, 110, 65, 65, 110, 30]),
            mk("gengar", &[Ghost, Poison], [60, 65, 60, 130, 75, 110]),
            mk("onix", &[Rock, Ground], [35, 45, 160, 30, 45, 70]),
            mk("dragonite", &[Dragon, Flying], [91, 134, 95, 100, 100, 80]),
            mk("steelix", &[Steel, Ground], [75, 85, 200, 55, 65, 30]),
            mk("sylveon", &[Fairy], [95, 65, 65, 110, 130, 60]),
        ])
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }
}

impl CreatureSource for StaticDex {
    async fn details(&self, name: &str) -> Result<Option<Creature>> {
        let slug = normalize_name(name);
        Ok(self.creatures.iter().find(|c| c.name == slug).cloned())
    }

    async fn roster(&self, _game: &GameVersion) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.creatures.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn members_of_type(&self, t: ElementType) -> Result<Vec<String>> {
        Ok(self
            .creatures
            .iter()
            .filter(|c| c.has_type(t))
            .map(|c| c.name.clone())
            .collect())
    }
}
