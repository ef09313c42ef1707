//! 図鑑データの取得元
//!
//! 外部API (`PokeApiClient`) とテスト/オフライン用の固定データ (`StaticDex`) を
//! 同じ `CreatureSource` トレイトで扱う。

pub mod games;
pub mod pokeapi;
pub mod fixture;

use std::future::Future;

use color_eyre::Result;

use crate::creature::Creature;
use crate::types::ElementType;

pub use fixture::StaticDex;
pub use games::{GameCatalog, GameVersion};
pub use pokeapi::PokeApiClient;

/// 図鑑データの取得元
pub trait CreatureSource: Send + Sync {
    /// 名前から詳細を取得。存在しなければ `Ok(None)`
    fn details(&self, name: &str) -> impl Future<Output = Result<Option<Creature>>> + Send;

    /// ゲームで入手可能な名前一覧 (重複なし・昇順)
    fn roster(&self, game: &GameVersion) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// 指定タイプを持つ名前一覧 (取得元の順)
    fn members_of_type(&self, t: ElementType) -> impl Future<Output = Result<Vec<String>>> + Send;
}
