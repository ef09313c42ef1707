//! PokeAPI v2 client.
//!
//! Read-only lookups used by the team builder and the hire suggestion:
//! * `/pokemon/{name}` for types, base stats and sprite
//! * `/pokemon-species/{name}` as a fallback when the species name differs from the
//!   default form (e.g. `deoxys` → `deoxys-normal`)
//! * `/pokedex/{name}` for a game's roster
//! * `/type/{name}` for every creature carrying a type
//!
//! Responses are cached per client for the lifetime of the process.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use color_eyre::{eyre::eyre, eyre::WrapErr, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::games::GameVersion;
use super::CreatureSource;
use crate::config::RoastConfig;
use crate::creature::{normalize_name, BaseStats, Creature};
use crate::types::ElementType;

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    types: Vec<TypeSlot>,
    stats: Vec<StatEntry>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct Variety {
    is_default: bool,
    pokemon: NamedResource,
}

#[derive(Debug, Deserialize)]
struct SpeciesResponse {
    varieties: Vec<Variety>,
}

#[derive(Debug, Deserialize)]
struct PokedexEntry {
    pokemon_species: NamedResource,
}

#[derive(Debug, Deserialize)]
struct PokedexResponse {
    pokemon_entries: Vec<PokedexEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeMember {
    pokemon: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypeResponse {
    pokemon: Vec<TypeMember>,
}

impl PokemonResponse {
    fn into_creature(self) -> Creature {
        let mut slots = self.types;
        slots.sort_by_key(|s| s.slot);
        let types = slots
            .iter()
            .filter_map(|s| match s.kind.name.parse::<ElementType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    warn!(target: "dex", name = %self.name, kind = %s.kind.name, "skipping unknown type");
                    None
                }
            })
            .collect();
        let mut stats = BaseStats::default();
        for entry in &self.stats {
            stats.set_by_api_name(&entry.stat.name, entry.base_stat);
        }
        Creature { name: self.name, types, stats, sprite: self.sprites.front_default }
    }
}

#[derive(Default)]
struct Cache {
    details: HashMap<String, Option<Creature>>,
    rosters: HashMap<String, Vec<String>>,
    by_type: HashMap<ElementType, Vec<String>>,
}

/// PokeAPI client with an in-process cache.
pub struct PokeApiClient {
    http: Client,
    base: String,
    cache: Mutex<Cache>,
}

impl PokeApiClient {
    pub fn new(config: &RoastConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("pokeroast/0.1")
            // Reasonable overall timeout so a stalled API doesn't hang the UI.
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .wrap_err("building reqwest client for PokeAPI")?;
        Ok(Self {
            http,
            base: config.pokeapi_base.trim_end_matches('/').to_string(),
            cache: Mutex::new(Cache::default()),
        })
    }

    /// GET `{base}/{path}`; 404 maps to `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}/{}", self.base, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("sending PokeAPI request {url}"))?;
        let status = resp.status();
        debug!(target: "dex", %url, status = %status, "pokeapi_response");
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(eyre!("PokeAPI status {} for {}", status.as_u16(), url));
        }
        let parsed = resp
            .json::<T>()
            .await
            .wrap_err_with(|| format!("decoding PokeAPI response {url}"))?;
        Ok(Some(parsed))
    }

    async fn fetch_details(&self, slug: &str) -> Result<Option<Creature>> {
        if let Some(p) = self.get_json::<PokemonResponse>(&format!("pokemon/{slug}")).await? {
            return Ok(Some(p.into_creature()));
        }
        // species name → default form
        let Some(species) = self.get_json::<SpeciesResponse>(&format!("pokemon-species/{slug}")).await? else {
            return Ok(None);
        };
        let Some(variety) = species.varieties.into_iter().find(|v| v.is_default) else {
            return Ok(None);
        };
        debug!(target: "dex", species = slug, form = %variety.pokemon.name, "species_fallback");
        Ok(self
            .get_json::<PokemonResponse>(&format!("pokemon/{}", variety.pokemon.name))
            .await?
            .map(PokemonResponse::into_creature))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cache> {
        // A poisoned cache only loses memoised lookups.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CreatureSource for PokeApiClient {
    #[instrument(name = "pokeapi_details", skip(self))]
    async fn details(&self, name: &str) -> Result<Option<Creature>> {
        let slug = normalize_name(name);
        if slug.is_empty() {
            return Ok(None);
        }
        let cached = self.lock().details.get(&slug).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }
        let found = self.fetch_details(&slug).await?;
        info!(target: "dex", name = %slug, found = found.is_some(), "details_fetched");
        self.lock().details.insert(slug, found.clone());
        Ok(found)
    }

    #[instrument(name = "pokeapi_roster", skip(self, game), fields(game = %game.name))]
    async fn roster(&self, game: &GameVersion) -> Result<Vec<String>> {
        let cached = self.lock().rosters.get(&game.name).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }
        let mut names = BTreeSet::new();
        for dex in &game.pokedexes {
            match self.get_json::<PokedexResponse>(&format!("pokedex/{dex}")).await? {
                Some(resp) => names.extend(resp.pokemon_entries.into_iter().map(|e| e.pokemon_species.name)),
                None => warn!(target: "dex", pokedex = %dex, "pokedex not found"),
            }
        }
        let roster: Vec<String> = names.into_iter().collect();
        info!(target: "dex", game = %game.name, size = roster.len(), "roster_fetched");
        self.lock().rosters.insert(game.name.clone(), roster.clone());
        Ok(roster)
    }

    #[instrument(name = "pokeapi_members_of_type", skip(self))]
    async fn members_of_type(&self, t: ElementType) -> Result<Vec<String>> {
        let cached = self.lock().by_type.get(&t).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }
        let members: Vec<String> = self
            .get_json::<TypeResponse>(&format!("type/{t}"))
            .await?
            .map(|r| r.pokemon.into_iter().map(|m| m.pokemon.name).collect())
            .unwrap_or_default();
        self.lock().by_type.insert(t, members.clone());
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pokemon_response_maps_to_creature() {
        let raw = r#"{
            "name": "charizard",
            "types": [
                {"slot": 2, "type": {"name": "flying", "url": ""}},
                {"slot": 1, "type": {"name": "fire", "url": ""}}
            ],
            "stats": [
                {"base_stat": 78, "effort": 0, "stat": {"name": "hp"}},
                {"base_stat": 109, "effort": 3, "stat": {"name": "special-attack"}},
                {"base_stat": 100, "effort": 0, "stat": {"name": "speed"}}
            ],
            "sprites": {"front_default": "https://example.test/6.png"}
        }"#;
        let parsed: PokemonResponse = serde_json::from_str(raw).unwrap();
        let c = parsed.into_creature();
        assert_eq!(c.types, vec![ElementType::Fire, ElementType::Flying]);
        assert_eq!(c.stats.hp, 78);
        assert_eq!(c.stats.special_attack, 109);
        assert_eq!(c.sprite.as_deref(), Some("https://example.test/6.png"));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let mut cfg = RoastConfig::default();
        cfg.pokeapi_base = "https://pokeapi.test/api/v2/".into();
        let c = PokeApiClient::new(&cfg).unwrap();
        assert_eq!(c.base, "https://pokeapi.test/api/v2");
    }
}
