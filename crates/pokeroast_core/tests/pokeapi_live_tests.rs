use color_eyre::Result;
use pokeroast_core::dex::{CreatureSource, GameCatalog, PokeApiClient};
use pokeroast_core::{ElementType, RoastConfig};

// Load .env before tests in this integration test binary
#[ctor::ctor]
fn _load_dotenv() { let _ = dotenvy::dotenv(); }

/// 実際に PokeAPI を叩くテスト。既定では無効
/// 実行: `cargo test -p pokeroast_core -- --ignored`
#[tokio::test]
#[ignore]
async fn live_details_and_species_fallback() -> Result<()> {
    let client = PokeApiClient::new(&RoastConfig::new())?;
    let c = client.details("Charizard").await?.expect("charizard exists");
    assert_eq!(c.types, vec![ElementType::Fire, ElementType::Flying]);
    assert!(c.sprite.is_some());

    // 種族名のみのポケモンは既定フォームに解決される
    let d = client.details("deoxys").await?.expect("deoxys resolves");
    assert!(d.name.starts_with("deoxys"));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_roster_and_type_members() -> Result<()> {
    let client = PokeApiClient::new(&RoastConfig::new())?;
    let kanto = GameCatalog::shared().find("Red / Blue / Yellow").expect("catalog entry");
    let roster = client.roster(kanto).await?;
    assert_eq!(roster.len(), 151);
    assert!(roster.contains(&"mew".to_string()));

    let ground = client.members_of_type(ElementType::Ground).await?;
    assert!(ground.iter().any(|n| n == "onix"));
    Ok(())
}
