use color_eyre::{eyre::eyre, Result};
use pokeroast_core::dex::{CreatureSource, GameVersion, StaticDex};
use pokeroast_core::roast::Roaster;
use pokeroast_core::{Creature, ElementType, RoastService};
mod common;
use common::scripted::ScriptedBackend;

#[ctor::ctor]
fn _init() { common::init(); }

const REPLY: &str = r#"{"roast": "Two starters and no plan.", "worst_pokemon": "charizard"}"#;

fn service(replies: usize) -> RoastService<StaticDex, ScriptedBackend> {
    let roaster = Roaster::new(ScriptedBackend::always(REPLY, replies), vec!["m1".into()]);
    RoastService::new(StaticDex::sample(), roaster).with_default_game("Red / Blue / Yellow")
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn lookup_normalises_names() -> Result<()> {
    let svc = service(0);
    let c = svc.lookup("  Charizard ").await?.unwrap();
    assert_eq!(c.types, vec![ElementType::Fire, ElementType::Flying]);
    assert!(svc.lookup("missingno").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_game_uses_default_roster() -> Result<()> {
    let svc = service(0);
    assert_eq!(svc.default_game(), "Red / Blue / Yellow");
    let roster = svc.roster("Pokemon Stadium").await?;
    assert_eq!(roster.first().map(String::as_str), Some("blastoise"));
    Ok(())
}

#[tokio::test]
async fn analyze_builds_report_and_roast() -> Result<()> {
    let svc = service(1);
    let team = svc.resolve_team(&names(&["charizard", "blastoise", "missingno"])).await?;
    assert_eq!(team.len(), 2);

    let out = svc.analyze("Red / Blue / Yellow", &team, &[]).await;
    assert_eq!(out.verdict.worst_pokemon, "charizard");
    assert_eq!(out.game, "Red / Blue / Yellow");

    let report = out.report.unwrap();
    assert_eq!(report.threat_type, ElementType::Electric);
    assert_eq!(report.threat_score, 8.0);
    assert_eq!(report.fire.unwrap().name, "charizard");
    // 地面タイプ (電気無効) の先頭
    let hire = report.hire.unwrap();
    assert_eq!(hire.name, "onix");
    assert_eq!(hire.multiplier, 0.0);
    Ok(())
}

#[tokio::test]
async fn hire_respects_roster_and_team() -> Result<()> {
    let svc = service(0);
    let team = svc.resolve_team(&names(&["charizard", "blastoise"])).await?;

    let hire = svc
        .recommend_hire(ElementType::Electric, &team, &names(&["steelix", "pikachu"]))
        .await?
        .unwrap();
    assert_eq!(hire.name, "steelix");

    let with_pikachu = svc.resolve_team(&names(&["pikachu"])).await?;
    let hire = svc
        .recommend_hire(ElementType::Electric, &with_pikachu, &names(&["pikachu", "bulbasaur"]))
        .await?
        .unwrap();
    assert_eq!(hire.name, "bulbasaur");
    assert_eq!(hire.multiplier, 0.5);

    let none = svc
        .recommend_hire(ElementType::Electric, &team, &names(&["magikarp"]))
        .await?;
    assert!(none.is_none());
    Ok(())
}

#[tokio::test]
async fn empty_team_has_no_report() {
    let svc = service(1);
    let out = svc.analyze("", &[], &[]).await;
    assert!(out.report.is_none());
    assert!(!out.verdict.roast.is_empty());
}

/// 図鑑APIが落ちている状態
struct DownDex;

impl CreatureSource for DownDex {
    async fn details(&self, _name: &str) -> Result<Option<Creature>> {
        Err(eyre!("pokeapi down"))
    }

    async fn roster(&self, _game: &GameVersion) -> Result<Vec<String>> {
        Err(eyre!("pokeapi down"))
    }

    async fn members_of_type(&self, _t: ElementType) -> Result<Vec<String>> {
        Err(eyre!("pokeapi down"))
    }
}

#[tokio::test]
async fn analyze_names_runs_full_pipeline() {
    let svc = service(1);
    let out = svc.analyze_names("Red / Blue / Yellow", &names(&["charizard", "blastoise"])).await;
    assert_eq!(out.verdict.roast, "Two starters and no plan.");
    let report = out.report.unwrap();
    assert_eq!(report.threat_type, ElementType::Electric);
    assert_eq!(report.hire.unwrap().name, "onix");
}

#[tokio::test]
async fn dex_outage_still_roasts_by_name() {
    let backend = ScriptedBackend::always(REPLY, 1);
    let svc = RoastService::new(DownDex, Roaster::new(backend, vec!["m1".into()]));
    let out = svc.analyze_names("Red / Blue / Yellow", &names(&["charizard"])).await;
    assert_eq!(out.verdict.roast, "Two starters and no plan.");
    assert!(!out.verdict.is_synthetic());
    assert!(out.report.is_none());
    assert_eq!(out.game, "Red / Blue / Yellow");
}
