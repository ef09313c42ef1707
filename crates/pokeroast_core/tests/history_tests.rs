use color_eyre::Result;
use pokeroast_core::history::{ShameEntry, ShameLog};
mod common;

#[ctor::ctor]
fn _init() { common::init(); }

fn entry(team: &[&str], worst: &str) -> ShameEntry {
    ShameEntry::new(team.iter().map(|s| s.to_string()).collect(), "bad team", worst, "Red / Blue / Yellow")
}

#[test]
fn entries_survive_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shame.sqlite");
    {
        let mut log = ShameLog::open_or_create(&path)?;
        log.append(&entry(&["magikarp", "pikachu"], "magikarp"))?;
        log.append(&entry(&["snorlax"], "snorlax"))?;
    }
    let log = ShameLog::open_or_create(&path)?;
    assert_eq!(log.db_file_path(), path.as_path());
    let all = log.list()?;
    assert_eq!(all.len(), 2);
    // 挿入順
    assert_eq!(all[0].team, vec!["magikarp", "pikachu"]);
    assert_eq!(all[1].worst_pokemon, "snorlax");
    assert!(all[0].id < all[1].id);
    Ok(())
}

#[test]
fn worst_offenders_ranked_by_frequency_then_name() -> Result<()> {
    let mut log = ShameLog::in_memory()?;
    for worst in ["pikachu", "magikarp", "pikachu", "abra", "magikarp", ""] {
        log.append(&entry(&["x"], worst))?;
    }
    let top = log.worst_offenders(2)?;
    assert_eq!(top.len(), 2);
    assert_eq!((top[0].name.as_str(), top[0].times), ("magikarp", 2));
    assert_eq!((top[1].name.as_str(), top[1].times), ("pikachu", 2));
    assert_eq!(log.count()?, 6);
    Ok(())
}

#[test]
fn clear_removes_everything() -> Result<()> {
    let mut log = ShameLog::in_memory()?;
    log.append(&entry(&["a"], "a"))?;
    log.append(&entry(&["b"], "b"))?;
    assert_eq!(log.clear()?, 2);
    assert!(log.list()?.is_empty());
    Ok(())
}
