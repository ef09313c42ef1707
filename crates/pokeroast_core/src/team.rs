//! パーティ (6枠固定)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// パーティの最大数
pub const PARTY_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    #[error("ERROR: PARTY IS FULL!")]
    PartyFull,
    #[error("slot {0} is out of range (0..6)")]
    SlotOutOfRange(usize),
    #[error("creature name is empty")]
    EmptyName,
}

/// 6枠のパーティ。空き枠は `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    slots: [Option<String>; PARTY_SIZE],
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最初の空き枠に追加し、その枠番号を返す
    pub fn add<S: AsRef<str>>(&mut self, name: S) -> Result<usize, TeamError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(TeamError::EmptyName);
        }
        let idx = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(TeamError::PartyFull)?;
        self.slots[idx] = Some(name.to_string());
        Ok(idx)
    }

    /// 枠を空にする。空だった枠なら `Ok(None)`
    pub fn release(&mut self, slot: usize) -> Result<Option<String>, TeamError> {
        let s = self.slots.get_mut(slot).ok_or(TeamError::SlotOutOfRange(slot))?;
        Ok(s.take())
    }

    pub fn flush(&mut self) {
        self.slots = Default::default();
    }

    pub fn slots(&self) -> &[Option<String>; PARTY_SIZE] {
        &self.slots
    }

    /// 埋まっている枠の名前 (枠順)
    pub fn names(&self) -> Vec<String> {
        self.slots.iter().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == PARTY_SIZE
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().flatten().any(|n| n.eq_ignore_ascii_case(name))
    }
}
