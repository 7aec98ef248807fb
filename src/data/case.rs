//! Case file records
//!
//! A case is authored once, loaded by the catalog, and only read afterwards.

use super::Difficulty;
use serde::{Deserialize, Serialize};

fn default_time_limit() -> u64 {
    600
}

/// A complete murder case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Seconds the player gets to solve the case
    #[serde(default = "default_time_limit")]
    pub time_limit: u64,

    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub victim: Victim,
    #[serde(default)]
    pub weapon: Weapon,
    #[serde(default)]
    pub suspects: Vec<SuspectRecord>,
    #[serde(default)]
    pub evidence: Vec<String>,

    /// Name of the guilty suspect, lower-case
    pub killer: String,
    #[serde(default)]
    pub solution: Solution,

    #[serde(default)]
    pub time_of_death: Option<String>,
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub motive_hint: Option<String>,
}

/// The person who died
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Victim {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub description: String,
}

/// What killed them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Someone who might have done it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspectRecord {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub occupation: String,
    /// Relationship to the victim
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub alibi: Option<String>,
    #[serde(default)]
    pub motive: Option<String>,
}

impl SuspectRecord {
    /// Lower-cased name-token before the first whitespace
    pub fn first_name(&self) -> String {
        let lower = self.name.to_lowercase();
        match lower.split_whitespace().next() {
            Some(first) => first.to_string(),
            None => lower,
        }
    }

    /// Lower-cased final name-token
    pub fn last_name(&self) -> String {
        let lower = self.name.to_lowercase();
        match lower.split_whitespace().last() {
            Some(last) => last.to_string(),
            None => lower,
        }
    }
}

/// Revealed when the case ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub killer: String,
    pub motive: String,
    pub method: String,
    pub key_evidence: String,
}

impl CaseRecord {
    /// Find a suspect by name, ignoring case
    pub fn suspect(&self, name: &str) -> Option<&SuspectRecord> {
        let wanted = name.trim().to_lowercase();
        self.suspects
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)
    }

    /// Whether the named person is the killer
    pub fn is_killer(&self, name: &str) -> bool {
        name.trim().to_lowercase() == self.killer.to_lowercase()
    }

    pub fn suspect_names(&self) -> Vec<&str> {
        self.suspects.iter().map(|s| s.name.as_str()).collect()
    }
}
