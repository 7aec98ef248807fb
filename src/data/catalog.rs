//! The case catalog
//!
//! Cases are loaded once at startup and handed out by reference.

use super::CaseRecord;
use crate::GameError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_CASES: &str = include_str!("../../assets/cases.json");

/// All cases available to play
#[derive(Debug, Clone)]
pub struct CaseCatalog {
    cases: Vec<CaseRecord>,
}

impl CaseCatalog {
    /// The ten cases shipped with the game
    pub fn builtin() -> Result<Self, GameError> {
        Self::from_json(BUILTIN_CASES)
    }

    /// Load a JSON array of cases from disk
    pub fn from_path(path: &Path) -> Result<Self, GameError> {
        info!(path = %path.display(), "Loading case catalog");
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        let cases: Vec<CaseRecord> = serde_json::from_str(raw)?;
        Self::from_cases(cases)
    }

    /// Build a catalog, checking the authoring rules every case must follow
    pub fn from_cases(cases: Vec<CaseRecord>) -> Result<Self, GameError> {
        if cases.is_empty() {
            return Err(GameError::InvalidCase("catalog contains no cases".to_string()));
        }

        let mut ids = HashSet::new();
        for case in &cases {
            if !ids.insert(case.id) {
                return Err(GameError::InvalidCase(format!("duplicate case id {}", case.id)));
            }
            validate_case(case)?;
        }

        debug!(count = cases.len(), "Case catalog ready");
        Ok(Self { cases })
    }

    /// Look up a case by its id
    pub fn get(&self, id: u32) -> Result<&CaseRecord, GameError> {
        self.cases
            .iter()
            .find(|c| c.id == id)
            .ok_or(GameError::CaseNotFound(id))
    }

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn validate_case(case: &CaseRecord) -> Result<(), GameError> {
    let mut names = HashSet::new();
    for suspect in &case.suspects {
        let name = suspect.name.trim().to_lowercase();
        if name.is_empty() {
            return Err(GameError::InvalidCase(format!(
                "case {} has a suspect without a name",
                case.id
            )));
        }
        if !names.insert(name) {
            return Err(GameError::InvalidCase(format!(
                "case {} lists '{}' twice",
                case.id, suspect.name
            )));
        }
    }

    let killer = case.killer.trim().to_lowercase();
    if !names.contains(&killer) {
        return Err(GameError::InvalidCase(format!(
            "case {}: killer '{}' is not one of the suspects",
            case.id, case.killer
        )));
    }

    Ok(())
}
