//! Question understanding
//!
//! Maps a free-form question onto one case-fact category and answers it from
//! the case file. Nothing here mutates state, so one engine can serve any
//! number of sessions at once.

use super::similarity;
use crate::data::{non_blank, CaseRecord, SuspectRecord};
use crate::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A classification must beat this score to count
pub const MIN_SCORE: f64 = 0.1;

/// What a question is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Weapon,
    Victim,
    Suspects,
    Location,
    Time,
    Motive,
    Evidence,
    Alibi,
    Relationship,
}

impl QuestionCategory {
    /// Evaluation order; earlier categories win ties
    pub const ALL: [QuestionCategory; 9] = [
        QuestionCategory::Weapon,
        QuestionCategory::Victim,
        QuestionCategory::Suspects,
        QuestionCategory::Location,
        QuestionCategory::Time,
        QuestionCategory::Motive,
        QuestionCategory::Evidence,
        QuestionCategory::Alibi,
        QuestionCategory::Relationship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Weapon => "weapon",
            QuestionCategory::Victim => "victim",
            QuestionCategory::Suspects => "suspects",
            QuestionCategory::Location => "location",
            QuestionCategory::Time => "time",
            QuestionCategory::Motive => "motive",
            QuestionCategory::Evidence => "evidence",
            QuestionCategory::Alibi => "alibi",
            QuestionCategory::Relationship => "relationship",
        }
    }

    fn default_triggers(&self) -> &'static [&'static str] {
        match self {
            QuestionCategory::Weapon => &["weapon", "gun", "knife", "pistol", "sword", "tool", "murder weapon"],
            QuestionCategory::Victim => &["victim", "dead", "body", "corpse", "deceased", "killed"],
            QuestionCategory::Suspects => &["suspect", "suspects", "who", "person", "people", "accused"],
            QuestionCategory::Location => &["where", "location", "place", "scene", "room", "house"],
            QuestionCategory::Time => &["when", "time", "hour", "morning", "evening", "night", "day"],
            QuestionCategory::Motive => &["why", "motive", "reason", "cause", "purpose"],
            QuestionCategory::Evidence => &["evidence", "clue", "proof", "fingerprint", "dna", "blood"],
            QuestionCategory::Alibi => &["alibi", "whereabouts", "where was", "doing"],
            QuestionCategory::Relationship => &["relationship", "related", "family", "friend", "enemy"],
        }
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        QuestionCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Unknown question category: {}", s))
    }
}

/// Trigger phrases for every category
///
/// Built once, never changed. Every category always has at least one
/// non-blank, lower-case trigger, and categories are stored in
/// [`QuestionCategory::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable {
    entries: Vec<(QuestionCategory, Vec<String>)>,
}

impl PatternTable {
    /// Build a custom table; every category must be given triggers exactly once
    pub fn new<I>(entries: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = (QuestionCategory, Vec<String>)>,
    {
        let mut given: HashMap<QuestionCategory, Vec<String>> = HashMap::new();
        for (category, triggers) in entries {
            if given.insert(category, triggers).is_some() {
                return Err(GameError::DuplicatePatternSet(category));
            }
        }

        let mut ordered = Vec::with_capacity(QuestionCategory::ALL.len());
        for category in QuestionCategory::ALL {
            let triggers = given.remove(&category).unwrap_or_default();
            if triggers.is_empty() || triggers.iter().any(|t| t.trim().is_empty()) {
                return Err(GameError::EmptyPatternSet(category));
            }
            let triggers: Vec<String> = triggers.iter().map(|t| t.to_lowercase()).collect();
            ordered.push((category, triggers));
        }

        Ok(Self { entries: ordered })
    }

    pub fn triggers(&self, category: QuestionCategory) -> &[String] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }

    /// Categories with their triggers, in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (QuestionCategory, &[String])> {
        self.entries.iter().map(|(c, t)| (*c, t.as_slice()))
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            entries: QuestionCategory::ALL
                .into_iter()
                .map(|c| {
                    let triggers: Vec<String> = c.default_triggers().iter().map(|t| t.to_string()).collect();
                    (c, triggers)
                })
                .collect(),
        }
    }
}

/// The best trigger found in a question
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: QuestionCategory,
    pub trigger: String,
    pub score: f64,
}

/// Classifies questions and answers them from a case
#[derive(Debug, Clone, Default)]
pub struct QuestionEngine {
    patterns: PatternTable,
}

impl QuestionEngine {
    pub fn new(patterns: PatternTable) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Answer a question, or `None` when it is not understood
    pub fn process_question(&self, question: &str, case: &CaseRecord) -> Option<String> {
        let question = question.to_lowercase();
        let category = self.classify(&question)?;
        Some(resolve(category, &question, case))
    }

    /// The category a question belongs to, if any
    pub fn classify(&self, question: &str) -> Option<QuestionCategory> {
        self.classify_scored(question).map(|c| c.category)
    }

    /// Like [`classify`](Self::classify), keeping the winning trigger and score
    pub fn classify_scored(&self, question: &str) -> Option<Classification> {
        let best = self.best_match(question);
        match best {
            Some(found) if found.score > MIN_SCORE => {
                debug!(category = %found.category, trigger = %found.trigger, score = found.score, "Question classified");
                Some(found)
            }
            Some(found) => {
                debug!(category = %found.category, score = found.score, "Best match below threshold");
                None
            }
            None => {
                debug!("No trigger phrase in question");
                None
            }
        }
    }

    /// Highest-scoring trigger contained in the question, threshold not applied
    ///
    /// Only a strictly higher score replaces the current best, so on a tie the
    /// earlier category (and earlier trigger) stays.
    pub fn best_match(&self, question: &str) -> Option<Classification> {
        let question = question.to_lowercase();
        let mut best: Option<Classification> = None;

        for (category, triggers) in self.patterns.iter() {
            for trigger in triggers {
                if !question.contains(trigger.as_str()) {
                    continue;
                }
                let score = similarity::ratio(trigger, &question);
                let better = match &best {
                    Some(current) => score > current.score,
                    None => true,
                };
                if better {
                    best = Some(Classification {
                        category,
                        trigger: trigger.clone(),
                        score,
                    });
                }
            }
        }

        best
    }
}

/// Render the answer for a category from the case file
///
/// Never fails: missing facts turn into fixed sentences, and per-suspect
/// questions without a recognisable name ask the player to name one.
pub fn resolve(category: QuestionCategory, question: &str, case: &CaseRecord) -> String {
    match category {
        QuestionCategory::Weapon => non_blank(case.weapon.description.as_deref())
            .unwrap_or("The murder weapon has not been determined.")
            .to_string(),

        QuestionCategory::Victim => {
            let name = non_blank(Some(&case.victim.name)).unwrap_or("unknown");
            format!("The victim is {}. {}", name, case.victim.description.trim())
                .trim_end()
                .to_string()
        }

        QuestionCategory::Suspects => {
            if case.suspects.is_empty() {
                "No suspects have been identified yet.".to_string()
            } else {
                format!("The suspects are: {}", case.suspect_names().join(", "))
            }
        }

        QuestionCategory::Location => {
            let location = non_blank(Some(&case.location)).unwrap_or("an unknown location");
            format!("The crime occurred at {}. {}", location, case.scene_description.trim())
                .trim_end()
                .to_string()
        }

        QuestionCategory::Time => format!(
            "Time of death: {}",
            non_blank(case.time_of_death.as_deref()).unwrap_or("unknown")
        ),

        QuestionCategory::Motive => non_blank(case.motive_hint.as_deref())
            .unwrap_or("The motive is still unclear.")
            .to_string(),

        QuestionCategory::Evidence => {
            if case.evidence.is_empty() {
                "No evidence has been found yet.".to_string()
            } else {
                format!("Evidence found: {}", case.evidence.join(", "))
            }
        }

        QuestionCategory::Alibi => match extract_suspect(question, case) {
            Some(suspect) => non_blank(suspect.alibi.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}'s alibi is unknown.", suspect.name)),
            None => "Please specify which suspect's alibi you're asking about.".to_string(),
        },

        QuestionCategory::Relationship => match extract_suspect(question, case) {
            Some(suspect) => non_blank(suspect.relationship.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}'s relationship to the victim is unknown.", suspect.name)),
            None => "Please specify which suspect's relationship you're asking about.".to_string(),
        },
    }
}

/// Name of the suspect a question refers to
pub fn extract_suspect_name<'a>(question: &str, case: &'a CaseRecord) -> Option<&'a str> {
    extract_suspect(question, case).map(|s| s.name.as_str())
}

/// Find the suspect a question mentions
///
/// First pass, in stored order: full name or first name-token contained in
/// the question. Only if that finds nobody, a second pass tries surnames.
/// Two suspects sharing a first name resolve to whichever is listed first,
/// and short first names can match ordinary words ("will", "dr.").
pub fn extract_suspect<'a>(question: &str, case: &'a CaseRecord) -> Option<&'a SuspectRecord> {
    let question = question.to_lowercase();
    let named = case.suspects.iter().filter(|s| !s.name.trim().is_empty());

    named
        .clone()
        .find(|s| {
            let full = s.name.to_lowercase();
            question.contains(full.as_str()) || question.contains(s.first_name().as_str())
        })
        .or_else(|| named.clone().find(|s| question.contains(s.last_name().as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Solution, Victim, Weapon};

    fn suspect(name: &str, alibi: Option<&str>, relationship: Option<&str>) -> SuspectRecord {
        SuspectRecord {
            name: name.to_string(),
            age: None,
            occupation: String::new(),
            relationship: relationship.map(String::from),
            alibi: alibi.map(String::from),
            motive: None,
        }
    }

    fn sample_case() -> CaseRecord {
        CaseRecord {
            id: 1,
            title: "The Locked Room Mystery".to_string(),
            description: String::new(),
            difficulty: Default::default(),
            time_limit: 480,
            location: "Mansion Study".to_string(),
            date: String::new(),
            summary: String::new(),
            victim: Victim {
                name: "Victor Blackwood".to_string(),
                age: Some(58),
                occupation: "Business Owner".to_string(),
                description: "Found dead from a gunshot wound to the chest".to_string(),
            },
            weapon: Weapon {
                kind: "Pistol".to_string(),
                description: Some("A .38 caliber pistol was found next to the body.".to_string()),
            },
            suspects: vec![
                suspect("Margaret Blackwood", Some("Claims she was in the garden"), Some("Wife of victim")),
                suspect("David Blackwood", None, Some("Son of victim")),
                suspect("Sarah Chen", Some("Claims she was organizing files in the office"), None),
            ],
            evidence: vec!["Open window".to_string(), "Muddy footprints".to_string()],
            killer: "sarah chen".to_string(),
            solution: Solution::default(),
            time_of_death: Some("3:30 PM".to_string()),
            scene_description: "The study was in perfect order".to_string(),
            motive_hint: None,
        }
    }

    fn bare_case() -> CaseRecord {
        CaseRecord {
            suspects: Vec::new(),
            evidence: Vec::new(),
            weapon: Weapon::default(),
            time_of_death: None,
            scene_description: String::new(),
            victim: Victim {
                name: "Ada".to_string(),
                ..Default::default()
            },
            ..sample_case()
        }
    }

    #[test]
    fn categories_parse_and_print() {
        for category in QuestionCategory::ALL {
            let parsed: QuestionCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("weather".parse::<QuestionCategory>().is_err());
    }

    #[test]
    fn default_table_has_every_category() {
        let table = PatternTable::default();
        let order: Vec<_> = table.iter().map(|(c, _)| c).collect();
        assert_eq!(order, QuestionCategory::ALL.to_vec());
        assert!(table.iter().all(|(_, t)| !t.is_empty()));
        assert!(table.triggers(QuestionCategory::Alibi).iter().any(|t| t == "where was"));
    }

    #[test]
    fn custom_table_requires_all_categories() {
        let only_weapon = vec![(QuestionCategory::Weapon, vec!["blade".to_string()])];
        assert!(matches!(
            PatternTable::new(only_weapon),
            Err(GameError::EmptyPatternSet(QuestionCategory::Victim))
        ));
    }

    #[test]
    fn custom_table_rejects_repeated_category() {
        let mut entries: Vec<(QuestionCategory, Vec<String>)> = QuestionCategory::ALL
            .into_iter()
            .map(|c| (c, vec![c.as_str().to_string()]))
            .collect();
        entries.push((QuestionCategory::Motive, vec!["grudge".to_string()]));
        assert!(matches!(
            PatternTable::new(entries),
            Err(GameError::DuplicatePatternSet(QuestionCategory::Motive))
        ));
    }

    #[test]
    fn custom_table_lowercases_and_orders() {
        let entries = QuestionCategory::ALL
            .into_iter()
            .rev()
            .map(|c| (c, vec![c.as_str().to_uppercase()]));
        let table = PatternTable::new(entries).unwrap();
        assert_eq!(table.iter().next().map(|(c, _)| c), Some(QuestionCategory::Weapon));
        assert_eq!(table.triggers(QuestionCategory::Time), ["time".to_string()]);
    }

    #[test]
    fn classify_prefers_longest_trigger() {
        let engine = QuestionEngine::default();
        let found = engine.classify_scored("what's the murder weapon").unwrap();
        assert_eq!(found.category, QuestionCategory::Weapon);
        assert_eq!(found.trigger, "murder weapon");
    }

    #[test]
    fn classify_is_case_insensitive() {
        let engine = QuestionEngine::default();
        assert_eq!(engine.classify("WHO IS THE VICTIM"), Some(QuestionCategory::Victim));
    }

    #[test]
    fn where_was_beats_where() {
        let engine = QuestionEngine::default();
        assert_eq!(engine.classify("where was sarah chen"), Some(QuestionCategory::Alibi));
        assert_eq!(engine.classify("where did it happen"), Some(QuestionCategory::Location));
    }

    #[test]
    fn ties_go_to_the_earlier_category() {
        let engine = QuestionEngine::default();
        // "gun" and "day" are both three letters long
        assert_eq!(engine.classify("gun day"), Some(QuestionCategory::Weapon));
        assert_eq!(engine.classify("who why"), Some(QuestionCategory::Suspects));
    }

    #[test]
    fn no_trigger_means_no_candidate() {
        let engine = QuestionEngine::default();
        assert!(engine.best_match("asdkj qweqwe").is_none());
        assert_eq!(engine.classify("asdkj qweqwe"), None);
    }

    #[test]
    fn weak_match_in_long_question_is_rejected() {
        let engine = QuestionEngine::default();
        let question = format!("{} who", "x".repeat(60));
        let best = engine.best_match(&question).unwrap();
        assert_eq!(best.category, QuestionCategory::Suspects);
        assert!(best.score <= MIN_SCORE);
        assert_eq!(engine.classify(&question), None);
    }

    #[test]
    fn resolves_case_facts() {
        let case = sample_case();
        assert_eq!(
            resolve(QuestionCategory::Weapon, "", &case),
            "A .38 caliber pistol was found next to the body."
        );
        assert_eq!(
            resolve(QuestionCategory::Victim, "", &case),
            "The victim is Victor Blackwood. Found dead from a gunshot wound to the chest"
        );
        assert_eq!(
            resolve(QuestionCategory::Suspects, "", &case),
            "The suspects are: Margaret Blackwood, David Blackwood, Sarah Chen"
        );
        assert_eq!(
            resolve(QuestionCategory::Location, "", &case),
            "The crime occurred at Mansion Study. The study was in perfect order"
        );
        assert_eq!(resolve(QuestionCategory::Time, "", &case), "Time of death: 3:30 PM");
        assert_eq!(
            resolve(QuestionCategory::Evidence, "", &case),
            "Evidence found: Open window, Muddy footprints"
        );
    }

    #[test]
    fn resolves_fallbacks_for_missing_facts() {
        let case = bare_case();
        assert_eq!(
            resolve(QuestionCategory::Weapon, "", &case),
            "The murder weapon has not been determined."
        );
        assert_eq!(resolve(QuestionCategory::Victim, "", &case), "The victim is Ada.");
        assert_eq!(
            resolve(QuestionCategory::Suspects, "", &case),
            "No suspects have been identified yet."
        );
        assert_eq!(
            resolve(QuestionCategory::Location, "", &case),
            "The crime occurred at Mansion Study."
        );
        assert_eq!(resolve(QuestionCategory::Time, "", &case), "Time of death: unknown");
        assert_eq!(resolve(QuestionCategory::Motive, "", &case), "The motive is still unclear.");
        assert_eq!(
            resolve(QuestionCategory::Evidence, "", &case),
            "No evidence has been found yet."
        );
    }

    #[test]
    fn per_suspect_answers() {
        let case = sample_case();
        assert_eq!(
            resolve(QuestionCategory::Alibi, "what was david doing", &case),
            "David Blackwood's alibi is unknown."
        );
        assert_eq!(
            resolve(QuestionCategory::Relationship, "how is sarah related", &case),
            "Sarah Chen's relationship to the victim is unknown."
        );
        assert_eq!(
            resolve(QuestionCategory::Relationship, "margaret family?", &case),
            "Wife of victim"
        );
        assert_eq!(
            resolve(QuestionCategory::Alibi, "what's the alibi", &case),
            "Please specify which suspect's alibi you're asking about."
        );
        assert_eq!(
            resolve(QuestionCategory::Relationship, "any family", &case),
            "Please specify which suspect's relationship you're asking about."
        );
    }

    #[test]
    fn extraction_follows_stored_order() {
        let case = sample_case();
        assert_eq!(extract_suspect_name("sarah", &case), Some("Sarah Chen"));
        // Full name of the second suspect, but the first pass also sees the
        // first suspect's first name later in the sentence
        assert_eq!(
            extract_suspect_name("david blackwood or margaret?", &case),
            Some("Margaret Blackwood")
        );
        assert_eq!(extract_suspect_name("the butler", &case), None);
    }

    #[test]
    fn surname_pass_runs_only_when_first_pass_fails() {
        let case = sample_case();
        assert_eq!(extract_suspect_name("what about chen?", &case), Some("Sarah Chen"));
        // "blackwood" is shared; the first listed wins
        assert_eq!(extract_suspect_name("the blackwood alibi", &case), Some("Margaret Blackwood"));
        assert_eq!(extract_suspect_name("david blackwood", &case), Some("David Blackwood"));
    }

    #[test]
    fn process_question_end_to_end() {
        let engine = QuestionEngine::default();
        let case = sample_case();
        assert_eq!(
            engine.process_question("Where was Sarah Chen?", &case).as_deref(),
            Some("Claims she was organizing files in the office")
        );
        assert_eq!(engine.process_question("asdkj qweqwe", &case), None);
    }
}
