use cli_detective::game::questions::{extract_suspect_name, resolve};
use cli_detective::{CaseCatalog, CaseRecord, PatternTable, QuestionCategory, QuestionEngine};
use proptest::prelude::*;

fn locked_room() -> CaseRecord {
    CaseCatalog::builtin().unwrap().get(1).unwrap().clone()
}

fn case_with_suspects(names: &[&str]) -> CaseRecord {
    let suspects: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"name": "{}", "alibi": "{} was at home"}}"#, n, n))
        .collect();
    let json = format!(
        r#"[{{"id": 7, "title": "T", "location": "L", "killer": "{}", "suspects": [{}]}}]"#,
        names[0].to_lowercase(),
        suspects.join(",")
    );
    CaseCatalog::from_json(&json).unwrap().get(7).unwrap().clone()
}

#[test]
fn asking_about_the_victim() {
    let engine = QuestionEngine::default();
    let case = locked_room();
    assert_eq!(engine.classify("who is the victim"), Some(QuestionCategory::Victim));

    let answer = engine.process_question("who is the victim", &case).unwrap();
    assert!(answer.contains("Victor Blackwood"));
    assert!(answer.contains("Found dead from a gunshot wound to the chest"));
}

#[test]
fn asking_about_the_weapon() {
    let engine = QuestionEngine::default();
    let case = locked_room();
    assert_eq!(engine.classify("what's the murder weapon"), Some(QuestionCategory::Weapon));

    let answer = engine.process_question("what's the murder weapon", &case).unwrap();
    assert_eq!(Some(answer.as_str()), case.weapon.description.as_deref());
    assert!(answer.starts_with("A .38 caliber pistol"));
}

#[test]
fn gibberish_is_not_understood() {
    let engine = QuestionEngine::default();
    assert_eq!(engine.classify("asdkj qweqwe"), None);
    assert_eq!(engine.process_question("asdkj qweqwe", &locked_room()), None);
}

#[test]
fn asking_where_a_suspect_was() {
    let engine = QuestionEngine::default();
    let case = locked_room();
    assert_eq!(engine.classify("where was sarah chen"), Some(QuestionCategory::Alibi));
    assert_eq!(extract_suspect_name("where was Sarah Chen", &case), Some("Sarah Chen"));

    let answer = engine.process_question("where was Sarah Chen", &case).unwrap();
    assert_eq!(answer, "Claims she was organizing files in the office");
}

#[test]
fn suspect_found_by_first_last_or_full_name() {
    let case = case_with_suspects(&["John Smith", "Mary Jones"]);
    for question in [
        "What is John's alibi?",
        "What is Smith's alibi?",
        "What is John Smith's alibi?",
    ] {
        assert_eq!(extract_suspect_name(question, &case), Some("John Smith"), "{}", question);
    }

    let engine = QuestionEngine::default();
    assert_eq!(
        engine.process_question("What is Smith's alibi?", &case).as_deref(),
        Some("John Smith was at home")
    );
}

#[test]
fn every_builtin_case_answers_every_category() {
    let catalog = CaseCatalog::builtin().unwrap();
    for case in catalog.cases() {
        for category in QuestionCategory::ALL {
            let answer = resolve(category, "tell me", case);
            assert!(!answer.trim().is_empty(), "case {} {}", case.id, category);
        }
    }
}

fn trigger_strategy() -> impl Strategy<Value = (QuestionCategory, String)> {
    let table = PatternTable::default();
    let pairs: Vec<(QuestionCategory, String)> = table
        .iter()
        .flat_map(|(c, triggers)| triggers.iter().map(move |t| (c, t.clone())))
        .collect();
    proptest::sample::select(pairs)
}

proptest! {
    #[test]
    fn a_bare_trigger_selects_its_category((category, trigger) in trigger_strategy()) {
        let engine = QuestionEngine::default();
        prop_assert_eq!(engine.classify(&trigger), Some(category));
    }

    #[test]
    fn no_overlap_means_not_understood(question in "[qxz0-9 ]{0,40}") {
        let engine = QuestionEngine::default();
        prop_assert_eq!(engine.classify(&question), None);
    }

    #[test]
    fn resolve_is_repeatable(question in ".{0,60}", idx in 0usize..9) {
        let case = locked_room();
        let category = QuestionCategory::ALL[idx];
        prop_assert_eq!(resolve(category, &question, &case), resolve(category, &question, &case));
    }

    #[test]
    fn equal_scores_go_to_the_earlier_category(
        word in "[a-z]{3,8}",
        first in 0usize..9,
        gap in 1usize..9,
    ) {
        let second = (first + gap) % 9;
        let (earlier, later) = (first.min(second), first.max(second));

        let table = PatternTable::new(QuestionCategory::ALL.into_iter().enumerate().map(|(i, c)| {
            let trigger = if i == earlier || i == later { word.clone() } else { format!("#{}#", i) };
            (c, vec![trigger])
        }))
        .unwrap();
        let engine = QuestionEngine::new(table);

        let question = format!("tell me about {}", word);
        prop_assert_eq!(engine.classify(&question), Some(QuestionCategory::ALL[earlier]));
    }
}
