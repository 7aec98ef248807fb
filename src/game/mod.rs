//! Core game logic and state management

pub mod questions;
pub mod similarity;
pub mod timer;

use crate::data::*;
use chrono::{DateTime, Utc};
use questions::QuestionEngine;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::{Duration, Instant};
use timer::{format_clock, Countdown};
use tracing::{debug, info};

/// Shown when a question is not understood
pub const FALLBACK_RESPONSES: [&str; 5] = [
    "I don't know. Try rephrasing your question.",
    "That information isn't available in the case file.",
    "I'm not sure about that. Try asking something else.",
    "The evidence doesn't show anything about that.",
    "That's not in my notes. Can you be more specific?",
];

/// One investigation of one case
#[derive(Debug, Clone)]
pub struct Game {
    /// Session id, used to correlate log lines
    pub id: Id,

    /// Current game phase
    pub phase: GamePhase,

    /// The case under investigation
    pub case: CaseRecord,

    /// Case countdown
    pub timer: Countdown,

    /// Game statistics
    pub stats: GameStats,

    /// Final score, once solved
    pub score: Option<Score>,

    /// Message log (for UI display)
    pub message_log: Vec<GameMessage>,

    engine: Arc<QuestionEngine>,
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Briefing,              // Reading the case file, clock not running
    Investigating,         // Main gameplay loop
    GameOver(GameOutcome),
}

/// How the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Solved,                // Named the killer
    TimeUp,                // Clock ran out
    Abandoned,             // Player quit
}

/// What the player typed, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Help,
    CheckTime,
    ListSuspects,
    Quit,
    Accuse(String),
    Ask(String),
}

impl PlayerAction {
    /// Commands are matched case-insensitively; anything else is a question
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let command = input.to_lowercase();
        let action = match command.as_str() {
            "help" => PlayerAction::Help,
            "time" => PlayerAction::CheckTime,
            "suspects" => PlayerAction::ListSuspects,
            "quit" | "exit" => PlayerAction::Quit,
            "accuse" => PlayerAction::Accuse(String::new()),
            _ => match command.strip_prefix("accuse ") {
                Some(name) => PlayerAction::Accuse(name.trim().to_string()),
                None => PlayerAction::Ask(input.to_string()),
            },
        };
        Some(action)
    }

    pub fn description(&self) -> String {
        match self {
            PlayerAction::Help => "Show how to play".to_string(),
            PlayerAction::CheckTime => "Check remaining time".to_string(),
            PlayerAction::ListSuspects => "List all suspects".to_string(),
            PlayerAction::Quit => "Give up on this case".to_string(),
            PlayerAction::Accuse(name) => format!("Accuse {}", name),
            PlayerAction::Ask(q) => format!("Ask: {}", q),
        }
    }
}

/// Game statistics
#[derive(Debug, Clone, Default)]
pub struct GameStats {
    pub questions_asked: u32,
    pub questions_understood: u32,
    pub wrong_accusations: u32,
}

/// Points for a solved case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub time_bonus: u32,
    pub efficiency_bonus: u32,
    pub total: u32,
}

impl Score {
    /// Ten points per second left, plus up to 100 for asking few questions
    pub fn compute(remaining: Duration, questions_asked: u32) -> Self {
        let time_bonus = (remaining.as_secs_f64() * 10.0).floor() as u32;
        let efficiency_bonus = 100u32.saturating_sub(questions_asked.saturating_mul(5));
        Self {
            time_bonus,
            efficiency_bonus,
            total: time_bonus.saturating_add(efficiency_bonus),
        }
    }
}

/// Kind of message, decides how it is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Player,
    Answer,
    Unknown,
    System,
    Warning,
    Success,
    Failure,
}

/// A message to display to the player
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
    pub text: String,
}

impl GameMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageKind::System, text)
    }
}

impl Game {
    /// Create a session for a case; the clock starts with [`Game::start`]
    pub fn new(case: CaseRecord, engine: Arc<QuestionEngine>) -> Self {
        let timer = Countdown::new(Duration::from_secs(case.time_limit));
        let mut game = Self {
            id: Id::new(),
            phase: GamePhase::Briefing,
            case,
            timer,
            stats: GameStats::default(),
            score: None,
            message_log: Vec::new(),
            engine,
        };

        game.add_message(GameMessage::system(format!(
            "Case file opened: {}. Read the report, then start the clock.",
            game.case.title
        )));

        game
    }

    /// Replace the case's time limit before the clock starts
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        if self.phase == GamePhase::Briefing {
            self.timer = Countdown::new(limit);
        }
        self
    }

    /// Add a message to the log
    pub fn add_message(&mut self, message: GameMessage) {
        self.message_log.push(message);
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.phase != GamePhase::Briefing {
            return;
        }
        self.timer.start_at(now);
        self.phase = GamePhase::Investigating;
        info!(session = %self.id, case = self.case.id, title = %self.case.title, "Investigation started");
        self.add_message(GameMessage::system(format!(
            "The clock is running: {}. Ask away, detective.",
            format_clock(self.timer.remaining_at(now))
        )));
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    /// Process one line of player input
    pub fn handle_input(&mut self, input: &str) -> Vec<GameMessage> {
        self.handle_input_at(input, Instant::now())
    }

    pub fn handle_input_at(&mut self, input: &str, now: Instant) -> Vec<GameMessage> {
        self.tick_at(now);

        let Some(action) = PlayerAction::parse(input) else {
            return Vec::new();
        };

        let mut results = vec![GameMessage::new(MessageKind::Player, input.trim())];

        match self.phase {
            GamePhase::Briefing => {
                results.push(GameMessage::new(
                    MessageKind::Warning,
                    "The investigation hasn't started yet.",
                ));
            }
            GamePhase::GameOver(_) => {
                results.push(GameMessage::new(MessageKind::Warning, "This case is closed."));
            }
            GamePhase::Investigating => {
                debug!(session = %self.id, action = %action.description(), "Player action");
                results.extend(self.execute_action(action, now));
            }
        }

        for message in &results {
            self.add_message(message.clone());
        }
        results
    }

    fn execute_action(&mut self, action: PlayerAction, now: Instant) -> Vec<GameMessage> {
        match action {
            PlayerAction::Help => help_lines().into_iter().map(GameMessage::system).collect(),
            PlayerAction::CheckTime => vec![GameMessage::system(format!(
                "Time remaining: {}",
                format_clock(self.timer.remaining_at(now))
            ))],
            PlayerAction::ListSuspects => self.suspect_lines(),
            PlayerAction::Quit => {
                self.finish(GameOutcome::Abandoned, now);
                vec![GameMessage::new(
                    MessageKind::Failure,
                    "Investigation ended. The killer got away!",
                )]
            }
            PlayerAction::Accuse(name) => self.accuse(&name, now),
            PlayerAction::Ask(question) => vec![self.ask(&question)],
        }
    }

    fn ask(&mut self, question: &str) -> GameMessage {
        self.stats.questions_asked += 1;
        match self.engine.process_question(question, &self.case) {
            Some(answer) => {
                self.stats.questions_understood += 1;
                GameMessage::new(MessageKind::Answer, answer)
            }
            None => {
                let fallback = FALLBACK_RESPONSES
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(FALLBACK_RESPONSES[0]);
                GameMessage::new(MessageKind::Unknown, fallback)
            }
        }
    }

    fn accuse(&mut self, name: &str, now: Instant) -> Vec<GameMessage> {
        if name.trim().is_empty() {
            return vec![GameMessage::new(MessageKind::Warning, "Please specify a suspect name.")];
        }

        let Some(accused) = self.case.suspect(name) else {
            return vec![GameMessage::new(
                MessageKind::Warning,
                format!("'{}' is not a suspect in this case.", name.trim()),
            )];
        };
        let accused_name = accused.name.clone();

        info!(session = %self.id, accused = %accused_name, "Accusation made");

        if self.case.is_killer(&accused_name) {
            self.finish(GameOutcome::Solved, now);
            let mut results = vec![GameMessage::new(
                MessageKind::Success,
                "CASE SOLVED! You correctly identified the killer!",
            )];
            if let Some(score) = self.score {
                results.push(GameMessage::new(
                    MessageKind::Success,
                    format!("Final score: {} points", score.total),
                ));
            }
            results
        } else {
            self.stats.wrong_accusations += 1;
            vec![GameMessage::new(
                MessageKind::Failure,
                format!(
                    "That's incorrect. {} is not the killer. Keep investigating.",
                    accused_name
                ),
            )]
        }
    }

    fn suspect_lines(&self) -> Vec<GameMessage> {
        if self.case.suspects.is_empty() {
            return vec![GameMessage::system("No suspects have been identified yet.")];
        }

        self.case
            .suspects
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let age = s.age.map(|a| a.to_string()).unwrap_or_else(|| "Unknown".to_string());
                let relationship = non_blank(s.relationship.as_deref()).unwrap_or("Unknown");
                GameMessage::system(format!(
                    "{}. {} | Age: {} | Occupation: {} | Relationship: {}",
                    i + 1,
                    s.name,
                    age,
                    non_blank(Some(s.occupation.as_str())).unwrap_or("Unknown"),
                    relationship
                ))
            })
            .collect()
    }

    /// Check the clock; ends the game when time has run out
    pub fn tick(&mut self) -> Option<GameOutcome> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<GameOutcome> {
        if self.phase == GamePhase::Investigating && self.timer.is_expired_at(now) {
            self.finish(GameOutcome::TimeUp, now);
            self.add_message(GameMessage::new(MessageKind::Failure, "TIME'S UP! The killer got away!"));
            return Some(GameOutcome::TimeUp);
        }
        None
    }

    fn finish(&mut self, outcome: GameOutcome, now: Instant) {
        self.timer.stop_at(now);
        if outcome == GameOutcome::Solved {
            self.score = Some(Score::compute(
                self.timer.remaining_at(now),
                self.stats.questions_asked,
            ));
        }
        self.phase = GamePhase::GameOver(outcome);
        info!(
            session = %self.id,
            case = self.case.id,
            ?outcome,
            questions = self.stats.questions_asked,
            score = self.score.map(|s| s.total).unwrap_or(0),
            "Investigation over"
        );
    }

    /// Time spent on the case so far
    pub fn time_used(&self) -> Duration {
        self.timer.elapsed_at(Instant::now())
    }

    /// One-line status for the UI
    pub fn check_status(&self) -> String {
        format!(
            "Case {} | Time: {} | Questions: {} | Wrong accusations: {}",
            self.case.id,
            format_clock(self.timer.remaining()),
            self.stats.questions_asked,
            self.stats.wrong_accusations
        )
    }
}

/// How-to-play text, one entry per line
pub fn help_lines() -> Vec<String> {
    vec![
        "HOW TO PLAY".to_string(),
        "Ask questions in plain English, for example:".to_string(),
        "  What's the murder weapon?".to_string(),
        "  Who are the suspects?".to_string(),
        "  Where was Sarah at the time of death?".to_string(),
        "Make an accusation: accuse <suspect name>".to_string(),
        format!("  help     - {}", PlayerAction::Help.description()),
        format!("  time     - {}", PlayerAction::CheckTime.description()),
        format!("  suspects - {}", PlayerAction::ListSuspects.description()),
        format!("  quit     - {}", PlayerAction::Quit.description()),
        "Find the killer before time runs out!".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game() -> Game {
        let catalog = CaseCatalog::builtin().unwrap();
        let case = catalog.get(1).unwrap().clone();
        Game::new(case, Arc::new(QuestionEngine::default()))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(PlayerAction::parse("  "), None);
        assert_eq!(PlayerAction::parse("HELP"), Some(PlayerAction::Help));
        assert_eq!(PlayerAction::parse("exit"), Some(PlayerAction::Quit));
        assert_eq!(
            PlayerAction::parse("Accuse Sarah Chen"),
            Some(PlayerAction::Accuse("sarah chen".to_string()))
        );
        assert_eq!(PlayerAction::parse("accuse"), Some(PlayerAction::Accuse(String::new())));
        assert_eq!(
            PlayerAction::parse("Who is the victim?"),
            Some(PlayerAction::Ask("Who is the victim?".to_string()))
        );
    }

    #[test]
    fn score_formula() {
        let score = Score::compute(Duration::from_millis(120_550), 4);
        assert_eq!(score.time_bonus, 1205);
        assert_eq!(score.efficiency_bonus, 80);
        assert_eq!(score.total, 1285);

        let slow = Score::compute(Duration::ZERO, 40);
        assert_eq!(slow.total, 0);
    }

    #[test]
    fn huge_time_limit_score_saturates() {
        let score = Score::compute(Duration::from_secs(500_000_000), 0);
        assert_eq!(score.time_bonus, u32::MAX);
        assert_eq!(score.efficiency_bonus, 100);
        assert_eq!(score.total, u32::MAX);
    }

    #[test]
    fn input_ignored_until_started() {
        let mut game = new_game();
        let out = game.handle_input("who is the victim");
        assert_eq!(out.last().map(|m| m.kind), Some(MessageKind::Warning));
        assert_eq!(game.stats.questions_asked, 0);
    }

    #[test]
    fn questions_are_counted_and_answered() {
        let mut game = new_game();
        let t0 = Instant::now();
        game.start_at(t0);

        let out = game.handle_input_at("Who is the victim?", t0);
        let answer = out.last().unwrap();
        assert_eq!(answer.kind, MessageKind::Answer);
        assert!(answer.text.contains("Victor Blackwood"));

        let out = game.handle_input_at("asdkj qweqwe", t0);
        let unknown = out.last().unwrap();
        assert_eq!(unknown.kind, MessageKind::Unknown);
        assert!(FALLBACK_RESPONSES.contains(&unknown.text.as_str()));

        assert_eq!(game.stats.questions_asked, 2);
        assert_eq!(game.stats.questions_understood, 1);
    }

    #[test]
    fn commands_do_not_count_as_questions() {
        let mut game = new_game();
        let t0 = Instant::now();
        game.start_at(t0);
        game.handle_input_at("help", t0);
        let out = game.handle_input_at("suspects", t0);
        assert!(out.iter().any(|m| m.text.contains("Sarah Chen")));
        let out = game.handle_input_at("time", t0);
        assert!(out.last().unwrap().text.contains("08:00"));
        assert_eq!(game.stats.questions_asked, 0);
    }

    #[test]
    fn wrong_and_unknown_accusations_keep_the_game_going() {
        let mut game = new_game();
        let t0 = Instant::now();
        game.start_at(t0);

        let out = game.handle_input_at("accuse the butler", t0);
        assert!(out.last().unwrap().text.contains("is not a suspect"));

        let out = game.handle_input_at("accuse david blackwood", t0);
        assert!(out.last().unwrap().text.contains("David Blackwood is not the killer"));
        assert_eq!(game.stats.wrong_accusations, 1);
        assert_eq!(game.phase, GamePhase::Investigating);
    }

    #[test]
    fn correct_accusation_solves_and_scores() {
        let mut game = new_game();
        let t0 = Instant::now();
        game.start_at(t0);
        game.handle_input_at("what's the murder weapon", t0);

        let at = t0 + Duration::from_secs(80);
        game.handle_input_at("accuse SARAH CHEN", at);

        assert_eq!(game.phase, GamePhase::GameOver(GameOutcome::Solved));
        let score = game.score.unwrap();
        assert_eq!(score.time_bonus, 4000);
        assert_eq!(score.efficiency_bonus, 95);

        let out = game.handle_input_at("who is the victim", at);
        assert_eq!(out.last().unwrap().text, "This case is closed.");
    }

    #[test]
    fn clock_expiry_ends_the_game() {
        let mut game = new_game().with_time_limit(Duration::from_secs(10));
        let t0 = Instant::now();
        game.start_at(t0);
        assert_eq!(game.tick_at(t0 + Duration::from_secs(5)), None);
        assert_eq!(game.tick_at(t0 + Duration::from_secs(11)), Some(GameOutcome::TimeUp));
        assert_eq!(game.phase, GamePhase::GameOver(GameOutcome::TimeUp));
        assert!(game.score.is_none());
    }

    #[test]
    fn quitting_abandons_the_case() {
        let mut game = new_game();
        let t0 = Instant::now();
        game.start_at(t0);
        game.handle_input_at("quit", t0);
        assert_eq!(game.phase, GamePhase::GameOver(GameOutcome::Abandoned));
    }
}
