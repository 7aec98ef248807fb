//! CLI Detective: Terminal Crime Investigation
//!
//! A murder-mystery game for the terminal. You are handed a case file,
//! you ask questions in plain English, and you try to name the killer
//! before the clock runs out.
//!
//! # Game Mechanics
//!
//! - **Questions**: free-form questions are matched to a case-fact category
//!   and answered from the case file
//! - **Time Pressure**: every case has a countdown; when it hits zero the
//!   killer gets away
//! - **Accusation**: `accuse <name>` ends the case if you picked right
//! - **Score**: time left and question economy both count
//!
//! # Architecture
//!
//! - `data` - Case records, difficulty, the case catalog
//! - `game` - Session state, question engine, countdown, scoring
//! - `tui` - Terminal user interface with ratatui

pub mod data;
pub mod game;
pub mod tui;

pub use data::*;
pub use game::Game;
pub use game::questions::{PatternTable, QuestionCategory, QuestionEngine};

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Case not found: {0}")]
    CaseNotFound(u32),

    #[error("Invalid case data: {0}")]
    InvalidCase(String),

    #[error("Pattern set for '{0}' is empty or has a blank trigger")]
    EmptyPatternSet(QuestionCategory),

    #[error("Pattern set for '{0}' given more than once")]
    DuplicatePatternSet(QuestionCategory),

    #[error("Could not read case catalog: {0}")]
    CatalogIo(#[from] std::io::Error),

    #[error("Could not parse case catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
}
