//! Terminal User Interface
//!
//! Case board, interrogation terminal and verdict screens using ratatui

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::Difficulty;
use crate::game::MessageKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the game
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            border: Color::DarkGray,
            header: Color::Magenta,
        }
    }
}

/// Get color for a case difficulty
pub fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

/// Style for a line in the interrogation log
pub fn message_style(kind: MessageKind, theme: &Theme) -> Style {
    match kind {
        MessageKind::Player => Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        MessageKind::Answer => Style::default().fg(theme.accent),
        MessageKind::Unknown => Style::default().fg(Color::DarkGray),
        MessageKind::System => Style::default().fg(Color::Gray),
        MessageKind::Warning => Style::default().fg(theme.warning),
        MessageKind::Success => Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        MessageKind::Failure => Style::default().fg(theme.alert).add_modifier(Modifier::BOLD),
    }
}

/// Prefix shown before a log line
pub fn message_prefix(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Player => "Q: ",
        MessageKind::Answer => "A: ",
        MessageKind::Unknown => "?: ",
        MessageKind::System => "",
        MessageKind::Warning => "! ",
        MessageKind::Success => "",
        MessageKind::Failure => "",
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// ASCII art logo
pub const LOGO: &str = r#"
  ██████╗██╗     ██╗    ██████╗ ███████╗████████╗███████╗ ██████╗████████╗██╗██╗   ██╗███████╗
 ██╔════╝██║     ██║    ██╔══██╗██╔════╝╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██║██║   ██║██╔════╝
 ██║     ██║     ██║    ██║  ██║█████╗     ██║   █████╗  ██║        ██║   ██║██║   ██║█████╗
 ██║     ██║     ██║    ██║  ██║██╔══╝     ██║   ██╔══╝  ██║        ██║   ██║╚██╗ ██╔╝██╔══╝
 ╚██████╗███████╗██║    ██████╔╝███████╗   ██║   ███████╗╚██████╗   ██║   ██║ ╚████╔╝ ███████╗
  ╚═════╝╚══════╝╚═╝    ╚═════╝ ╚══════╝   ╚═╝   ╚══════╝ ╚═════╝   ╚═╝   ╚═╝  ╚═══╝  ╚══════╝

                         Terminal Crime Investigation
"#;

/// Smaller logo for header
pub const SMALL_LOGO: &str = " CLI DETECTIVE ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════════════════════╗
║                       CONTROLS                                ║
╠═══════════════════════════════════════════════════════════════╣
║  ↑/↓    Choose a case                                         ║
║  Enter  Open case / Start the clock / Send question           ║
║  F1     Toggle this help                                      ║
║  Esc    Back / Close help                                     ║
╠═══════════════════════════════════════════════════════════════╣
║                    ASKING QUESTIONS                           ║
╠═══════════════════════════════════════════════════════════════╣
║  What's the murder weapon?                                    ║
║  Who are the suspects?                                        ║
║  Where was Sarah at the time of death?                        ║
║  What was David's motive?                                     ║
╠═══════════════════════════════════════════════════════════════╣
║                      COMMANDS                                 ║
╠═══════════════════════════════════════════════════════════════╣
║  accuse <name>   Name the killer                              ║
║  suspects        List all suspects                            ║
║  time            Check remaining time                         ║
║  help            How to play                                  ║
║  quit            Give up on this case                         ║
╚═══════════════════════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Header
            Constraint::Min(10),     // Main content
            Constraint::Length(1),   // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the investigation layout (case file + interrogation)
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),  // Case file
            Constraint::Percentage(65),  // Interrogation
        ])
        .split(area)
        .to_vec()
}

/// Centered popup of at most `width` x `height`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
