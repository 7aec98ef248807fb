//! Main application state and rendering

use crate::data::{CaseCatalog, CaseRecord};
use crate::game::questions::QuestionEngine;
use crate::game::timer::format_clock;
use crate::game::{Game, GameOutcome, GamePhase};
use crate::tui::widgets::{DramaticBox, TimerBar};
use crate::tui::{
    centered_rect, create_content_layout, create_main_layout, difficulty_color, message_prefix,
    message_style, styled_block, Theme, HELP_TEXT, LOGO, SMALL_LOGO,
};
use crate::GameError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Application state
pub struct App {
    pub catalog: CaseCatalog,
    pub game: Option<Game>,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub current_screen: Screen,
    pub menu_state: ListState,
    pub input_buffer: String,
    engine: Arc<QuestionEngine>,
    time_limit: Option<Duration>,
}

/// Current screen being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    CaseSelect,
    Briefing,
    Investigating,
    GameOver,
}

impl App {
    pub fn new(catalog: CaseCatalog, engine: QuestionEngine) -> Self {
        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            catalog,
            game: None,
            theme: Theme::default(),
            running: true,
            show_help: false,
            current_screen: Screen::CaseSelect,
            menu_state,
            input_buffer: String::new(),
            engine: Arc::new(engine),
            time_limit: None,
        }
    }

    /// Override every case's time limit
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Skip the case list and go straight to a case's briefing
    pub fn open_case(&mut self, id: u32) -> Result<(), GameError> {
        let case = self.catalog.get(id)?.clone();
        self.begin_briefing(case);
        Ok(())
    }

    fn begin_briefing(&mut self, case: CaseRecord) {
        let mut game = Game::new(case, Arc::clone(&self.engine));
        if let Some(limit) = self.time_limit {
            game = game.with_time_limit(limit);
        }
        debug!(session = %game.id, case = game.case.id, "Case opened");
        self.game = Some(game);
        self.input_buffer.clear();
        self.current_screen = Screen::Briefing;
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        self.tick();
        Ok(self.running)
    }

    /// Let the case clock run; moves to the verdict screen when it expires
    pub fn tick(&mut self) {
        if self.current_screen != Screen::Investigating {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            if game.tick().is_some() {
                self.current_screen = Screen::GameOver;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return;
            }
            // '?' is ordinary text while typing a question
            KeyCode::Char('?') if self.current_screen != Screen::Investigating => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            _ => {}
        }

        match self.current_screen {
            Screen::CaseSelect => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Up => self.navigate_up(),
                KeyCode::Down => self.navigate_down(),
                KeyCode::Enter => self.select_case(),
                _ => {}
            },
            Screen::Briefing => match key.code {
                KeyCode::Enter => {
                    if let Some(game) = self.game.as_mut() {
                        game.start();
                        self.current_screen = Screen::Investigating;
                    }
                }
                KeyCode::Esc => {
                    self.game = None;
                    self.current_screen = Screen::CaseSelect;
                }
                _ => {}
            },
            Screen::Investigating => match key.code {
                KeyCode::Enter => self.submit_input(),
                KeyCode::Esc => self.input_buffer.clear(),
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Char(c) => self.input_buffer.push(c),
                _ => {}
            },
            Screen::GameOver => match key.code {
                KeyCode::Enter => {
                    self.game = None;
                    self.current_screen = Screen::CaseSelect;
                }
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                _ => {}
            },
        }
    }

    fn submit_input(&mut self) {
        let line = std::mem::take(&mut self.input_buffer);
        if let Some(game) = self.game.as_mut() {
            game.handle_input(&line);
            if game.is_over() {
                self.current_screen = Screen::GameOver;
            }
        }
    }

    fn select_case(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        if let Some(case) = self.catalog.cases().get(selected) {
            self.begin_briefing(case.clone());
        }
    }

    fn navigate_up(&mut self) {
        let i = self.menu_state.selected().unwrap_or(0);
        if i > 0 {
            self.menu_state.select(Some(i - 1));
        }
    }

    fn navigate_down(&mut self) {
        let max = self.catalog.len().saturating_sub(1);
        let i = self.menu_state.selected().unwrap_or(0);
        if i < max {
            self.menu_state.select(Some(i + 1));
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if self.current_screen == Screen::CaseSelect || self.game.is_none() {
            self.render_case_select(frame);
        } else if let Some(game) = &self.game {
            match self.current_screen {
                Screen::Briefing => self.render_briefing(frame, game),
                Screen::Investigating => self.render_game(frame, game),
                Screen::GameOver => self.render_game_over(frame, game),
                Screen::CaseSelect => {}
            }
        }

        // Overlay help if showing
        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_case_select(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(10),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        let logo = Paragraph::new(LOGO)
            .style(Style::default().fg(self.theme.alert).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(logo, chunks[0]);

        let items: Vec<ListItem> = self
            .catalog
            .cases()
            .iter()
            .map(|case| {
                let color = difficulty_color(case.difficulty);
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("  {} ", case.difficulty.symbol()),
                            Style::default().fg(color),
                        ),
                        Span::styled(
                            format!("Case {}: {}", case.id, case.title),
                            Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(vec![Span::styled(
                        format!(
                            "      {} | {} | {}",
                            case.difficulty,
                            case.location,
                            format_clock(Duration::from_secs(case.time_limit))
                        ),
                        Style::default().fg(Color::DarkGray),
                    )]),
                    Line::from(vec![Span::styled(
                        format!("      {}", case.description),
                        Style::default().fg(Color::Gray),
                    )]),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(styled_block("Choose a Case", &self.theme))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol("→ ");
        frame.render_stateful_widget(menu, chunks[1], &mut self.menu_state);

        let hint = Paragraph::new(" ↑/↓ choose | Enter open | F1 help | q quit ")
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(hint, chunks[2]);
    }

    fn render_briefing(&self, frame: &mut Frame, game: &Game) {
        let area = frame.area();
        frame.render_widget(Clear, area);
        let case = &game.case;

        let label = |text: &'static str| {
            Span::styled(text, Style::default().fg(self.theme.warning).add_modifier(Modifier::BOLD))
        };

        let mut text = vec![
            Line::from(vec![Span::styled(
                case.title.to_uppercase(),
                Style::default().fg(self.theme.alert).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![label("Location: "), Span::raw(case.location.clone())]),
            Line::from(vec![label("Date: "), Span::raw(case.date.clone())]),
            Line::from(vec![
                label("Difficulty: "),
                Span::styled(
                    case.difficulty.to_string(),
                    Style::default().fg(difficulty_color(case.difficulty)),
                ),
            ]),
            Line::from(vec![
                label("Time limit: "),
                Span::raw(format_clock(game.timer.limit())),
            ]),
            Line::from(""),
            Line::from(vec![label("Summary")]),
            Line::from(case.summary.clone()),
            Line::from(""),
            Line::from(vec![label("Victim")]),
            Line::from(format!("{}. {}", case.victim.name, case.victim.description)),
        ];

        if !case.scene_description.trim().is_empty() {
            text.push(Line::from(""));
            text.push(Line::from(vec![label("The Scene")]));
            text.push(Line::from(case.scene_description.clone()));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![label("How to Play")]));
        text.push(Line::from(
            "Ask questions in plain English. Type accuse <name> when you are sure. F1 lists every command.",
        ));

        text.push(Line::from(""));
        text.push(Line::from(vec![Span::styled(
            "Press Enter to start the clock, Esc to pick another case",
            Style::default().fg(self.theme.success),
        )]));

        let briefing = Paragraph::new(text)
            .block(styled_block("Case File", &self.theme))
            .wrap(Wrap { trim: true });
        frame.render_widget(briefing, centered_rect(90, 30, area));
    }

    fn render_game(&self, frame: &mut Frame, game: &Game) {
        let layout = create_main_layout(frame.area());

        self.render_header(frame, layout[0], game);

        let content_layout = create_content_layout(layout[1]);
        self.render_case_file(frame, content_layout[0], game);
        self.render_messages(frame, content_layout[1], game);

        let status = Paragraph::new(format!(" {} | F1 help ", game.check_status()))
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(status, layout[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(17),
                Constraint::Min(20),
                Constraint::Length(30),
            ])
            .split(area);

        let border = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.alert).add_modifier(Modifier::BOLD))
            .block(border.clone());
        frame.render_widget(logo, header_layout[0]);

        let title = Paragraph::new(game.case.title.clone())
            .style(Style::default().fg(self.theme.warning))
            .alignment(Alignment::Center)
            .block(border.clone());
        frame.render_widget(title, header_layout[1]);

        let timer_area = border.inner(header_layout[2]);
        frame.render_widget(border, header_layout[2]);
        frame.render_widget(
            TimerBar::new(game.timer.remaining(), game.timer.limit()),
            timer_area,
        );
    }

    fn render_case_file(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let case = &game.case;
        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default().fg(self.theme.header).add_modifier(Modifier::BOLD),
            ))
        };

        let mut text = vec![
            heading("Victim"),
            Line::from(format!("  {}", case.victim.name)),
            heading("Weapon"),
            Line::from(format!("  {}", case.weapon.kind)),
            heading("Location"),
            Line::from(format!("  {}", case.location)),
            heading("Suspects"),
        ];
        text.extend(case.suspects.iter().map(|s| Line::from(format!("  • {}", s.name))));
        if !case.evidence.is_empty() {
            text.push(heading("Evidence"));
            text.extend(case.evidence.iter().map(|e| Line::from(format!("  • {}", e))));
        }

        let file = Paragraph::new(text)
            .block(styled_block("Case File", &self.theme))
            .wrap(Wrap { trim: false });
        frame.render_widget(file, area);
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),      // Interrogation log
                Constraint::Length(3),   // Input line
            ])
            .split(area);

        let lines: Vec<Line> = game
            .message_log
            .iter()
            .map(|msg| {
                Line::from(vec![
                    Span::styled(
                        msg.timestamp.format("%H:%M:%S ").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{}{}", message_prefix(msg.kind), msg.text),
                        message_style(msg.kind, &self.theme),
                    ),
                ])
            })
            .collect();

        // Scroll by wrapped rows so the newest message sits on the bottom row
        let block = styled_block("Interrogation", &self.theme);
        let inner = block.inner(chunks[0]);
        let log = Paragraph::new(lines).wrap(Wrap { trim: false });
        let hidden_rows = log.line_count(inner.width).saturating_sub(inner.height as usize);
        let scroll = u16::try_from(hidden_rows).unwrap_or(u16::MAX);
        frame.render_widget(log.block(block).scroll((scroll, 0)), chunks[0]);

        let input = Paragraph::new(format!("detective> {}_", self.input_buffer))
            .style(Style::default().fg(self.theme.success))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.success))
                    .title(" Ask a question or accuse <name> "),
            );
        frame.render_widget(input, chunks[1]);
    }

    fn render_game_over(&self, frame: &mut Frame, game: &Game) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let (title, color) = match game.phase {
            GamePhase::GameOver(GameOutcome::Solved) => ("CASE SOLVED", self.theme.success),
            GamePhase::GameOver(GameOutcome::TimeUp) => ("TIME'S UP", self.theme.alert),
            _ => ("CASE CLOSED", self.theme.alert),
        };

        let solution = &game.case.solution;
        let mut lines = vec![
            String::new(),
            format!("Killer:       {}", solution.killer),
            format!("Motive:       {}", solution.motive),
            format!("Method:       {}", solution.method),
            format!("Key evidence: {}", solution.key_evidence),
            String::new(),
            format!("Time used:    {}", format_clock(game.time_used())),
            format!("Questions:    {}", game.stats.questions_asked),
        ];
        if let Some(score) = game.score {
            lines.push(format!("Time bonus:   {}", score.time_bonus));
            lines.push(format!("Efficiency:   {}", score.efficiency_bonus));
            lines.push(format!("FINAL SCORE:  {}", score.total));
        }
        lines.push(String::new());
        lines.push("Enter: investigate another case | q: quit".to_string());

        let height = lines.len() as u16 + 2;
        frame.render_widget(
            DramaticBox::new(title).content(lines).border_color(color),
            centered_rect(90, height, area),
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(67, 26, frame.area());
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent)),
            );
        frame.render_widget(help, popup_area);
    }
}
