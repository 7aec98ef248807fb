//! Custom widgets for the game UI

use crate::game::timer::format_clock;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use std::time::Duration;

/// Countdown bar that drains as the case clock runs
pub struct TimerBar {
    remaining: Duration,
    limit: Duration,
    color: Color,
    warning_threshold: u8,
    danger_threshold: u8,
}

impl TimerBar {
    pub fn new(remaining: Duration, limit: Duration) -> Self {
        Self {
            remaining,
            limit,
            color: Color::Green,
            warning_threshold: 50,
            danger_threshold: 20,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Percentage left at which the bar turns yellow
    pub fn warning_threshold(mut self, threshold: u8) -> Self {
        self.warning_threshold = threshold;
        self
    }

    /// Percentage left at which the bar turns red
    pub fn danger_threshold(mut self, threshold: u8) -> Self {
        self.danger_threshold = threshold;
        self
    }

    /// Whole percent of the limit still on the clock
    pub fn percent_left(&self) -> u8 {
        if self.limit.is_zero() {
            return 0;
        }
        let ratio = self.remaining.as_secs_f64() / self.limit.as_secs_f64();
        (ratio.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl Widget for TimerBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let percent = self.percent_left();
        let color = if percent <= self.danger_threshold {
            Color::Red
        } else if percent <= self.warning_threshold {
            Color::Yellow
        } else {
            self.color
        };

        let label = format!("Time: {}", format_clock(self.remaining));
        buf.set_string(area.x, area.y, &label, Style::default().fg(color));

        if area.height > 1 {
            let inner = area.width - 2;
            let filled = (percent as u16 * inner) / 100;
            let bar_y = area.y + 1;
            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(color));
            }
            for x in filled..inner {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}

/// ASCII art box for dramatic moments
pub struct DramaticBox {
    title: String,
    content: Vec<String>,
    border_color: Color,
}

impl DramaticBox {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            border_color: Color::Red,
        }
    }

    pub fn content(mut self, lines: Vec<String>) -> Self {
        self.content = lines;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }
}

impl Widget for DramaticBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        let style = Style::default().fg(self.border_color);
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        // Double-line border
        buf.set_string(area.x, area.y, "╔", style);
        buf.set_string(area.x, bottom, "╚", style);
        for x in area.x + 1..right {
            buf.set_string(x, area.y, "═", style);
            buf.set_string(x, bottom, "═", style);
        }
        buf.set_string(right, area.y, "╗", style);
        buf.set_string(right, bottom, "╝", style);
        for y in area.y + 1..bottom {
            buf.set_string(area.x, y, "║", style);
            buf.set_string(right, y, "║", style);
        }

        let title = format!(" {} ", self.title);
        let title_width = title.chars().count() as u16;
        if title_width < area.width {
            buf.set_string(area.x + (area.width - title_width) / 2, area.y, &title, style);
        }

        let text_width = (area.width - 4) as usize;
        for (i, line) in self.content.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= bottom {
                break;
            }
            let clipped: String = line.chars().take(text_width).collect();
            buf.set_string(area.x + 2, y, clipped, Style::default().fg(Color::White));
        }
    }
}
