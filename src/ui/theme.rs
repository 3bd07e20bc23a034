//! UI theme definition.

use ratatui::style::{Color as TermColor, Modifier, Style};

use crate::graphics::Color;

/// Gradient colors of the unfinished part of a progress track.
pub const DIM_PROGRESS_COLORS: [Color; 3] = [
    Color(0x66F4_4336), // red
    Color(0x66FF_EB3B), // yellow
    Color(0x664C_AF50), // green
];

/// Gradient colors of the finished part of a progress track.
pub const BRIGHT_PROGRESS_COLORS: [Color; 3] = [
    Color(0xFFF4_4336),
    Color(0xFFFF_EB3B),
    Color(0xFF4C_AF50),
];

/// Default color of the text in the middle of an arc.
pub const PROGRESS_TEXT_COLOR: Color = Color(0xFF75_7575);

/// Theme for the demo host's chrome around the widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // Basic styles
    pub normal_text: Style,
    pub block_style: Style,
    pub header_style: Style,
    pub label_style: Style,
    pub value_style: Style,

    // Status styles
    pub help_style: Style,
    pub status_live: Style,
    pub status_paused: Style,

    // Key styles
    pub key_style: Style,

    /// Background the widgets' translucent colors are composited over.
    pub canvas_background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Basic styles
            normal_text: Style::default().fg(TermColor::White),
            block_style: Style::default(),
            header_style: Style::default().fg(TermColor::Cyan).add_modifier(Modifier::BOLD),
            label_style: Style::default().fg(TermColor::Gray),
            value_style: Style::default().fg(TermColor::White),

            // Status styles
            help_style: Style::default().fg(TermColor::Gray),
            status_live: Style::default().fg(TermColor::Green),
            status_paused: Style::default().fg(TermColor::Yellow),

            // Key styles
            key_style: Style::default().fg(TermColor::Cyan).add_modifier(Modifier::BOLD),

            canvas_background: Color::BLACK,
        }
    }
}
