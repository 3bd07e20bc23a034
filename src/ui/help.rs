//! Help overlay showing keyboard shortcuts.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::ui::Theme;

const SHORTCUTS: &[(&str, &str)] = &[
    ("q, Esc", "Quit application"),
    ("?, F1", "Toggle this help screen"),
    ("p", "Pause or resume simulated progress"),
    ("←/→, -/+", "Remove or add progress"),
    ("[ / ]", "Narrow or widen the arc"),
    ("m", "Halve max progress"),
];

/// Help overlay showing keyboard shortcuts and usage information.
pub struct HelpView;

impl HelpView {
    /// Render the help overlay
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = Self::centered_rect(60, 70, area);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_block = Block::default()
            .title("Progress widgets help")
            .borders(Borders::ALL)
            .style(theme.block_style);

        let mut help_text = vec![
            Line::from(Span::styled("Shortcuts", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        help_text.extend(SHORTCUTS.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(*keys, theme.key_style),
                Span::raw(" - "),
                Span::raw(*action),
            ])
        }));
        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "Halving max keeps the current progress until it next changes.",
            theme.help_style,
        )));

        let help_widget = Paragraph::new(help_text)
            .block(help_block)
            .style(theme.normal_text)
            .alignment(Alignment::Left);

        frame.render_widget(help_widget, popup_area);
    }

    /// Create a centered rect using percentages of `r`.
    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_width = (u32::from(r.width) * u32::from(percent_x) / 100) as u16;
        let popup_height = (u32::from(r.height) * u32::from(percent_y) / 100) as u16;

        Rect {
            x: r.x + (r.width - popup_width) / 2,
            y: r.y + (r.height - popup_height) / 2,
            width: popup_width,
            height: popup_height,
        }
    }
}
