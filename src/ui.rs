use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget},
};

use crate::drill::{Drill, Feedback};

const HORIZONTAL_MARGIN: u16 = 2;

/// One frame of the drill: progress line, the prompt, and how the last key went
pub struct DrillScreen<'a> {
    pub drill: &'a Drill,
    pub last: Option<&'a Feedback>,
}

impl<'a> DrillScreen<'a> {
    pub fn new(drill: &'a Drill, last: Option<&'a Feedback>) -> Self {
        Self { drill, last }
    }
}

impl Widget for &DrillScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let prompt_style = Style::default().patch(bold_style).fg(Color::Cyan);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        // header, padding, prompt, gap, feedback
        let padding = area.height.saturating_sub(4) / 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(padding),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let drill = self.drill;
        let progress = if drill.rounds() > 0 {
            format!("{}/{}", drill.answered(), drill.rounds())
        } else {
            drill.answered().to_string()
        };
        let header = Paragraph::new(Span::styled(
            format!(
                "{progress}   error rate {:.1}%   (esc to quit)",
                drill.session().global_error_rate()
            ),
            dim_style,
        ));
        header.render(chunks[0], buf);

        let prompt = drill.current().map(String::from).unwrap_or_default();
        Paragraph::new(Span::styled(prompt, prompt_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        if let Some(fb) = self.last {
            let feedback = if fb.correct {
                Span::styled(format!("{} ok", fb.expected), green_bold_style)
            } else {
                Span::styled(
                    format!("{} expected, got {}", fb.expected, fb.typed),
                    red_bold_style,
                )
            };
            Paragraph::new(feedback)
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }
    }
}
