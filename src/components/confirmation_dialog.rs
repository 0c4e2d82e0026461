// ABOUTME: Confirmation dialog for delete and prune, with Yes/No keyboard selection

use crate::app::state::ConfirmationDialog;
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

const GOLD: Color = Color::Rgb(255, 215, 0);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);

pub struct ConfirmationDialogComponent;

impl ConfirmationDialogComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dialog: &ConfirmationDialog) {
        let width = 64.min(area.width.saturating_sub(4));
        let height = (if dialog.warning.is_some() { 11 } else { 8 }).min(area.height);
        let dialog_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(format!(" {} ", dialog.title))
            .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().bg(DARK_BG));
        let inner_area = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let mut constraints = Vec::with_capacity(3);
        if dialog.warning.is_some() {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(1));
        constraints.push(Constraint::Length(2));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner_area);

        let mut next = 0;
        if let Some(warning_text) = &dialog.warning {
            let warning = Paragraph::new(warning_text.as_str())
                .style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(warning, chunks[next]);
            next += 1;
        }

        let message = Paragraph::new(dialog.message.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(SOFT_WHITE));
        frame.render_widget(message, chunks[next]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[next + 1]);

        for (label, selected, chunk) in [
            ("Yes", dialog.selected_option, buttons[0]),
            ("No", !dialog.selected_option, buttons[1]),
        ] {
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            frame.render_widget(Paragraph::new(label).style(style).alignment(Alignment::Center), chunk);
        }
    }
}

impl Default for ConfirmationDialogComponent {
    fn default() -> Self {
        Self::new()
    }
}
