// ABOUTME: Main layout component - branch tree pane, bottom status bar and overlays

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{BranchTreeComponent, ConfirmationDialogComponent, HelpComponent};
use crate::app::AppState;

const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

pub struct LayoutComponent {
    tree: BranchTreeComponent,
    help: HelpComponent,
    confirmation_dialog: ConfirmationDialogComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            tree: BranchTreeComponent::new(),
            help: HelpComponent::new(),
            confirmation_dialog: ConfirmationDialogComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.size());

        self.tree.render(frame, chunks[0], state);
        self.render_status_bar(frame, chunks[1], state);

        if state.help_visible {
            self.help.render(frame, frame.size());
        }
        if let Some(dialog) = &state.confirmation_dialog {
            self.confirmation_dialog.render(frame, frame.size(), dialog);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let separator = || Span::styled("  │  ", Style::default().fg(SUBDUED_BORDER));
        let key = |k: &'static str| Span::styled(k, Style::default().fg(GOLD).add_modifier(Modifier::BOLD));
        let hint = |h: &'static str| Span::styled(h, Style::default().fg(MUTED_GRAY));

        let mut spans = vec![
            key("?"),
            hint(" help "),
            key("s"),
            hint(" sort "),
            key("r"),
            hint(" refresh "),
            key("y"),
            hint(" copy "),
            key("d"),
            hint(" delete "),
            key("p"),
            hint(" prune "),
            key("q"),
            hint(" quit"),
        ];

        if let Some(selected) = state.selected_node() {
            spans.push(separator());
            spans.push(Span::styled(selected.tooltip().to_string(), Style::default().fg(SOFT_WHITE)));
        }
        if let Some(message) = &state.status_message {
            spans.push(separator());
            spans.push(Span::styled(message.clone(), Style::default().fg(SELECTION_GREEN)));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(PANEL_BG)),
            area,
        );
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
