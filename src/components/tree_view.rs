// ABOUTME: Branch tree component - remotes, branches and merge targets in an indented list

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};

use crate::app::state::VisibleRow;
use crate::app::AppState;
use crate::tree::{Node, NodeKind, SortMode};

const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const WARNING_ORANGE: Color = Color::Rgb(255, 165, 0);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const LIST_HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

pub struct BranchTreeComponent {
    list_state: ListState,
}

impl Default for BranchTreeComponent {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }
}

impl BranchTreeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.list_state.select(if state.rows.is_empty() {
            None
        } else {
            Some(state.selected)
        });

        let items: Vec<ListItem> = state
            .rows
            .iter()
            .filter_map(|row| state.tree.get(row.node).map(|node| (row, node)))
            .map(|(row, node)| ListItem::new(Self::row_line(row, node, state.show_details)))
            .collect();

        let sort_label = match state.sort_mode {
            SortMode::Name => "by name",
            SortMode::Date => "by date",
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SUBDUED_BORDER))
                    .style(Style::default().bg(DARK_BG))
                    .title(Line::from(vec![
                        Span::styled(" ⎇ ", Style::default().fg(GOLD)),
                        Span::styled(
                            "Merged Branches ",
                            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("({sort_label})"),
                            Style::default().fg(CORNFLOWER_BLUE).add_modifier(Modifier::BOLD),
                        ),
                    ])),
            )
            .highlight_style(
                Style::default()
                    .bg(LIST_HIGHLIGHT_BG)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn row_line(row: &VisibleRow, node: &Node, show_details: bool) -> Line<'static> {
        let indent = "  ".repeat(row.depth);
        let fold = match (row.expandable, row.expanded) {
            (false, _) => "  ",
            (true, true) => "▾ ",
            (true, false) => "▸ ",
        };

        let (icon_color, label_style) = match &node.kind {
            NodeKind::Remote(_) => (
                GOLD,
                Style::default().fg(SOFT_WHITE).add_modifier(Modifier::BOLD),
            ),
            NodeKind::Branch(_) => (CORNFLOWER_BLUE, Style::default().fg(SOFT_WHITE)),
            NodeKind::MergedBranch(_) => (SELECTION_GREEN, Style::default().fg(SOFT_WHITE)),
            NodeKind::MergedInto { .. } => (MUTED_GRAY, Style::default().fg(MUTED_GRAY)),
            NodeKind::Status(_) => (WARNING_ORANGE, Style::default().fg(WARNING_ORANGE)),
        };

        let mut spans = vec![
            Span::raw(indent),
            Span::styled(fold, Style::default().fg(MUTED_GRAY)),
            Span::styled(format!("{} ", node.icon().glyph()), Style::default().fg(icon_color)),
            Span::styled(node.label.clone(), label_style),
        ];

        if let (true, Some(detail)) = (show_details, &node.detail) {
            spans.push(Span::styled(format!("  {detail}"), Style::default().fg(MUTED_GRAY)));
        }

        Line::from(spans)
    }
}
