// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::{
    state::{AsyncAction, ConfirmAction},
    AppState,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    Refresh,
    ToggleSortMode,
    NextNode,
    PreviousNode,
    GoToTop,
    GoToBottom,
    Expand,
    Collapse,
    ToggleExpanded,
    ToggleDetails,
    CopyBranchName,
    CopyRemoteAddress,
    PruneRemotes,
    DeleteBranch,
    // Confirmation dialog events
    ConfirmationToggle,  // Switch between Yes/No
    ConfirmationConfirm, // Confirm action
    ConfirmationCancel,  // Cancel dialog
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Some(AppEvent::Quit);
        }

        // Dialog captures every key while open
        if state.confirmation_dialog.is_some() {
            return match key_event.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h')
                | KeyCode::Char('l') => Some(AppEvent::ConfirmationToggle),
                KeyCode::Enter => Some(AppEvent::ConfirmationConfirm),
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Some(dialog) = state.confirmation_dialog.as_mut() {
                        dialog.selected_option = true;
                    }
                    Some(AppEvent::ConfirmationConfirm)
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                    Some(AppEvent::ConfirmationCancel)
                }
                _ => None,
            };
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Char('r') | KeyCode::Char('f') => Some(AppEvent::Refresh),
            KeyCode::Char('s') => Some(AppEvent::ToggleSortMode),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextNode),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousNode),
            KeyCode::Char('g') | KeyCode::Home => Some(AppEvent::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(AppEvent::GoToBottom),
            KeyCode::Char('l') | KeyCode::Right => Some(AppEvent::Expand),
            KeyCode::Char('h') | KeyCode::Left => Some(AppEvent::Collapse),
            KeyCode::Enter | KeyCode::Char(' ') => Some(AppEvent::ToggleExpanded),
            KeyCode::Char('i') => Some(AppEvent::ToggleDetails),
            KeyCode::Char('y') => Some(AppEvent::CopyBranchName),
            KeyCode::Char('Y') => Some(AppEvent::CopyRemoteAddress),
            KeyCode::Char('p') => Some(AppEvent::PruneRemotes),
            KeyCode::Char('d') => Some(AppEvent::DeleteBranch),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::Refresh => {
                state.pending_async_action = Some(AsyncAction::Refresh);
            }
            AppEvent::ToggleSortMode => {
                state.pending_async_action = Some(AsyncAction::SetSortMode(state.sort_mode.toggled()));
            }
            AppEvent::NextNode => state.next(),
            AppEvent::PreviousNode => state.previous(),
            AppEvent::GoToTop => state.go_to_top(),
            AppEvent::GoToBottom => state.go_to_bottom(),
            AppEvent::Expand => state.expand(),
            AppEvent::Collapse => state.collapse(),
            AppEvent::ToggleExpanded => state.toggle_expanded(),
            AppEvent::ToggleDetails => state.show_details = !state.show_details,
            AppEvent::CopyBranchName => state.request_for_selected(AsyncAction::CopyBranchName),
            AppEvent::CopyRemoteAddress => {
                state.request_for_selected(AsyncAction::CopyRemoteAddress)
            }
            AppEvent::PruneRemotes => state.request_prune(),
            AppEvent::DeleteBranch => state.request_delete(),
            AppEvent::ConfirmationToggle => {
                if let Some(dialog) = state.confirmation_dialog.as_mut() {
                    dialog.selected_option = !dialog.selected_option;
                }
            }
            AppEvent::ConfirmationConfirm => {
                if let Some(dialog) = &state.confirmation_dialog {
                    if let ConfirmAction::DeleteBranch(id) = &dialog.confirm_action {
                        info!("Delete confirmed for node {:?}", id);
                    }
                }
                state.confirm_dialog();
            }
            AppEvent::ConfirmationCancel => {
                state.confirmation_dialog = None;
            }
        }
    }
}
