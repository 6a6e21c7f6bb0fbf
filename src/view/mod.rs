//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Main layout structure (top bar, sidebar)
//! - `content`: Main content area rendering
//! - `player_bar`: Playback gauge at the bottom of the screen
//! - `overlays`: Modal overlays (error, playlist picker, help, transfers)

mod utils;
mod layout;
mod content;
mod player_bar;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{
    HistoryEntry, HomeContent, LibraryView, PlaybackInfo, Settings, TransferState, UiState,
};

/// Everything one frame needs, snapshotted out of the model before
/// rendering so no locks are held while drawing.
pub struct ViewState<'a> {
    pub playback: &'a PlaybackInfo,
    pub ui: &'a UiState,
    pub entry: &'a HistoryEntry,
    pub home: &'a HomeContent,
    pub library: &'a LibraryView,
    pub settings: &'a Settings,
    pub transfers: &'a [TransferState],
    pub can_back: bool,
    pub can_forward: bool,
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, state: &ViewState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + nav indicator
                Constraint::Min(0),    // Main content (sidebar + content)
                Constraint::Length(3), // Player bar with playback info
            ])
            .split(frame.area());

        let accent = utils::accent_color(state.settings.accent);

        // Top bar: Search + back/forward indicator
        layout::render_top_bar(
            frame,
            chunks[0],
            state.ui,
            accent,
            state.can_back,
            state.can_forward,
        );

        // Middle: Sidebar and Main Content
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(75),
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], state.ui, state.library, accent);

        content::render_main_content(frame, main_chunks[1], state);

        // Bottom: playback gauge with track info and controls
        player_bar::render_player_bar(frame, chunks[2], state.playback, state.settings);

        // Running exports/downloads, pinned to the bottom-right corner
        if !state.transfers.is_empty() {
            overlays::render_transfers(frame, state.transfers);
        }

        if state.ui.error_message.is_some() {
            overlays::render_error_notification(frame, state.ui);
        }

        if state.ui.show_playlist_picker {
            overlays::render_playlist_picker(frame, state.ui, state.library, accent);
        }

        if state.ui.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
