//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (enums, UI state, etc.)
//! - `queue`: Play queue ordering, shuffle and repeat
//! - `history`: Browser-style navigation history over screens
//! - `playback`: Current-track state and the play-request epoch guard
//! - `hifi_client`: HTTP client for the hifi API with instance failover
//! - `app_model`: Main application model with state management methods

mod app_model;
mod hifi_client;
mod history;
mod playback;
mod queue;
pub mod types;

// Re-export all public types for convenient access
pub use types::{
    AccentColor, ActiveSection, Album, Artist, ArtistSection, AudioQuality, CategoryFilter,
    LibraryTab, Playlist, RecentEntry, RepeatMode, SearchResults, SelectedItem, Settings,
    SidebarItem, Track, TransferKind, TransferState, UiState,
};

pub use history::{Entity, HistoryEntry, HistoryStack, Screen};
pub use playback::{PlaybackInfo, PlaybackState};
pub use queue::{NextStep, PlayQueue};

pub use hifi_client::{API_INSTANCES, HifiClient};

pub use app_model::{AppModel, HomeContent, LibraryView};
