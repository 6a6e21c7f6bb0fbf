//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and manages playback operations.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Queue-driven playback control
//! - `navigation`: Screen navigation and library actions
//! - `transfers`: CSV/ZIP exports and single-track downloads

mod input;
mod navigation;
mod playback;
mod transfers;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::audio::AudioPlayer;
use crate::model::{AppModel, HifiClient, LibraryView, RecentEntry};
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) client: HifiClient,
    pub(crate) storage: Storage,
    pub(crate) audio: Arc<AudioPlayer>,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        client: HifiClient,
        storage: Storage,
        audio: Arc<AudioPlayer>,
    ) -> Self {
        Self {
            model,
            client,
            storage,
            audio,
        }
    }

    /// Loads persisted state into the model at startup.
    pub async fn init_from_storage(&self) {
        if let Err(e) = self.storage.load().await {
            tracing::warn!(error = %e, "Failed to load library, starting fresh");
        }
        let settings = self.storage.settings().await;
        let model = self.model.lock().await;
        model.set_settings(settings).await;
        drop(model);
        self.refresh_home().await;
        self.refresh_library().await;
    }

    /// Mirrors storage into the model's Home screen content. The
    /// recommended section is fetched separately and kept as-is.
    pub(crate) async fn refresh_home(&self) {
        let model = self.model.lock().await;
        let mut content = model.get_home().await;
        content.recents = self.storage.recently_played().await;
        content.search_history = self.storage.search_history().await;
        model.set_home(content).await;
    }

    /// Fills the Home screen's recommended section, seeded by the most
    /// recently played artist when there is one. Best-effort: failures
    /// are logged and Home simply stays without the section.
    pub async fn load_recommendations(&self) {
        let seed = self
            .storage
            .recently_played()
            .await
            .iter()
            .find_map(|entry| match entry {
                RecentEntry::Track { track, .. } => Some(track.artist.name.clone()),
                RecentEntry::Album { album, .. } => {
                    album.artist.as_ref().map(|a| a.name.clone())
                }
                RecentEntry::Artist { artist, .. } => Some(artist.name.clone()),
                RecentEntry::Playlist { .. } => None,
            });

        let (title, query) = match &seed {
            Some(name) => (format!("More from {name}"), name.clone()),
            None => ("Popular now".to_string(), "top hits".to_string()),
        };

        match self.client.search(&query).await {
            Ok(results) => {
                let mut tracks = results.tracks;
                tracks.truncate(10);
                tracing::info!(count = tracks.len(), query = %query, "Loaded home recommendations");
                let model = self.model.lock().await;
                let mut content = model.get_home().await;
                content.recommended_title = title;
                content.recommended = tracks;
                model.set_home(content).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "Failed to load home recommendations");
            }
        }
    }

    /// Mirrors storage into the model's Library screen content.
    pub(crate) async fn refresh_library(&self) {
        let view = LibraryView {
            playlists: self.storage.playlists().await,
            liked: self.storage.liked_tracks().await,
            albums: self.storage.saved_albums().await,
            artists: self.storage.followed_artists().await,
        };
        self.model.lock().await.set_library(view).await;
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = error.to_string();

        if error_str.contains("404") {
            "Not found. The content may have been removed.".to_string()
        } else if error_str.contains("429") {
            "Rate limited. Please wait a moment.".to_string()
        } else if error_str.contains("timed out") || error_str.contains("timeout") {
            "Request timed out. All API instances may be unreachable.".to_string()
        } else if error_str.contains("error sending request") || error_str.contains("connect") {
            "Network error. Check your connection.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
