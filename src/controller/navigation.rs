//! Screen navigation and library actions

use crate::model::{
    Album, Artist, Entity, HistoryEntry, Playlist, RecentEntry, Screen, SelectedItem,
};

use super::AppController;

impl AppController {
    /// Runs a search and pushes the fully loaded results screen.
    pub async fn perform_search(&self, query: &str) {
        let model = self.model.lock().await;
        model.set_loading(true).await;
        drop(model);

        tracing::info!(query, "Searching");
        let result = self.client.search(query).await;

        let model = self.model.lock().await;
        model.set_loading(false).await;
        match result {
            Ok(results) => {
                let mut entry = HistoryEntry::screen(Screen::Search);
                entry.query = query.to_string();
                entry.results = results;
                model.push_entry(entry).await;
                model.set_entry_filter(Default::default()).await;
                drop(model);

                if let Err(e) = self.storage.push_search(query).await {
                    tracing::warn!(error = %e, "Failed to record search query");
                }
                self.refresh_home().await;
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Search failed");
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn open_album(&self, album: Album) {
        let model = self.model.lock().await;
        model.set_loading(true).await;
        drop(model);

        let result = self.client.album_tracks(&album.id).await;

        let model = self.model.lock().await;
        model.set_loading(false).await;
        match result {
            Ok((album, tracks)) => {
                let mut entry = HistoryEntry::screen(Screen::AlbumDetail);
                entry.entity = Some(Entity::Album(album));
                entry.detail_tracks = tracks;
                model.push_entry(entry).await;
                drop(model);
                self.record_entity_recent().await;
            }
            Err(e) => {
                tracing::error!(album_id = %album.id, error = %e, "Failed to open album");
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn open_artist(&self, artist: Artist) {
        let model = self.model.lock().await;
        model.set_loading(true).await;
        drop(model);

        let result = self.client.artist_detail(&artist.id).await;

        let model = self.model.lock().await;
        model.set_loading(false).await;
        match result {
            Ok((artist, top_tracks, albums)) => {
                let mut entry = HistoryEntry::screen(Screen::ArtistDetail);
                entry.entity = Some(Entity::Artist(artist));
                entry.detail_tracks = top_tracks;
                entry.detail_albums = albums;
                model.push_entry(entry).await;
                drop(model);
                self.record_entity_recent().await;
            }
            Err(e) => {
                tracing::error!(artist_id = %artist.id, error = %e, "Failed to open artist");
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn open_playlist(&self, playlist: Playlist) {
        // Local playlists carry their tracks, no fetch needed.
        if playlist.is_local {
            let mut entry = HistoryEntry::screen(Screen::PlaylistDetail);
            entry.detail_tracks = playlist.tracks.clone();
            entry.entity = Some(Entity::Playlist(playlist));
            self.model.lock().await.push_entry(entry).await;
            self.record_entity_recent().await;
            return;
        }

        let model = self.model.lock().await;
        model.set_loading(true).await;
        drop(model);

        let result = self.client.playlist_tracks(&playlist.uuid).await;

        let model = self.model.lock().await;
        model.set_loading(false).await;
        match result {
            Ok((playlist, tracks)) => {
                let mut entry = HistoryEntry::screen(Screen::PlaylistDetail);
                entry.entity = Some(Entity::Playlist(playlist));
                entry.detail_tracks = tracks;
                model.push_entry(entry).await;
                drop(model);
                self.record_entity_recent().await;
            }
            Err(e) => {
                tracing::error!(playlist_id = %playlist.uuid, error = %e, "Failed to open playlist");
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn open_sidebar_item(&self, index: usize) {
        match index {
            0 => {
                self.refresh_home().await;
                // Home is an ordinary navigation, Back still works.
                let entry = HistoryEntry::screen(Screen::Home);
                self.model.lock().await.push_entry(entry).await;
            }
            1 => {
                self.refresh_library().await;
                let entry = HistoryEntry::screen(Screen::Library);
                self.model.lock().await.push_entry(entry).await;
            }
            2 => {
                self.refresh_library().await;
                let entry = HistoryEntry::screen(Screen::LikedSongs);
                self.model.lock().await.push_entry(entry).await;
            }
            3 => {
                let entry = HistoryEntry::screen(Screen::Settings);
                self.model.lock().await.push_entry(entry).await;
            }
            _ => {}
        }
    }

    pub async fn go_back(&self) {
        let model = self.model.lock().await;
        if let Some(entry) = model.go_back().await {
            let mut ui = model.ui_state.lock().await;
            ui.search_filter = entry.filter;
        }
    }

    pub async fn go_forward(&self) {
        let model = self.model.lock().await;
        if let Some(entry) = model.go_forward().await {
            let mut ui = model.ui_state.lock().await;
            ui.search_filter = entry.filter;
        }
    }

    pub async fn handle_selected_item(&self, item: SelectedItem) {
        match item {
            SelectedItem::Track { track, context } => self.play_track(track, context).await,
            SelectedItem::Album(album) => self.open_album(album).await,
            SelectedItem::Artist(artist) => self.open_artist(artist).await,
            SelectedItem::Playlist(playlist) => self.open_playlist(playlist).await,
            SelectedItem::Recent(entry) => match entry {
                RecentEntry::Track { track, .. } => {
                    let context = vec![track.clone()];
                    self.play_track(track, context).await;
                }
                RecentEntry::Album { album, .. } => self.open_album(album).await,
                RecentEntry::Artist { artist, .. } => self.open_artist(artist).await,
                RecentEntry::Playlist { playlist, .. } => self.open_playlist(playlist).await,
            },
        }
    }

    /// Toggles the liked state of the selected track.
    pub async fn toggle_like_selected(&self) {
        let selected = self.model.lock().await.get_selected_content_item().await;
        let Some(SelectedItem::Track { track, .. }) = selected else {
            return;
        };
        match self.storage.toggle_liked(&track).await {
            Ok(liked) => {
                tracing::info!(track_id = %track.id, liked, "Like toggled");
                self.refresh_library().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to toggle like");
                self.model
                    .lock()
                    .await
                    .set_error("Could not update liked songs".to_string())
                    .await;
            }
        }
    }

    /// Saves or unsaves the entity the current detail screen shows.
    pub async fn toggle_save_current(&self) {
        let entity = self.model.lock().await.current_entity().await;
        let result = match entity {
            Some(Entity::Album(album)) => self
                .storage
                .toggle_saved_album(&album)
                .await
                .map(|saved| (saved, album.title)),
            Some(Entity::Artist(artist)) => self
                .storage
                .toggle_followed_artist(&artist)
                .await
                .map(|saved| (saved, artist.name)),
            Some(Entity::Playlist(playlist)) if !playlist.is_local => self
                .storage
                .toggle_saved_playlist(&playlist)
                .await
                .map(|saved| (saved, playlist.title)),
            _ => return,
        };
        match result {
            Ok((saved, title)) => {
                tracing::info!(saved, title = %title, "Library save toggled");
                self.refresh_library().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to update library");
                self.model
                    .lock()
                    .await
                    .set_error("Could not update library".to_string())
                    .await;
            }
        }
    }

    /// Snapshots the play queue into a new local playlist.
    pub async fn save_queue_as_playlist(&self, name: &str) {
        let tracks = self.model.lock().await.queue_tracks().await;
        if tracks.is_empty() {
            self.model
                .lock()
                .await
                .set_error("Queue is empty, nothing to save".to_string())
                .await;
            return;
        }
        match self.storage.create_local_playlist(name, tracks).await {
            Ok(playlist) => {
                tracing::info!(title = %playlist.title, "Queue saved as playlist");
                self.refresh_library().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save queue");
                self.model
                    .lock()
                    .await
                    .set_error("Could not save playlist".to_string())
                    .await;
            }
        }
    }

    /// Confirms the playlist picker: adds the selected track either to
    /// an existing local playlist or to a newly named one.
    pub async fn add_selected_to_playlist(&self, picker_index: usize, new_name: Option<&str>) {
        let model = self.model.lock().await;
        let selected = model.get_selected_content_item().await;
        let library = model.get_library().await;
        model.close_playlist_picker().await;
        drop(model);

        let Some(SelectedItem::Track { track, .. }) = selected else {
            return;
        };
        let locals: Vec<Playlist> = library
            .playlists
            .into_iter()
            .filter(|p| p.is_local)
            .collect();

        let result = if let Some(playlist) = locals.get(picker_index) {
            self.storage
                .add_to_local_playlist(&playlist.uuid, &track)
                .await
        } else if let Some(name) = new_name.filter(|n| !n.trim().is_empty()) {
            self.storage
                .create_local_playlist(name.trim(), vec![track])
                .await
                .map(|_| ())
        } else {
            return;
        };

        match result {
            Ok(()) => self.refresh_library().await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to add track to playlist");
                self.model
                    .lock()
                    .await
                    .set_error("Could not add to playlist".to_string())
                    .await;
            }
        }
    }

    /// Re-runs a query from the Home screen's search history.
    pub async fn search_from_history(&self, index: usize) {
        let query = {
            let model = self.model.lock().await;
            let home = model.get_home().await;
            home.search_history.get(index).cloned()
        };
        if let Some(query) = query {
            self.model
                .lock()
                .await
                .set_search_input(query.clone())
                .await;
            self.perform_search(&query).await;
        }
    }

    /// Plays every track of the current detail view as a new context.
    pub async fn play_current_view(&self) {
        let tracks = self.model.lock().await.current_track_list().await;
        if let Some(first) = tracks.first().cloned() {
            self.record_entity_recent().await;
            self.play_track(first, tracks).await;
        }
    }

    /// Records the current detail entity in recently played.
    async fn record_entity_recent(&self) {
        let entity = self.model.lock().await.current_entity().await;
        let timestamp = chrono::Utc::now().timestamp();
        let entry = match entity {
            Some(Entity::Album(album)) => RecentEntry::Album { album, timestamp },
            Some(Entity::Artist(artist)) => RecentEntry::Artist { artist, timestamp },
            Some(Entity::Playlist(playlist)) => RecentEntry::Playlist {
                playlist,
                timestamp,
            },
            None => return,
        };
        if let Err(e) = self.storage.push_recent(entry).await {
            tracing::warn!(error = %e, "Failed to record recent entity");
        }
        self.refresh_home().await;
    }

    /// Removes the selected track from the local playlist whose detail
    /// screen is open.
    pub async fn remove_selected_from_playlist(&self) {
        let model = self.model.lock().await;
        let entity = model.current_entity().await;
        let selected = model.get_selected_content_item().await;
        drop(model);

        let Some(Entity::Playlist(playlist)) = entity else {
            return;
        };
        if !playlist.is_local {
            return;
        }
        let Some(SelectedItem::Track { track, .. }) = selected else {
            return;
        };

        if let Err(e) = self
            .storage
            .remove_from_local_playlist(&playlist.uuid, &track.id)
            .await
        {
            tracing::error!(error = %e, "Failed to remove track from playlist");
            return;
        }

        // Keep the open view in sync with storage.
        let tracks = self
            .storage
            .playlists()
            .await
            .into_iter()
            .find(|p| p.uuid == playlist.uuid)
            .map(|p| p.tracks)
            .unwrap_or_default();
        self.model.lock().await.update_entry_tracks(tracks).await;
        self.refresh_library().await;
    }

    pub async fn delete_selected_local_playlist(&self) {
        let selected = self.model.lock().await.get_selected_content_item().await;
        let Some(SelectedItem::Playlist(playlist)) = selected else {
            return;
        };
        if !playlist.is_local {
            return;
        }
        if let Err(e) = self.storage.delete_playlist(&playlist.uuid).await {
            tracing::error!(error = %e, "Failed to delete playlist");
            return;
        }
        tracing::info!(title = %playlist.title, "Deleted local playlist");
        self.refresh_library().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use crate::audio::AudioPlayer;
    use crate::model::{AppModel, HifiClient, RecentEntry, Screen};
    use crate::storage::Storage;

    use super::AppController;

    fn controller(dir: &tempfile::TempDir) -> AppController {
        AppController::new(
            Arc::new(Mutex::new(AppModel::new())),
            HifiClient::new().unwrap(),
            Storage::at_path(dir.path().join("library.json")),
            Arc::new(AudioPlayer::new(50)),
        )
    }

    #[tokio::test]
    async fn opening_a_playlist_records_it_as_recently_played() {
        let dir = tempfile::tempdir().unwrap();
        let ctrl = controller(&dir);
        let playlist = ctrl
            .storage
            .create_local_playlist("Road trip", Vec::new())
            .await
            .unwrap();

        ctrl.open_playlist(playlist.clone()).await;

        let model = ctrl.model.lock().await;
        assert_eq!(model.current_entry().await.screen, Screen::PlaylistDetail);
        let home = model.get_home().await;
        drop(model);

        let recents = ctrl.storage.recently_played().await;
        assert!(matches!(
            &recents[0],
            RecentEntry::Playlist { playlist: p, .. } if p.uuid == playlist.uuid
        ));
        // The home screen mirrors the stored list.
        assert_eq!(home.recents.len(), 1);
    }
}
