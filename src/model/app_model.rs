//! Main application model with state management

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::history::{Entity, HistoryEntry, HistoryStack, Screen};
use super::playback::{PlaybackInfo, PlaybackState};
use super::queue::{NextStep, PlayQueue};
use super::types::{
    ActiveSection, Album, Artist, ArtistSection, CategoryFilter, LibraryTab, Playlist, RecentEntry,
    RepeatMode, SelectedItem, Settings, Track, TransferState, UiState,
};

/// Data shown on the Home screen.
#[derive(Clone, Debug, Default)]
pub struct HomeContent {
    pub recents: Vec<RecentEntry>,
    pub search_history: Vec<String>,
    /// Suggested tracks fetched in the background at startup.
    pub recommended_title: String,
    pub recommended: Vec<Track>,
}

/// Library screen data, refreshed from storage whenever it changes.
#[derive(Clone, Debug, Default)]
pub struct LibraryView {
    pub playlists: Vec<Playlist>,
    pub liked: Vec<Track>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
}

/// Main application model containing all state
pub struct AppModel {
    queue: Arc<Mutex<PlayQueue>>,
    playback: Arc<Mutex<PlaybackState>>,
    history: Arc<Mutex<HistoryStack>>,
    pub ui_state: Arc<Mutex<UiState>>,
    home: Arc<Mutex<HomeContent>>,
    library: Arc<Mutex<LibraryView>>,
    settings: Arc<Mutex<Settings>>,
    // Std mutex so export progress callbacks can publish without an
    // async context.
    transfers: Arc<StdMutex<Vec<TransferState>>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(PlayQueue::default())),
            playback: Arc::new(Mutex::new(PlaybackState::default())),
            history: Arc::new(Mutex::new(HistoryStack::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            home: Arc::new(Mutex::new(HomeContent::default())),
            library: Arc::new(Mutex::new(LibraryView::default())),
            settings: Arc::new(Mutex::new(Settings::default())),
            transfers: Arc::new(StdMutex::new(Vec::new())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Playback & queue
    // ========================================================================

    pub async fn get_playback_info(&self, position: Duration) -> PlaybackInfo {
        let playback = self.playback.lock().await;
        let queue = self.queue.lock().await;
        let settings = self.settings.lock().await;
        PlaybackInfo {
            track: playback.current.clone(),
            position,
            is_playing: playback.is_playing,
            shuffling: queue.shuffling(),
            repeat: queue.repeat(),
            volume: settings.volume,
        }
    }

    pub async fn current_track(&self) -> Option<Track> {
        self.playback.lock().await.current.clone()
    }

    pub async fn current_track_id(&self) -> Option<String> {
        self.playback.lock().await.current_id()
    }

    pub async fn is_playing(&self) -> bool {
        self.playback.lock().await.is_playing
    }

    pub async fn set_playing(&self, playing: bool) {
        self.playback.lock().await.is_playing = playing;
    }

    /// Registers a new play request and returns its epoch. The fetch
    /// that resolves it must present the epoch back to apply.
    pub async fn begin_play(&self) -> u64 {
        self.playback.lock().await.begin_play()
    }

    /// Installs `track` as current if `epoch` is still the latest play
    /// request. Returns false when a newer request superseded it.
    pub async fn apply_play(&self, track: Track, epoch: u64) -> bool {
        let mut playback = self.playback.lock().await;
        if !playback.is_current(epoch) {
            tracing::debug!(track_id = %track.id, "Discarding stale play response");
            return false;
        }
        playback.current = Some(track);
        playback.is_playing = true;
        true
    }

    pub async fn replace_queue(&self, context: Vec<Track>) {
        self.queue.lock().await.replace(context);
    }

    pub async fn enqueue(&self, track: Track) {
        self.queue.lock().await.enqueue(track);
    }

    pub async fn queue_tracks(&self) -> Vec<Track> {
        self.queue.lock().await.tracks().to_vec()
    }

    pub async fn next_step(&self) -> NextStep {
        let current = self.current_track_id().await;
        self.queue.lock().await.next_after(current.as_deref())
    }

    pub async fn prev_track(&self) -> Option<Track> {
        let current = self.current_track_id().await;
        self.queue.lock().await.prev_before(current.as_deref())
    }

    pub async fn toggle_shuffle(&self) -> bool {
        let current = self.current_track_id().await;
        let mut queue = self.queue.lock().await;
        let on = !queue.shuffling();
        queue.set_shuffle(on, current.as_deref(), &mut rand::rng());
        on
    }

    pub async fn cycle_repeat(&self) -> RepeatMode {
        self.queue.lock().await.cycle_repeat()
    }

    // ========================================================================
    // Navigation history
    // ========================================================================

    pub async fn current_entry(&self) -> HistoryEntry {
        self.history.lock().await.current().clone()
    }

    pub async fn push_entry(&self, entry: HistoryEntry) {
        self.history.lock().await.push(entry);
        self.ui_state.lock().await.content_selected = 0;
    }

    pub async fn go_back(&self) -> Option<HistoryEntry> {
        let entry = self.history.lock().await.back().cloned();
        if entry.is_some() {
            self.ui_state.lock().await.content_selected = 0;
        }
        entry
    }

    pub async fn go_forward(&self) -> Option<HistoryEntry> {
        let entry = self.history.lock().await.forward().cloned();
        if entry.is_some() {
            self.ui_state.lock().await.content_selected = 0;
        }
        entry
    }

    pub async fn nav_state(&self) -> (bool, bool) {
        let history = self.history.lock().await;
        (history.can_back(), history.can_forward())
    }

    /// Replaces the track list of the current history entry, clamping
    /// the cursor to the new length.
    pub async fn update_entry_tracks(&self, tracks: Vec<Track>) {
        let mut history = self.history.lock().await;
        history.current_mut().detail_tracks = tracks;
        let len = history.current().detail_tracks.len();
        drop(history);
        let mut ui = self.ui_state.lock().await;
        if ui.content_selected >= len {
            ui.content_selected = len.saturating_sub(1);
        }
    }

    /// Updates the stored search filter on the current entry so it
    /// survives back/forward.
    pub async fn set_entry_filter(&self, filter: CategoryFilter) {
        self.history.lock().await.current_mut().filter = filter;
        let mut ui = self.ui_state.lock().await;
        ui.search_filter = filter;
        ui.content_selected = 0;
    }

    // ========================================================================
    // Home & library content
    // ========================================================================

    pub async fn set_home(&self, content: HomeContent) {
        *self.home.lock().await = content;
    }

    pub async fn get_home(&self) -> HomeContent {
        self.home.lock().await.clone()
    }

    pub async fn set_library(&self, view: LibraryView) {
        *self.library.lock().await = view;
    }

    pub async fn get_library(&self) -> LibraryView {
        self.library.lock().await.clone()
    }

    pub async fn get_settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    pub async fn set_settings(&self, settings: Settings) {
        *self.settings.lock().await = settings;
    }

    // ========================================================================
    // Transfers (exports & downloads)
    // ========================================================================

    pub fn transfers_handle(&self) -> Arc<StdMutex<Vec<TransferState>>> {
        self.transfers.clone()
    }

    pub fn get_transfers(&self) -> Vec<TransferState> {
        self.transfers.lock().map(|t| t.clone()).unwrap_or_default()
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_input.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_input.pop();
    }

    pub async fn set_search_input(&self, query: String) {
        self.ui_state.lock().await.search_input = query;
    }

    pub async fn set_loading(&self, loading: bool) {
        self.ui_state.lock().await.is_loading = loading;
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > 5 {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn open_playlist_picker(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_playlist_picker = true;
        state.playlist_picker_selected = 0;
    }

    pub async fn close_playlist_picker(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_playlist_picker = false;
        state.new_playlist_input = None;
    }

    pub async fn is_playlist_picker_open(&self) -> bool {
        self.ui_state.lock().await.show_playlist_picker
    }

    pub async fn playlist_picker_move(&self, down: bool) {
        let count = self
            .library
            .lock()
            .await
            .playlists
            .iter()
            .filter(|p| p.is_local)
            .count();
        let mut state = self.ui_state.lock().await;
        // One extra row for "new playlist".
        let max = count; // indices 0..=count
        if down {
            if state.playlist_picker_selected < max {
                state.playlist_picker_selected += 1;
            }
        } else if state.playlist_picker_selected > 0 {
            state.playlist_picker_selected -= 1;
        }
    }

    pub async fn cycle_library_tab(&self, forward: bool) {
        let mut state = self.ui_state.lock().await;
        state.library_tab = if forward {
            state.library_tab.next()
        } else {
            state.library_tab.prev()
        };
        state.content_selected = 0;
    }

    pub async fn toggle_artist_section(&self) {
        let mut state = self.ui_state.lock().await;
        state.artist_section = state.artist_section.toggle();
        state.content_selected = 0;
    }

    pub async fn sidebar_move(&self, down: bool) {
        let mut state = self.ui_state.lock().await;
        let max = state.sidebar_items.len().saturating_sub(1);
        if down {
            if state.sidebar_selected < max {
                state.sidebar_selected += 1;
            }
        } else if state.sidebar_selected > 0 {
            state.sidebar_selected -= 1;
        }
    }

    pub async fn content_move(&self, down: bool) {
        let len = self.content_len().await;
        let mut state = self.ui_state.lock().await;
        if down {
            if state.content_selected + 1 < len {
                state.content_selected += 1;
            }
        } else if state.content_selected > 0 {
            state.content_selected -= 1;
        }
    }

    /// Length of the list the content cursor currently moves over.
    async fn content_len(&self) -> usize {
        let entry = self.history.lock().await.current().clone();
        let ui = self.ui_state.lock().await.clone();
        match entry.screen {
            Screen::Home => {
                let home = self.home.lock().await;
                home.recents.len() + home.recommended.len()
            }
            Screen::Search => match ui.search_filter {
                CategoryFilter::All => {
                    entry.results.tracks.len()
                        + entry.results.albums.len()
                        + entry.results.artists.len()
                        + entry.results.playlists.len()
                }
                CategoryFilter::Tracks => entry.results.tracks.len(),
                CategoryFilter::Albums => entry.results.albums.len(),
                CategoryFilter::Artists => entry.results.artists.len(),
                CategoryFilter::Playlists => entry.results.playlists.len(),
            },
            Screen::Library => {
                let library = self.library.lock().await;
                match ui.library_tab {
                    LibraryTab::Playlists => library.playlists.len(),
                    LibraryTab::Liked => library.liked.len(),
                    LibraryTab::Albums => library.albums.len(),
                    LibraryTab::Artists => library.artists.len(),
                }
            }
            Screen::LikedSongs => self.library.lock().await.liked.len(),
            Screen::Settings => Settings::ROW_COUNT,
            Screen::AlbumDetail | Screen::PlaylistDetail => entry.detail_tracks.len(),
            Screen::ArtistDetail => match ui.artist_section {
                ArtistSection::TopTracks => entry.detail_tracks.len(),
                ArtistSection::Albums => entry.detail_albums.len(),
            },
        }
    }

    /// Resolves the item under the content cursor.
    pub async fn get_selected_content_item(&self) -> Option<SelectedItem> {
        let entry = self.history.lock().await.current().clone();
        let ui = self.ui_state.lock().await.clone();
        let idx = ui.content_selected;

        match entry.screen {
            Screen::Home => {
                let home = self.home.lock().await;
                if idx < home.recents.len() {
                    home.recents.get(idx).cloned().map(SelectedItem::Recent)
                } else {
                    // The cursor continues into the recommended section.
                    home.recommended
                        .get(idx - home.recents.len())
                        .map(|t| SelectedItem::Track {
                            track: t.clone(),
                            context: home.recommended.clone(),
                        })
                }
            }
            Screen::Search => {
                let r = &entry.results;
                match ui.search_filter {
                    CategoryFilter::All => {
                        // One flat list: tracks, albums, artists, playlists.
                        let mut i = idx;
                        if i < r.tracks.len() {
                            return Some(SelectedItem::Track {
                                track: r.tracks[i].clone(),
                                context: r.tracks.clone(),
                            });
                        }
                        i -= r.tracks.len();
                        if i < r.albums.len() {
                            return Some(SelectedItem::Album(r.albums[i].clone()));
                        }
                        i -= r.albums.len();
                        if i < r.artists.len() {
                            return Some(SelectedItem::Artist(r.artists[i].clone()));
                        }
                        i -= r.artists.len();
                        r.playlists.get(i).cloned().map(SelectedItem::Playlist)
                    }
                    CategoryFilter::Tracks => r.tracks.get(idx).map(|t| SelectedItem::Track {
                        track: t.clone(),
                        context: r.tracks.clone(),
                    }),
                    CategoryFilter::Albums => r.albums.get(idx).cloned().map(SelectedItem::Album),
                    CategoryFilter::Artists => {
                        r.artists.get(idx).cloned().map(SelectedItem::Artist)
                    }
                    CategoryFilter::Playlists => {
                        r.playlists.get(idx).cloned().map(SelectedItem::Playlist)
                    }
                }
            }
            Screen::Library => {
                let library = self.library.lock().await;
                match ui.library_tab {
                    LibraryTab::Playlists => library
                        .playlists
                        .get(idx)
                        .cloned()
                        .map(SelectedItem::Playlist),
                    LibraryTab::Liked => library.liked.get(idx).map(|t| SelectedItem::Track {
                        track: t.clone(),
                        context: library.liked.clone(),
                    }),
                    LibraryTab::Albums => library.albums.get(idx).cloned().map(SelectedItem::Album),
                    LibraryTab::Artists => {
                        library.artists.get(idx).cloned().map(SelectedItem::Artist)
                    }
                }
            }
            Screen::LikedSongs => {
                let library = self.library.lock().await;
                library.liked.get(idx).map(|t| SelectedItem::Track {
                    track: t.clone(),
                    context: library.liked.clone(),
                })
            }
            Screen::Settings => None,
            Screen::AlbumDetail | Screen::PlaylistDetail => {
                entry.detail_tracks.get(idx).map(|t| SelectedItem::Track {
                    track: t.clone(),
                    context: entry.detail_tracks.clone(),
                })
            }
            Screen::ArtistDetail => match ui.artist_section {
                ArtistSection::TopTracks => {
                    entry.detail_tracks.get(idx).map(|t| SelectedItem::Track {
                        track: t.clone(),
                        context: entry.detail_tracks.clone(),
                    })
                }
                ArtistSection::Albums => entry
                    .detail_albums
                    .get(idx)
                    .cloned()
                    .map(SelectedItem::Album),
            },
        }
    }

    /// The track list of the view under the cursor, for exports and
    /// queue-save actions.
    pub async fn current_track_list(&self) -> Vec<Track> {
        let entry = self.history.lock().await.current().clone();
        match entry.screen {
            Screen::AlbumDetail | Screen::PlaylistDetail | Screen::ArtistDetail => {
                entry.detail_tracks
            }
            Screen::Search => entry.results.tracks,
            Screen::LikedSongs => self.library.lock().await.liked.clone(),
            Screen::Library => {
                let library = self.library.lock().await;
                let ui = self.ui_state.lock().await;
                match ui.library_tab {
                    LibraryTab::Liked => library.liked.clone(),
                    LibraryTab::Playlists => Vec::new(),
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    /// The entity the current detail screen was opened for.
    pub async fn current_entity(&self) -> Option<Entity> {
        self.history.lock().await.current().entity.clone()
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Album, Artist};

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: Artist {
                id: "a1".to_string(),
                name: "Artist".to_string(),
                picture: None,
            },
            album: Album {
                id: "al1".to_string(),
                title: "Album".to_string(),
                cover: String::new(),
                artist: None,
                release_date: None,
            },
            duration_secs: 180,
            stream_url: None,
            quality: None,
        }
    }

    #[tokio::test]
    async fn home_cursor_walks_recents_then_recommended() {
        let model = AppModel::new();
        model
            .set_home(HomeContent {
                recents: vec![RecentEntry::Track {
                    track: track("r1"),
                    timestamp: 0,
                }],
                search_history: vec![],
                recommended_title: "More from Artist".to_string(),
                recommended: vec![track("s1"), track("s2")],
            })
            .await;
        model.set_active_section(ActiveSection::MainContent).await;

        match model.get_selected_content_item().await {
            Some(SelectedItem::Recent(RecentEntry::Track { track, .. })) => {
                assert_eq!(track.id, "r1")
            }
            other => panic!("expected recent track, got {other:?}"),
        }

        model.content_move(true).await;
        model.content_move(true).await;
        match model.get_selected_content_item().await {
            Some(SelectedItem::Track { track, context }) => {
                assert_eq!(track.id, "s2");
                assert_eq!(context.len(), 2);
            }
            other => panic!("expected recommended track, got {other:?}"),
        }

        // Cursor clamps at the end of the combined list.
        model.content_move(true).await;
        match model.get_selected_content_item().await {
            Some(SelectedItem::Track { track, .. }) => assert_eq!(track.id, "s2"),
            other => panic!("expected clamped selection, got {other:?}"),
        }
    }
}
