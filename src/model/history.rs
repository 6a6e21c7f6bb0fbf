//! Browser-style navigation history over the app's screens.

use crate::model::types::{Album, Artist, CategoryFilter, Playlist, SearchResults, Track};

/// Which screen an entry points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Search,
    Library,
    LikedSongs,
    Settings,
    AlbumDetail,
    ArtistDetail,
    PlaylistDetail,
}

/// The entity a detail screen was opened for.
#[derive(Clone, Debug)]
pub enum Entity {
    Album(Album),
    Artist(Artist),
    Playlist(Playlist),
}

/// One fully loaded view, snapshotted so back/forward never refetches.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub screen: Screen,
    pub entity: Option<Entity>,
    pub query: String,
    pub filter: CategoryFilter,
    pub results: SearchResults,
    pub detail_tracks: Vec<Track>,
    pub detail_albums: Vec<Album>,
}

impl HistoryEntry {
    pub fn screen(screen: Screen) -> Self {
        Self {
            screen,
            entity: None,
            query: String::new(),
            filter: CategoryFilter::All,
            results: SearchResults::default(),
            detail_tracks: Vec::new(),
            detail_albums: Vec::new(),
        }
    }
}

/// Linear history with a cursor. The root Home entry is permanent, so
/// back from the first real view always lands somewhere sensible.
#[derive(Clone, Debug)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self {
            entries: vec![HistoryEntry::screen(Screen::Home)],
            index: 0,
        }
    }
}

impl HistoryStack {
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn current_mut(&mut self) -> &mut HistoryEntry {
        &mut self.entries[self.index]
    }

    pub fn can_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Pushes a new entry, dropping everything ahead of the cursor.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index += 1;
    }

    /// Moves the cursor back one entry. At the root this is a no-op.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Moves the cursor forward one entry, if anything lies ahead.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_home_root() {
        let h = HistoryStack::default();
        assert_eq!(h.current().screen, Screen::Home);
        assert!(!h.can_back());
        assert!(!h.can_forward());
    }

    #[test]
    fn back_at_root_is_noop() {
        let mut h = HistoryStack::default();
        assert!(h.back().is_none());
        assert_eq!(h.current().screen, Screen::Home);
    }

    #[test]
    fn push_then_back_and_forward() {
        let mut h = HistoryStack::default();
        h.push(HistoryEntry::screen(Screen::Search));
        h.push(HistoryEntry::screen(Screen::AlbumDetail));

        assert_eq!(h.back().unwrap().screen, Screen::Search);
        assert_eq!(h.back().unwrap().screen, Screen::Home);
        assert_eq!(h.forward().unwrap().screen, Screen::Search);
        assert_eq!(h.forward().unwrap().screen, Screen::AlbumDetail);
        assert!(h.forward().is_none());
    }

    #[test]
    fn push_truncates_forward_entries() {
        let mut h = HistoryStack::default();
        h.push(HistoryEntry::screen(Screen::Search));
        h.push(HistoryEntry::screen(Screen::AlbumDetail));
        h.back();
        h.push(HistoryEntry::screen(Screen::ArtistDetail));

        // AlbumDetail is gone.
        assert!(!h.can_forward());
        assert_eq!(h.current().screen, Screen::ArtistDetail);
        assert_eq!(h.len(), 3);
        assert_eq!(h.back().unwrap().screen, Screen::Search);
    }

    #[test]
    fn home_push_keeps_back_history() {
        let mut h = HistoryStack::default();
        h.push(HistoryEntry::screen(Screen::Search));
        h.push(HistoryEntry::screen(Screen::Home));

        // Going Home is a plain navigation, not a reset.
        assert!(h.can_back());
        assert_eq!(h.back().unwrap().screen, Screen::Search);
        assert_eq!(h.forward().unwrap().screen, Screen::Home);
    }

    #[test]
    fn current_mut_updates_snapshot_in_place() {
        let mut h = HistoryStack::default();
        h.push(HistoryEntry::screen(Screen::Search));
        h.current_mut().query = "aphex twin".to_string();
        h.back();
        assert_eq!(h.forward().unwrap().query, "aphex twin");
    }
}
