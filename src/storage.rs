//! Persistent library store: likes, saves, local playlists, recents,
//! search history and settings, backed by a single JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::model::types::{Album, Artist, Playlist, RecentEntry, Settings, Track};

const LIBRARY_FILE: &str = ".cache/library.json";

/// How many recently-played entries survive.
pub const RECENTS_CAP: usize = 20;
/// How many past search queries survive.
pub const SEARCH_HISTORY_CAP: usize = 20;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LibraryData {
    #[serde(default)]
    pub liked_tracks: Vec<Track>,
    #[serde(default)]
    pub saved_albums: Vec<Album>,
    #[serde(default)]
    pub followed_artists: Vec<Artist>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    #[serde(default)]
    pub recently_played: Vec<RecentEntry>,
    #[serde(default)]
    pub search_history: Vec<String>,
    #[serde(default)]
    pub settings: Settings,
}

/// Library store. Every mutation writes straight through to disk so a
/// crash never loses more than the in-flight change.
#[derive(Clone)]
pub struct Storage {
    path: PathBuf,
    data: Arc<RwLock<LibraryData>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::at_path(LIBRARY_FILE)
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: Arc::new(RwLock::new(LibraryData::default())),
        }
    }

    /// Loads the library from disk. A missing file is a fresh start,
    /// not an error.
    pub async fn load(&self) -> Result<()> {
        if !Path::new(&self.path).exists() {
            tracing::debug!(path = %self.path.display(), "No library file, starting empty");
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let loaded: LibraryData = serde_json::from_str(&content)?;
        *self.data.write().await = loaded;
        tracing::info!(path = %self.path.display(), "Library loaded");
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let data = self.data.read().await;
        let content = serde_json::to_string_pretty(&*data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    // Liked tracks

    pub async fn is_liked(&self, track_id: &str) -> bool {
        self.data
            .read()
            .await
            .liked_tracks
            .iter()
            .any(|t| t.id == track_id)
    }

    /// Toggles a track's liked state, returning the new state.
    pub async fn toggle_liked(&self, track: &Track) -> Result<bool> {
        let liked = {
            let mut data = self.data.write().await;
            if let Some(pos) = data.liked_tracks.iter().position(|t| t.id == track.id) {
                data.liked_tracks.remove(pos);
                false
            } else {
                data.liked_tracks.insert(0, track.clone());
                true
            }
        };
        self.save().await?;
        tracing::debug!(track_id = %track.id, liked, "Toggled liked track");
        Ok(liked)
    }

    pub async fn liked_tracks(&self) -> Vec<Track> {
        self.data.read().await.liked_tracks.clone()
    }

    // Saved albums / followed artists

    pub async fn is_album_saved(&self, album_id: &str) -> bool {
        self.data
            .read()
            .await
            .saved_albums
            .iter()
            .any(|a| a.id == album_id)
    }

    pub async fn toggle_saved_album(&self, album: &Album) -> Result<bool> {
        let saved = {
            let mut data = self.data.write().await;
            if let Some(pos) = data.saved_albums.iter().position(|a| a.id == album.id) {
                data.saved_albums.remove(pos);
                false
            } else {
                data.saved_albums.insert(0, album.clone());
                true
            }
        };
        self.save().await?;
        Ok(saved)
    }

    pub async fn saved_albums(&self) -> Vec<Album> {
        self.data.read().await.saved_albums.clone()
    }

    pub async fn is_artist_followed(&self, artist_id: &str) -> bool {
        self.data
            .read()
            .await
            .followed_artists
            .iter()
            .any(|a| a.id == artist_id)
    }

    pub async fn toggle_followed_artist(&self, artist: &Artist) -> Result<bool> {
        let followed = {
            let mut data = self.data.write().await;
            if let Some(pos) = data.followed_artists.iter().position(|a| a.id == artist.id) {
                data.followed_artists.remove(pos);
                false
            } else {
                data.followed_artists.insert(0, artist.clone());
                true
            }
        };
        self.save().await?;
        Ok(followed)
    }

    pub async fn followed_artists(&self) -> Vec<Artist> {
        self.data.read().await.followed_artists.clone()
    }

    // Playlists

    pub async fn playlists(&self) -> Vec<Playlist> {
        self.data.read().await.playlists.clone()
    }

    pub async fn is_playlist_saved(&self, uuid: &str) -> bool {
        self.data
            .read()
            .await
            .playlists
            .iter()
            .any(|p| p.uuid == uuid)
    }

    pub async fn toggle_saved_playlist(&self, playlist: &Playlist) -> Result<bool> {
        let saved = {
            let mut data = self.data.write().await;
            if let Some(pos) = data.playlists.iter().position(|p| p.uuid == playlist.uuid) {
                data.playlists.remove(pos);
                false
            } else {
                data.playlists.insert(0, playlist.clone());
                true
            }
        };
        self.save().await?;
        Ok(saved)
    }

    /// Creates a local playlist containing the given tracks.
    pub async fn create_local_playlist(&self, title: &str, tracks: Vec<Track>) -> Result<Playlist> {
        let playlist = Playlist {
            uuid: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            image: String::new(),
            creator: "You".to_string(),
            is_local: true,
            tracks,
        };
        {
            let mut data = self.data.write().await;
            data.playlists.insert(0, playlist.clone());
        }
        self.save().await?;
        tracing::info!(title, uuid = %playlist.uuid, "Created local playlist");
        Ok(playlist)
    }

    /// Appends a track to a local playlist, skipping duplicates.
    pub async fn add_to_local_playlist(&self, uuid: &str, track: &Track) -> Result<()> {
        {
            let mut data = self.data.write().await;
            let playlist = data
                .playlists
                .iter_mut()
                .find(|p| p.uuid == uuid && p.is_local)
                .ok_or_else(|| anyhow::anyhow!("No local playlist with id {uuid}"))?;
            if !playlist.tracks.iter().any(|t| t.id == track.id) {
                playlist.tracks.push(track.clone());
            }
        }
        self.save().await?;
        Ok(())
    }

    pub async fn remove_from_local_playlist(&self, uuid: &str, track_id: &str) -> Result<()> {
        {
            let mut data = self.data.write().await;
            let playlist = data
                .playlists
                .iter_mut()
                .find(|p| p.uuid == uuid && p.is_local)
                .ok_or_else(|| anyhow::anyhow!("No local playlist with id {uuid}"))?;
            playlist.tracks.retain(|t| t.id != track_id);
        }
        self.save().await?;
        Ok(())
    }

    pub async fn delete_playlist(&self, uuid: &str) -> Result<()> {
        {
            let mut data = self.data.write().await;
            data.playlists.retain(|p| p.uuid != uuid);
        }
        self.save().await?;
        Ok(())
    }

    // Recently played

    /// Records an entry at the head of the recents list. An existing
    /// entry for the same entity moves to the head instead of
    /// duplicating, and the list is capped.
    pub async fn push_recent(&self, entry: RecentEntry) -> Result<()> {
        {
            let mut data = self.data.write().await;
            let key = entry.key();
            data.recently_played.retain(|e| e.key() != key);
            data.recently_played.insert(0, entry);
            data.recently_played.truncate(RECENTS_CAP);
        }
        self.save().await?;
        Ok(())
    }

    pub async fn recently_played(&self) -> Vec<RecentEntry> {
        self.data.read().await.recently_played.clone()
    }

    // Search history

    pub async fn push_search(&self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        {
            let mut data = self.data.write().await;
            data.search_history.retain(|q| q != query);
            data.search_history.insert(0, query.to_string());
            data.search_history.truncate(SEARCH_HISTORY_CAP);
        }
        self.save().await?;
        Ok(())
    }

    pub async fn search_history(&self) -> Vec<String> {
        self.data.read().await.search_history.clone()
    }

    // Settings

    pub async fn settings(&self) -> Settings {
        self.data.read().await.settings.clone()
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<()> {
        self.data.write().await.settings = settings;
        self.save().await?;
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::AudioQuality;

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
            duration_secs: 60,
            stream_url: None,
            quality: None,
        }
    }

    fn temp_storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at_path(dir.path().join("library.json"));
        (dir, storage)
    }

    #[tokio::test]
    async fn toggle_liked_roundtrip() {
        let (_dir, storage) = temp_storage();
        let t = track("1");

        assert!(storage.toggle_liked(&t).await.unwrap());
        assert!(storage.is_liked("1").await);
        assert!(!storage.toggle_liked(&t).await.unwrap());
        assert!(!storage.is_liked("1").await);
    }

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let storage = Storage::at_path(&path);
        storage.toggle_liked(&track("1")).await.unwrap();
        storage.push_search("boards of canada").await.unwrap();
        let mut settings = storage.settings().await;
        settings.quality = AudioQuality::HiRes;
        storage.update_settings(settings).await.unwrap();

        let reloaded = Storage::at_path(&path);
        reloaded.load().await.unwrap();
        assert!(reloaded.is_liked("1").await);
        assert_eq!(reloaded.search_history().await, vec!["boards of canada"]);
        assert_eq!(reloaded.settings().await.quality, AudioQuality::HiRes);
    }

    #[tokio::test]
    async fn toggle_saved_album_and_followed_artist() {
        let (_dir, storage) = temp_storage();
        let album = track("1").album;
        let artist = track("1").artist;

        assert!(storage.toggle_saved_album(&album).await.unwrap());
        assert!(storage.is_album_saved(&album.id).await);
        assert!(!storage.toggle_saved_album(&album).await.unwrap());
        assert!(!storage.is_album_saved(&album.id).await);

        assert!(storage.toggle_followed_artist(&artist).await.unwrap());
        assert!(storage.is_artist_followed(&artist.id).await);
        assert_eq!(storage.followed_artists().await.len(), 1);
    }

    #[tokio::test]
    async fn load_missing_file_starts_empty() {
        let (_dir, storage) = temp_storage();
        storage.load().await.unwrap();
        assert!(storage.liked_tracks().await.is_empty());
    }

    #[tokio::test]
    async fn recents_dedupe_and_cap() {
        let (_dir, storage) = temp_storage();
        for i in 0..(RECENTS_CAP + 5) {
            storage
                .push_recent(RecentEntry::Track {
                    track: track(&i.to_string()),
                    timestamp: i as i64,
                })
                .await
                .unwrap();
        }
        let recents = storage.recently_played().await;
        assert_eq!(recents.len(), RECENTS_CAP);
        // Most recent first.
        assert_eq!(recents[0].key(), format!("track:{}", RECENTS_CAP + 4));

        // Re-playing an entry moves it to the head without growing the list.
        storage
            .push_recent(RecentEntry::Track {
                track: track(&(RECENTS_CAP + 2).to_string()),
                timestamp: 999,
            })
            .await
            .unwrap();
        let recents = storage.recently_played().await;
        assert_eq!(recents.len(), RECENTS_CAP);
        assert_eq!(recents[0].key(), format!("track:{}", RECENTS_CAP + 2));
    }

    #[tokio::test]
    async fn search_history_dedupes_and_ignores_blank() {
        let (_dir, storage) = temp_storage();
        storage.push_search("autechre").await.unwrap();
        storage.push_search("plaid").await.unwrap();
        storage.push_search("autechre").await.unwrap();
        storage.push_search("   ").await.unwrap();
        assert_eq!(storage.search_history().await, vec!["autechre", "plaid"]);
    }

    #[tokio::test]
    async fn local_playlist_lifecycle() {
        let (_dir, storage) = temp_storage();
        let playlist = storage
            .create_local_playlist("Road trip", vec![track("1")])
            .await
            .unwrap();
        assert!(playlist.is_local);

        storage
            .add_to_local_playlist(&playlist.uuid, &track("2"))
            .await
            .unwrap();
        // Duplicate adds are ignored.
        storage
            .add_to_local_playlist(&playlist.uuid, &track("2"))
            .await
            .unwrap();
        let playlists = storage.playlists().await;
        assert_eq!(playlists[0].tracks.len(), 2);

        storage
            .remove_from_local_playlist(&playlist.uuid, "1")
            .await
            .unwrap();
        assert_eq!(storage.playlists().await[0].tracks.len(), 1);

        storage.delete_playlist(&playlist.uuid).await.unwrap();
        assert!(storage.playlists().await.is_empty());
    }

    #[tokio::test]
    async fn adding_to_remote_playlist_fails() {
        let (_dir, storage) = temp_storage();
        let remote = Playlist {
            uuid: "r1".to_string(),
            title: "Remote".to_string(),
            image: String::new(),
            creator: "someone".to_string(),
            is_local: false,
            tracks: Vec::new(),
        };
        storage.toggle_saved_playlist(&remote).await.unwrap();
        assert!(storage.is_playlist_saved("r1").await);
        assert!(
            storage
                .add_to_local_playlist("r1", &track("1"))
                .await
                .is_err()
        );
    }
}
