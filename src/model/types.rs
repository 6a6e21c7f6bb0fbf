//! Core type definitions for the application

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// An artist as returned by the hifi API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// An album as returned by the hifi API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// A playlist. Remote playlists carry no embedded tracks; locally created ones do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<Track>,
}

/// A playable track. Immutable once fetched, except for the resolved stream URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: Artist,
    pub album: Album,
    pub duration_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<AudioQuality>,
}

/// Stream quality tier, passed through to the API when resolving stream URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioQuality {
    Low,
    High,
    #[default]
    Lossless,
    HiRes,
}

impl AudioQuality {
    /// The value the API expects as its `quality` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            AudioQuality::Low => "LOW",
            AudioQuality::High => "HIGH",
            AudioQuality::Lossless => "LOSSLESS",
            AudioQuality::HiRes => "HI_RES",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            AudioQuality::Low => AudioQuality::High,
            AudioQuality::High => AudioQuality::Lossless,
            AudioQuality::Lossless => AudioQuality::HiRes,
            AudioQuality::HiRes => AudioQuality::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AudioQuality::Low => "Low",
            AudioQuality::High => "High",
            AudioQuality::Lossless => "Lossless",
            AudioQuality::HiRes => "Hi-Res",
        }
    }
}

/// Repeat mode state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Combined results of a search across all entity kinds.
#[derive(Clone, Debug, Default)]
pub struct SearchResults {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub playlists: Vec<Playlist>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
            && self.albums.is_empty()
            && self.artists.is_empty()
            && self.playlists.is_empty()
    }
}

/// Category filter for search results, stored in the navigation history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Tracks,
    Albums,
    Artists,
    Playlists,
}

impl CategoryFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Tracks,
            Self::Tracks => Self::Albums,
            Self::Albums => Self::Artists,
            Self::Artists => Self::Playlists,
            Self::Playlists => Self::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::All => Self::Playlists,
            Self::Tracks => Self::All,
            Self::Albums => Self::Tracks,
            Self::Artists => Self::Albums,
            Self::Playlists => Self::Artists,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Tracks => "Tracks",
            Self::Albums => "Albums",
            Self::Artists => "Artists",
            Self::Playlists => "Playlists",
        }
    }
}

/// Tab selection on the Library screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LibraryTab {
    #[default]
    Playlists,
    Liked,
    Albums,
    Artists,
}

impl LibraryTab {
    pub fn next(self) -> Self {
        match self {
            Self::Playlists => Self::Liked,
            Self::Liked => Self::Albums,
            Self::Albums => Self::Artists,
            Self::Artists => Self::Playlists,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Playlists => Self::Artists,
            Self::Liked => Self::Playlists,
            Self::Albums => Self::Liked,
            Self::Artists => Self::Albums,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Playlists => "Playlists",
            Self::Liked => "Liked Songs",
            Self::Albums => "Albums",
            Self::Artists => "Artists",
        }
    }
}

/// Which section within artist detail is selected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArtistSection {
    #[default]
    TopTracks,
    Albums,
}

impl ArtistSection {
    pub fn toggle(self) -> Self {
        match self {
            Self::TopTracks => Self::Albums,
            Self::Albums => Self::TopTracks,
        }
    }
}

/// An entry of the recently-played list, tagged by entity kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RecentEntry {
    Track { track: Track, timestamp: i64 },
    Album { album: Album, timestamp: i64 },
    Artist { artist: Artist, timestamp: i64 },
    Playlist { playlist: Playlist, timestamp: i64 },
}

impl RecentEntry {
    /// Deduplication key: entity kind plus id.
    pub fn key(&self) -> String {
        match self {
            RecentEntry::Track { track, .. } => format!("track:{}", track.id),
            RecentEntry::Album { album, .. } => format!("album:{}", album.id),
            RecentEntry::Artist { artist, .. } => format!("artist:{}", artist.id),
            RecentEntry::Playlist { playlist, .. } => format!("playlist:{}", playlist.uuid),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RecentEntry::Track { track, .. } => &track.title,
            RecentEntry::Album { album, .. } => &album.title,
            RecentEntry::Artist { artist, .. } => &artist.name,
            RecentEntry::Playlist { playlist, .. } => &playlist.title,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            RecentEntry::Track { .. } => "Track",
            RecentEntry::Album { .. } => "Album",
            RecentEntry::Artist { .. } => "Artist",
            RecentEntry::Playlist { .. } => "Playlist",
        }
    }
}

/// Highlight color for the focused section and selected rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccentColor {
    #[default]
    Green,
    Cyan,
    Magenta,
    Yellow,
    Blue,
}

impl AccentColor {
    pub fn cycle(&self) -> Self {
        match self {
            AccentColor::Green => AccentColor::Cyan,
            AccentColor::Cyan => AccentColor::Magenta,
            AccentColor::Magenta => AccentColor::Yellow,
            AccentColor::Yellow => AccentColor::Blue,
            AccentColor::Blue => AccentColor::Green,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccentColor::Green => "Green",
            AccentColor::Cyan => "Cyan",
            AccentColor::Magenta => "Magenta",
            AccentColor::Yellow => "Yellow",
            AccentColor::Blue => "Blue",
        }
    }
}

/// Flat settings bag, persisted with the library.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub quality: AudioQuality,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub compact_tracklist: bool,
    #[serde(default)]
    pub accent: AccentColor,
}

impl Settings {
    /// Rows on the settings screen: quality, volume, compact
    /// tracklist, accent color.
    pub const ROW_COUNT: usize = 4;
}

fn default_volume() -> u8 {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: AudioQuality::default(),
            volume: default_volume(),
            compact_tracklist: false,
            accent: AccentColor::default(),
        }
    }
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Sidebar,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Sidebar,
            ActiveSection::Sidebar => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Sidebar => ActiveSection::Search,
            ActiveSection::MainContent => ActiveSection::Sidebar,
        }
    }
}

/// An item in the sidebar shortcuts list.
#[derive(Clone, Debug)]
pub struct SidebarItem {
    pub name: String,
}

/// A running export or download, shown in the status overlay.
#[derive(Clone, Debug)]
pub struct TransferState {
    pub name: String,
    pub percent: u8,
    pub kind: TransferKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    Csv,
    Archive,
    SingleTrack,
}

impl TransferKind {
    pub fn label(self) -> &'static str {
        match self {
            TransferKind::Csv => "CSV export",
            TransferKind::Archive => "ZIP export",
            TransferKind::SingleTrack => "Download",
        }
    }
}

/// Represents a selected item for action handling
#[derive(Clone, Debug)]
pub enum SelectedItem {
    /// A track together with the list it was selected from (its play context).
    Track { track: Track, context: Vec<Track> },
    Album(Album),
    Artist(Artist),
    Playlist(Playlist),
    Recent(RecentEntry),
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_input: String,
    pub sidebar_items: Vec<SidebarItem>,
    pub sidebar_selected: usize,
    pub content_selected: usize,
    pub search_filter: CategoryFilter,
    pub library_tab: LibraryTab,
    pub artist_section: ArtistSection,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub show_playlist_picker: bool,
    pub playlist_picker_selected: usize,
    pub new_playlist_input: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_input: String::new(),
            sidebar_items: vec![
                SidebarItem { name: "Home".to_string() },
                SidebarItem { name: "Library".to_string() },
                SidebarItem { name: "Liked songs".to_string() },
                SidebarItem { name: "Settings".to_string() },
            ],
            sidebar_selected: 0,
            content_selected: 0,
            search_filter: CategoryFilter::All,
            library_tab: LibraryTab::default(),
            artist_section: ArtistSection::default(),
            is_loading: false,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
            show_playlist_picker: false,
            playlist_picker_selected: 0,
            new_playlist_input: None,
        }
    }
}
