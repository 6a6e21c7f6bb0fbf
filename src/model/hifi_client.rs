//! HTTP client for the hifi API with multi-instance failover

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::types::{Album, Artist, AudioQuality, Playlist, SearchResults, Track};

/// Public API instances, tried in order. The client remembers the last
/// instance that answered and starts there on the next request.
pub const API_INSTANCES: &[&str] = &[
    "https://frankfurt.monochrome.tf",
    "https://triton.squid.wtf",
    "https://ohio.monochrome.tf",
    "https://virginia.monochrome.tf",
    "https://oregon.monochrome.tf",
    "https://singapore.monochrome.tf",
    "https://wolf.qqdl.site",
    "https://maus.qqdl.site",
    "https://vogel.qqdl.site",
    "https://katze.qqdl.site",
    "https://hund.qqdl.site",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hifi API client. Cheap to clone, all clones share the HTTP
/// connection pool and the current-instance cursor.
#[derive(Clone)]
pub struct HifiClient {
    http: reqwest::Client,
    instances: Arc<Vec<String>>,
    current: Arc<RwLock<usize>>,
}

// Wire types. The API wraps every payload in a `data` envelope.

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ApiArtist {
    id: u64,
    name: String,
    #[serde(default)]
    picture: Option<String>,
}

#[derive(Deserialize)]
struct ApiAlbum {
    id: String,
    title: String,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    artist: Option<ApiArtist>,
    #[serde(default)]
    release_date_original: Option<String>,
}

#[derive(Deserialize)]
struct ApiTrack {
    id: u64,
    title: String,
    duration: u64,
    performer: ApiArtist,
    album: ApiAlbum,
}

#[derive(Deserialize)]
struct ApiPlaylist {
    id: u64,
    name: String,
    #[serde(default)]
    image_rectangle: Vec<String>,
    #[serde(default)]
    owner: Option<ApiOwner>,
}

#[derive(Deserialize)]
struct ApiOwner {
    name: String,
}

#[derive(Deserialize)]
struct ApiItems<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct ApiSearch {
    #[serde(default)]
    tracks: Option<ApiItems<ApiTrack>>,
    #[serde(default)]
    albums: Option<ApiItems<ApiAlbum>>,
    #[serde(default)]
    artists: Option<ApiItems<ApiArtist>>,
    #[serde(default)]
    playlists: Option<ApiItems<ApiPlaylist>>,
}

#[derive(Deserialize)]
struct ApiAlbumDetail {
    #[serde(flatten)]
    album: ApiAlbum,
    tracks: ApiItems<ApiTrack>,
}

#[derive(Deserialize)]
struct ApiArtistDetail {
    #[serde(flatten)]
    artist: ApiArtist,
    #[serde(default)]
    top_tracks: Vec<ApiTrack>,
}

#[derive(Deserialize)]
struct ApiPlaylistDetail {
    #[serde(flatten)]
    playlist: ApiPlaylist,
    tracks: ApiItems<ApiTrack>,
}

#[derive(Deserialize)]
struct ApiStream {
    url: String,
}

impl From<ApiArtist> for Artist {
    fn from(a: ApiArtist) -> Self {
        Artist {
            id: a.id.to_string(),
            name: a.name,
            picture: a.picture,
        }
    }
}

impl From<ApiAlbum> for Album {
    fn from(a: ApiAlbum) -> Self {
        Album {
            id: a.id,
            title: a.title,
            cover: a.cover.unwrap_or_default(),
            artist: a.artist.map(Into::into),
            release_date: a.release_date_original,
        }
    }
}

impl From<ApiTrack> for Track {
    fn from(t: ApiTrack) -> Self {
        Track {
            id: t.id.to_string(),
            title: t.title,
            artist: t.performer.into(),
            album: t.album.into(),
            duration_secs: t.duration,
            stream_url: None,
            quality: None,
        }
    }
}

impl From<ApiPlaylist> for Playlist {
    fn from(p: ApiPlaylist) -> Self {
        Playlist {
            uuid: p.id.to_string(),
            title: p.name,
            image: p.image_rectangle.into_iter().next().unwrap_or_default(),
            creator: p.owner.map(|o| o.name).unwrap_or_default(),
            is_local: false,
            tracks: Vec::new(),
        }
    }
}

impl HifiClient {
    pub fn new() -> Result<Self> {
        Self::with_instances(API_INSTANCES.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_instances(instances: Vec<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            instances: Arc::new(instances),
            current: Arc::new(RwLock::new(0)),
        })
    }

    /// GETs `path` and decodes the `data` envelope, rotating through
    /// instances on failure. Every instance gets one attempt per call;
    /// the first one that answers becomes the new starting point.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let start = *self.current.read().await;
        let total = self.instances.len();
        let mut last_err = None;

        for offset in 0..total {
            let idx = (start + offset) % total;
            let url = format!("{}{}", self.instances[idx], path);
            match self.try_get_json::<T>(&url).await {
                Ok(value) => {
                    if idx != start {
                        tracing::info!(instance = %self.instances[idx], "Failed over to new API instance");
                        *self.current.write().await = idx;
                    }
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(instance = %self.instances[idx], error = %e, "API instance failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("no API instances configured")))
    }

    async fn try_get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {status}"));
        }
        let envelope: Envelope<T> = response.json().await.context("decoding API response")?;
        Ok(envelope.data)
    }

    /// Searches tracks, albums, artists and playlists in parallel.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        tracing::debug!(query, "API: search");
        let q = urlencode(query);

        let tracks_url = format!("/api/get-music?q={q}");
        let albums_url = format!("/api/get-album-list?q={q}");
        let artists_url = format!("/api/get-artist-list?q={q}");
        let playlists_url = format!("/api/get-playlist-list?q={q}");
        let (tracks, albums, artists, playlists) = futures::join!(
            self.get_json::<ApiSearch>(&tracks_url),
            self.get_json::<ApiSearch>(&albums_url),
            self.get_json::<ApiSearch>(&artists_url),
            self.get_json::<ApiSearch>(&playlists_url),
        );

        let mut results = SearchResults::default();
        if let Ok(s) = tracks {
            results.tracks = s
                .tracks
                .map(|t| t.items.into_iter().map(Into::into).collect())
                .unwrap_or_default();
        }
        if let Ok(s) = albums {
            results.albums = s
                .albums
                .map(|a| a.items.into_iter().map(Into::into).collect())
                .unwrap_or_default();
        }
        if let Ok(s) = artists {
            results.artists = s
                .artists
                .map(|a| a.items.into_iter().map(Into::into).collect())
                .unwrap_or_default();
        }
        if let Ok(s) = playlists {
            results.playlists = s
                .playlists
                .map(|p| p.items.into_iter().map(Into::into).collect())
                .unwrap_or_default();
        }

        if results.is_empty() {
            tracing::debug!(query, "Search returned no results");
        }
        Ok(results)
    }

    pub async fn album_tracks(&self, album_id: &str) -> Result<(Album, Vec<Track>)> {
        tracing::debug!(album_id, "API: get album");
        let detail: ApiAlbumDetail = self
            .get_json(&format!("/api/get-album?album_id={}", urlencode(album_id)))
            .await?;
        let album: Album = detail.album.into();
        // Tracks inside an album payload carry no album of their own.
        let tracks = detail
            .tracks
            .items
            .into_iter()
            .map(|t| {
                let mut track: Track = t.into();
                if track.album.title.is_empty() {
                    track.album = album.clone();
                }
                track
            })
            .collect();
        Ok((album, tracks))
    }

    pub async fn artist_detail(&self, artist_id: &str) -> Result<(Artist, Vec<Track>, Vec<Album>)> {
        tracing::debug!(artist_id, "API: get artist");
        let id = urlencode(artist_id);
        let detail_url = format!("/api/get-artist?artist_id={id}");
        let albums_url = format!("/api/get-artist-albums?artist_id={id}");
        let (detail, albums) = futures::join!(
            self.get_json::<ApiArtistDetail>(&detail_url),
            self.get_json::<ApiItems<ApiAlbum>>(&albums_url),
        );
        let detail = detail?;
        let albums = albums
            .map(|a| a.items.into_iter().map(Into::into).collect())
            .unwrap_or_default();
        let top_tracks = detail.top_tracks.into_iter().map(Into::into).collect();
        Ok((detail.artist.into(), top_tracks, albums))
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<(Playlist, Vec<Track>)> {
        tracing::debug!(playlist_id, "API: get playlist");
        let detail: ApiPlaylistDetail = self
            .get_json(&format!(
                "/api/get-playlist?playlist_id={}",
                urlencode(playlist_id)
            ))
            .await?;
        let tracks = detail.tracks.items.into_iter().map(Into::into).collect();
        Ok((detail.playlist.into(), tracks))
    }

    /// Resolves the streaming URL for a track at the given quality.
    pub async fn stream_url(&self, track_id: &str, quality: AudioQuality) -> Result<String> {
        tracing::debug!(track_id, quality = quality.as_param(), "API: get stream url");
        let stream: ApiStream = self
            .get_json(&format!(
                "/api/download-music?track_id={}&quality={}",
                urlencode(track_id),
                quality.as_param()
            ))
            .await?;
        Ok(stream.url)
    }

    /// Downloads a stream URL fully into memory.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {status}"));
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Downloads a stream URL, reporting progress as a 0..=100 percent
    /// whenever the server advertises a content length.
    pub async fn download_with_progress<F>(&self, url: &str, mut progress: F) -> Result<Vec<u8>>
    where
        F: FnMut(u8),
    {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {status}"));
        }
        let total = response.content_length();
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            if let Some(total) = total.filter(|t| *t > 0) {
                let pct = (body.len() as u64 * 100 / total).min(100) as u8;
                progress(pct);
            }
        }
        progress(100);
        Ok(body)
    }

    /// Resolves and downloads a track's audio in one go.
    pub async fn fetch_track_audio(&self, track_id: &str, quality: AudioQuality) -> Result<Vec<u8>> {
        let url = self.stream_url(track_id, quality).await?;
        self.download(&url).await
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push_str("%20"),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_passes_safe_chars() {
        assert_eq!(urlencode("abc-123_x.y~z"), "abc-123_x.y~z");
    }

    #[test]
    fn urlencode_escapes_spaces_and_symbols() {
        assert_eq!(urlencode("hello world"), "hello%20world");
        assert_eq!(urlencode("a&b=c"), "a%26b%3Dc");
        assert_eq!(urlencode("100%"), "100%25");
    }

    #[test]
    fn wire_track_maps_to_domain() {
        let json = r#"{
            "id": 52727002,
            "title": "Avril 14th",
            "duration": 122,
            "performer": {"id": 1, "name": "Aphex Twin"},
            "album": {"id": "abc", "title": "Drukqs", "cover": "http://img"}
        }"#;
        let api: ApiTrack = serde_json::from_str(json).unwrap();
        let track: Track = api.into();
        assert_eq!(track.id, "52727002");
        assert_eq!(track.artist.name, "Aphex Twin");
        assert_eq!(track.album.title, "Drukqs");
        assert_eq!(track.duration_secs, 122);
        assert!(track.stream_url.is_none());
    }

    #[test]
    fn envelope_unwraps_data() {
        let json = r#"{"data": {"url": "https://cdn.example/x.flac"}}"#;
        let env: Envelope<ApiStream> = serde_json::from_str(json).unwrap();
        assert_eq!(env.data.url, "https://cdn.example/x.flac");
    }
}
