//! ZIP archive export of track audio.

use std::future::Future;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::sanitize_filename;
use crate::model::types::Track;

/// Tracks fetched concurrently per batch. Keeps memory bounded and the
/// API instances unhammered.
pub const ARCHIVE_CHUNK_SIZE: usize = 3;

/// Archive entry name for a track's audio.
pub fn archive_filename(track: &Track) -> String {
    sanitize_filename(&format!("{} - {}.flac", track.artist.name, track.title))
}

fn placeholder_filename(track: &Track) -> String {
    sanitize_filename(&format!("FAILED_{}.txt", track.title))
}

/// Builds a ZIP archive of the given tracks' audio.
///
/// Tracks are fetched through `fetch` in batches of
/// [`ARCHIVE_CHUNK_SIZE`], concurrently within a batch. A failed fetch
/// contributes a small text placeholder instead of aborting the whole
/// archive. `progress` is called with a percentage as each fetch
/// completes, in completion order.
pub async fn build_archive<F, Fut, P>(tracks: &[Track], fetch: F, progress: P) -> Result<Vec<u8>>
where
    F: Fn(Track) -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
    P: Fn(u8) + Sync,
{
    let total = tracks.len().max(1);
    let completed = AtomicUsize::new(0);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    // Audio is already compressed, deflating it again buys nothing.
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for chunk in tracks.chunks(ARCHIVE_CHUNK_SIZE) {
        let fetches = chunk.iter().map(|track| {
            let fut = fetch(track.clone());
            let completed = &completed;
            let progress = &progress;
            async move {
                let result = fut.await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                // Percent rounded to nearest, not floored.
                progress(((done * 100 + total / 2) / total) as u8);
                (track, result)
            }
        });

        for (track, result) in futures::future::join_all(fetches).await {
            match result {
                Ok(bytes) => {
                    zip.start_file(archive_filename(track), options)?;
                    zip.write_all(&bytes)?;
                }
                Err(e) => {
                    tracing::warn!(track_id = %track.id, error = %e, "Audio fetch failed, writing placeholder");
                    zip.start_file(placeholder_filename(track), options)?;
                    let note = format!(
                        "Could not download \"{} - {}\": {e}\n",
                        track.artist.name, track.title
                    );
                    zip.write_all(note.as_bytes())?;
                }
            }
        }
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Album, Artist};
    use std::io::Read;
    use zip::ZipArchive;

    fn track(id: &str, title: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: Artist {
                id: "a".to_string(),
                name: artist.to_string(),
                picture: None,
            },
            album: Album {
                id: "al".to_string(),
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

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
        let mut entry = archive.by_name(name).unwrap();
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn filenames_follow_artist_dash_title() {
        let t = track("1", "Flim", "Aphex Twin");
        assert_eq!(archive_filename(&t), "Aphex Twin - Flim.flac");

        let nasty = track("2", "What: Is/This?", "A*B");
        assert_eq!(archive_filename(&nasty), "AB - What IsThis.flac");
    }

    #[tokio::test]
    async fn archive_contains_all_fetched_tracks() {
        let tracks = vec![
            track("1", "One", "A"),
            track("2", "Two", "B"),
            track("3", "Three", "C"),
            track("4", "Four", "D"),
        ];
        let bytes = build_archive(
            &tracks,
            |t| async move { Ok(format!("audio-{}", t.id).into_bytes()) },
            |_| {},
        )
        .await
        .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 4);
        assert_eq!(read_entry(&mut archive, "A - One.flac"), b"audio-1");
        assert_eq!(read_entry(&mut archive, "D - Four.flac"), b"audio-4");
    }

    #[tokio::test]
    async fn failed_fetch_becomes_placeholder() {
        let tracks = vec![track("1", "One", "A"), track("2", "Two", "B")];
        let bytes = build_archive(
            &tracks,
            |t| async move {
                if t.id == "2" {
                    Err(anyhow::anyhow!("404"))
                } else {
                    Ok(b"ok".to_vec())
                }
            },
            |_| {},
        )
        .await
        .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let note = read_entry(&mut archive, "FAILED_Two.txt");
        let note = String::from_utf8(note).unwrap();
        assert!(note.contains("B - Two"));
        assert!(note.contains("404"));
    }

    #[tokio::test]
    async fn progress_reaches_hundred() {
        let tracks: Vec<Track> = (0..7)
            .map(|i| track(&i.to_string(), &format!("T{i}"), "A"))
            .collect();
        let seen = std::sync::Mutex::new(Vec::new());
        build_archive(
            &tracks,
            |_| async { Ok(b"x".to_vec()) },
            |pct| seen.lock().unwrap().push(pct),
        )
        .await
        .unwrap();

        // Percent only depends on the completion counter, so the
        // sequence is fixed regardless of fetch order. 2/7 rounds up.
        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![14, 29, 43, 57, 71, 86, 100]);
    }

    #[tokio::test]
    async fn empty_archive_is_valid() {
        let bytes = build_archive(&[], |_| async { Ok(Vec::new()) }, |_| {})
            .await
            .unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
