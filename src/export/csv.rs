//! CSV manifest export.

use std::future::Future;

use anyhow::Result;

use crate::model::types::Track;

pub const CSV_HEADER: &str = "Title,Artist,Album,Duration (s),Stream URL";

/// Builds a CSV manifest of the given tracks, resolving each stream
/// URL sequentially through `resolve`. A failed resolution records the
/// literal `ERROR` in the URL column instead of aborting the export.
/// `progress` receives a percentage after every row.
pub async fn export_csv<F, Fut, P>(tracks: &[Track], resolve: F, progress: P) -> Result<String>
where
    F: Fn(Track) -> Fut,
    Fut: Future<Output = Result<String>>,
    P: Fn(u8),
{
    let total = tracks.len().max(1);
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for (i, track) in tracks.iter().enumerate() {
        let url = match resolve(track.clone()).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(track_id = %track.id, error = %e, "Stream URL resolution failed");
                "ERROR".to_string()
            }
        };
        out.push_str(&format_row(track, &url));
        out.push('\n');
        // Percent rounded to nearest, not floored.
        progress((((i + 1) * 100 + total / 2) / total) as u8);
    }

    Ok(out)
}

/// One CSV row. Text columns are always quoted, the duration is a bare
/// number.
fn format_row(track: &Track, url: &str) -> String {
    format!(
        "{},{},{},{},{}",
        quote(&track.title),
        quote(&track.artist.name),
        quote(&track.album.title),
        track.duration_secs,
        quote(url),
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Album, Artist};

    fn track(title: &str, artist: &str, album: &str, secs: u64) -> Track {
        Track {
            id: title.to_string(),
            title: title.to_string(),
            artist: Artist {
                id: "a".to_string(),
                name: artist.to_string(),
                picture: None,
            },
            album: Album {
                id: "al".to_string(),
                title: album.to_string(),
                cover: String::new(),
                artist: None,
                release_date: None,
            },
            duration_secs: secs,
            stream_url: None,
            quality: None,
        }
    }

    #[test]
    fn row_quotes_text_and_leaves_duration_bare() {
        let t = track("Windowlicker", "Aphex Twin", "Windowlicker", 361);
        assert_eq!(
            format_row(&t, "https://cdn/x.flac"),
            r#""Windowlicker","Aphex Twin","Windowlicker",361,"https://cdn/x.flac""#
        );
    }

    #[test]
    fn row_doubles_embedded_quotes() {
        let t = track(r#"The "Best" Song"#, "Someone", "An Album", 10);
        assert_eq!(
            format_row(&t, "u"),
            r#""The ""Best"" Song","Someone","An Album",10,"u""#
        );
    }

    #[tokio::test]
    async fn export_resolves_sequentially_and_reports_progress() {
        let tracks = vec![
            track("One", "A", "X", 1),
            track("Two", "B", "Y", 2),
        ];
        let seen = std::sync::Mutex::new(Vec::new());
        let csv = export_csv(
            &tracks,
            |t| async move { Ok(format!("https://cdn/{}.flac", t.id)) },
            |pct| seen.lock().unwrap().push(pct),
        )
        .await
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], r#""One","A","X",1,"https://cdn/One.flac""#);
        assert_eq!(lines[2], r#""Two","B","Y",2,"https://cdn/Two.flac""#);
        assert_eq!(*seen.lock().unwrap(), vec![50, 100]);
    }

    #[tokio::test]
    async fn failed_resolution_writes_error_and_continues() {
        let tracks = vec![track("One", "A", "X", 1), track("Two", "B", "Y", 2)];
        let csv = export_csv(
            &tracks,
            |t| async move {
                if t.id == "One" {
                    Err(anyhow::anyhow!("boom"))
                } else {
                    Ok("https://cdn/ok".to_string())
                }
            },
            |_| {},
        )
        .await
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], r#""One","A","X",1,"ERROR""#);
        assert_eq!(lines[2], r#""Two","B","Y",2,"https://cdn/ok""#);
    }

    #[tokio::test]
    async fn progress_rounds_to_nearest() {
        let tracks = vec![
            track("One", "A", "X", 1),
            track("Two", "B", "Y", 2),
            track("Three", "C", "Z", 3),
        ];
        let seen = std::sync::Mutex::new(Vec::new());
        export_csv(
            &tracks,
            |_| async { Ok("u".to_string()) },
            |pct| seen.lock().unwrap().push(pct),
        )
        .await
        .unwrap();

        // 2/3 rounds up to 67, not down to 66.
        assert_eq!(*seen.lock().unwrap(), vec![33, 67, 100]);
    }

    #[tokio::test]
    async fn empty_export_is_header_only() {
        let csv = export_csv(&[], |_| async { Ok(String::new()) }, |_| {})
            .await
            .unwrap();
        assert_eq!(csv, format!("{CSV_HEADER}\n"));
    }
}
