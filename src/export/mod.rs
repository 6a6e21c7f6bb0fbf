//! Batch export of track lists: CSV manifests and ZIP archives of audio.

mod archive;
mod csv;

pub use archive::{ARCHIVE_CHUNK_SIZE, archive_filename, build_archive};
pub use csv::{CSV_HEADER, export_csv};

/// Strips characters that are unsafe in filenames on common platforms.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '?' | '<' | '>' | '\\' | ':' | '*' | '|' | '"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_reserved_chars() {
        assert_eq!(sanitize_filename(r#"AC/DC: "Best of" <*>?|"#), "ACDC Best of ");
        assert_eq!(sanitize_filename("plain name.flac"), "plain name.flac");
    }
}
