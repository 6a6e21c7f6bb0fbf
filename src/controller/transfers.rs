//! CSV/ZIP exports and single-track downloads

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use crate::export::{archive_filename, build_archive, export_csv, sanitize_filename};
use crate::model::{Entity, SelectedItem, Track, TransferKind, TransferState};

use super::AppController;

const EXPORT_DIR: &str = "exports";

type TransfersHandle = Arc<StdMutex<Vec<TransferState>>>;

fn publish(handle: &TransfersHandle, name: &str, kind: TransferKind, percent: u8) {
    if let Ok(mut transfers) = handle.lock() {
        if let Some(t) = transfers.iter_mut().find(|t| t.name == name) {
            t.percent = percent;
        } else {
            transfers.push(TransferState {
                name: name.to_string(),
                percent,
                kind,
            });
        }
    }
}

fn finish(handle: &TransfersHandle, name: &str) {
    if let Ok(mut transfers) = handle.lock() {
        transfers.retain(|t| t.name != name);
    }
}

impl AppController {
    /// Name of the current detail view, used for export filenames.
    async fn current_view_name(&self) -> String {
        let entity = self.model.lock().await.current_entity().await;
        let name = match entity {
            Some(Entity::Album(album)) => album.title,
            Some(Entity::Artist(artist)) => artist.name,
            Some(Entity::Playlist(playlist)) => playlist.title,
            None => "export".to_string(),
        };
        sanitize_filename(&name)
    }

    /// Exports the current view's tracks as a CSV manifest with
    /// resolved stream URLs.
    pub async fn export_current_view_csv(&self) {
        let model = self.model.lock().await;
        let tracks = model.current_track_list().await;
        let quality = model.get_settings().await.quality;
        let transfers = model.transfers_handle();
        drop(model);

        if tracks.is_empty() {
            self.model
                .lock()
                .await
                .set_error("Nothing to export here".to_string())
                .await;
            return;
        }

        let name = format!("{}.csv", self.current_view_name().await);
        tracing::info!(name, count = tracks.len(), "Starting CSV export");
        publish(&transfers, &name, TransferKind::Csv, 0);

        let controller = self.clone();
        tokio::spawn(async move {
            let client = controller.client.clone();
            let progress_name = name.clone();
            let progress_transfers = transfers.clone();
            let result = export_csv(
                &tracks,
                |track| {
                    let client = client.clone();
                    async move { client.stream_url(&track.id, quality).await }
                },
                |pct| publish(&progress_transfers, &progress_name, TransferKind::Csv, pct),
            )
            .await;

            finish(&transfers, &name);
            match result {
                Ok(csv) => {
                    if let Err(e) = write_export(&name, csv.as_bytes()) {
                        tracing::error!(error = %e, "Failed to write CSV export");
                        controller.report_export_error("Could not write CSV file").await;
                    } else {
                        tracing::info!(name, "CSV export complete");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "CSV export failed");
                    controller.report_export_error("CSV export failed").await;
                }
            }
        });
    }

    /// Exports the current view's tracks as a ZIP of audio files.
    pub async fn export_current_view_zip(&self) {
        let model = self.model.lock().await;
        let tracks = model.current_track_list().await;
        let quality = model.get_settings().await.quality;
        let transfers = model.transfers_handle();
        drop(model);

        if tracks.is_empty() {
            self.model
                .lock()
                .await
                .set_error("Nothing to export here".to_string())
                .await;
            return;
        }

        let name = format!("{}.zip", self.current_view_name().await);
        tracing::info!(name, count = tracks.len(), "Starting ZIP export");
        publish(&transfers, &name, TransferKind::Archive, 0);

        let controller = self.clone();
        tokio::spawn(async move {
            let client = controller.client.clone();
            let progress_name = name.clone();
            let progress_transfers = transfers.clone();
            let result = build_archive(
                &tracks,
                |track| {
                    let client = client.clone();
                    async move { client.fetch_track_audio(&track.id, quality).await }
                },
                |pct| {
                    publish(
                        &progress_transfers,
                        &progress_name,
                        TransferKind::Archive,
                        pct,
                    )
                },
            )
            .await;

            finish(&transfers, &name);
            match result {
                Ok(bytes) => {
                    if let Err(e) = write_export(&name, &bytes) {
                        tracing::error!(error = %e, "Failed to write ZIP export");
                        controller.report_export_error("Could not write ZIP file").await;
                    } else {
                        tracing::info!(name, "ZIP export complete");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "ZIP export failed");
                    controller.report_export_error("ZIP export failed").await;
                }
            }
        });
    }

    /// Downloads the selected track's audio to the export directory.
    pub async fn download_selected_track(&self) {
        let selected = self.model.lock().await.get_selected_content_item().await;
        let Some(SelectedItem::Track { track, .. }) = selected else {
            return;
        };
        self.download_track(track).await;
    }

    async fn download_track(&self, track: Track) {
        let model = self.model.lock().await;
        let quality = model.get_settings().await.quality;
        let transfers = model.transfers_handle();
        drop(model);

        let name = archive_filename(&track);
        tracing::info!(name, track_id = %track.id, "Starting track download");
        publish(&transfers, &name, TransferKind::SingleTrack, 0);

        let controller = self.clone();
        tokio::spawn(async move {
            let result = async {
                let url = controller.client.stream_url(&track.id, quality).await?;
                controller
                    .client
                    .download_with_progress(&url, |pct| {
                        publish(&transfers, &name, TransferKind::SingleTrack, pct)
                    })
                    .await
            }
            .await;

            finish(&transfers, &name);
            match result {
                Ok(bytes) => {
                    if let Err(e) = write_export(&name, &bytes) {
                        tracing::error!(error = %e, "Failed to write downloaded track");
                        controller.report_export_error("Could not write file").await;
                    } else {
                        tracing::info!(name, "Track download complete");
                    }
                }
                Err(e) => {
                    tracing::error!(track_id = %track.id, error = %e, "Track download failed");
                    controller
                        .report_export_error(&format!("Download failed: {}", track.title))
                        .await;
                }
            }
        });
    }

    async fn report_export_error(&self, message: &str) {
        self.model.lock().await.set_error(message.to_string()).await;
    }
}

fn write_export(name: &str, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = PathBuf::from(EXPORT_DIR);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    std::fs::write(dir.join(name), bytes)?;
    Ok(())
}
