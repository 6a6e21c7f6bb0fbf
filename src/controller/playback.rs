//! Queue-driven playback control

use std::time::Duration;

use crate::audio::AudioCmd;
use crate::model::{NextStep, RecentEntry, Track};

use super::AppController;

/// How long a failed track lingers before the queue auto-advances.
const SKIP_AFTER_FAILURE: Duration = Duration::from_secs(2);

impl AppController {
    /// Plays `track` inside its context. The context always becomes
    /// the queue, even when the selected track is already current, in
    /// which case this only toggles pause instead of restarting it.
    pub async fn play_track(&self, track: Track, context: Vec<Track>) {
        let model = self.model.lock().await;
        model.replace_queue(context).await;
        if model.current_track_id().await.as_deref() == Some(track.id.as_str()) {
            drop(model);
            self.toggle_playback().await;
            return;
        }
        drop(model);
        self.start_track(track).await;
    }

    /// Resolves and starts a track. The fetch runs in the background so
    /// input stays responsive; an epoch guard discards the result if a
    /// newer play request lands first.
    pub async fn start_track(&self, track: Track) {
        let model = self.model.lock().await;
        let epoch = model.begin_play().await;
        let quality = model.get_settings().await.quality;
        model.set_loading(true).await;
        drop(model);

        tracing::info!(track_id = %track.id, title = %track.title, "Starting track");

        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.client.fetch_track_audio(&track.id, quality).await;

            let model = controller.model.lock().await;
            model.set_loading(false).await;
            match result {
                Ok(bytes) => {
                    if !model.apply_play(track.clone(), epoch).await {
                        return;
                    }
                    drop(model);
                    if let Err(e) = controller.audio.send(AudioCmd::Play(bytes)) {
                        tracing::error!(error = %e, "Audio thread unavailable");
                        return;
                    }
                    let entry = RecentEntry::Track {
                        track,
                        timestamp: chrono::Utc::now().timestamp(),
                    };
                    if let Err(e) = controller.storage.push_recent(entry).await {
                        tracing::warn!(error = %e, "Failed to record recent track");
                    }
                    controller.refresh_home().await;
                }
                Err(e) => {
                    tracing::error!(track_id = %track.id, error = %e, "Failed to start track");
                    if !model.apply_play(track.clone(), epoch).await {
                        return;
                    }
                    model.set_playing(false).await;
                    model
                        .set_error(format!("Could not play \"{}\", skipping...", track.title))
                        .await;
                    drop(model);

                    // Leave the error on screen briefly, then move on.
                    tokio::time::sleep(SKIP_AFTER_FAILURE).await;
                    let model = controller.model.lock().await;
                    let still_current = model.current_track_id().await.as_deref()
                        == Some(track.id.as_str());
                    drop(model);
                    if still_current {
                        controller.next_track().await;
                    }
                }
            }
        });
    }

    pub async fn toggle_playback(&self) {
        let model = self.model.lock().await;
        if model.current_track().await.is_some() {
            let playing = model.is_playing().await;
            model.set_playing(!playing).await;
            drop(model);
            if let Err(e) = self.audio.send(AudioCmd::TogglePause) {
                tracing::error!(error = %e, "Audio thread unavailable");
            }
            return;
        }
        // Nothing current: start the queue from the top.
        let first = model.queue_tracks().await.into_iter().next();
        drop(model);
        if let Some(track) = first {
            self.start_track(track).await;
        }
    }

    // Returns a boxed future to break the recursive async cycle
    // (start_track -> spawned task -> next_track -> start_track).
    pub fn next_track(&self) -> futures::future::BoxFuture<'_, ()> {
        Box::pin(async move {
            let step = self.model.lock().await.next_step().await;
            match step {
                NextStep::Restart => self.restart_current().await,
                NextStep::Play(track) => self.start_track(track).await,
                // End of the queue under repeat Off: the current track and
                // playing state stay exactly as they are.
                NextStep::Stop => {
                    tracing::debug!("End of queue, nothing to advance to");
                }
            }
        })
    }

    async fn restart_current(&self) {
        tracing::debug!("Repeat-one, restarting current track");
        self.model.lock().await.set_playing(true).await;
        if let Err(e) = self.audio.send(AudioCmd::Restart) {
            tracing::error!(error = %e, "Audio thread unavailable");
        }
    }

    pub async fn previous_track(&self) {
        let model = self.model.lock().await;
        let current = model.current_track_id().await;
        let prev = model.prev_track().await;
        drop(model);
        match prev {
            Some(track) if Some(track.id.as_str()) == current.as_deref() => {
                // Front of the queue replays the current track.
                self.model.lock().await.set_playing(true).await;
                if let Err(e) = self.audio.send(AudioCmd::Restart) {
                    tracing::error!(error = %e, "Audio thread unavailable");
                }
            }
            Some(track) => self.start_track(track).await,
            None => {}
        }
    }

    /// Called from the main loop when the audio thread reports the
    /// current track ran out.
    pub async fn handle_track_finished(&self) {
        tracing::debug!("Track finished, advancing queue");
        let step = self.model.lock().await.next_step().await;
        match step {
            NextStep::Restart => self.restart_current().await,
            NextStep::Play(track) => self.start_track(track).await,
            NextStep::Stop => {
                // The sink already drained; the track stays current so
                // play can resume from it.
                self.model.lock().await.set_playing(false).await;
            }
        }
    }

    pub async fn toggle_shuffle(&self) {
        let on = self.model.lock().await.toggle_shuffle().await;
        tracing::info!(shuffle = on, "Shuffle toggled");
    }

    pub async fn cycle_repeat(&self) {
        let mode = self.model.lock().await.cycle_repeat().await;
        tracing::info!(repeat = ?mode, "Repeat mode cycled");
    }

    pub async fn enqueue_track(&self, track: Track) {
        let model = self.model.lock().await;
        model.enqueue(track.clone()).await;
        drop(model);
        tracing::info!(track_id = %track.id, "Track added to queue");
    }

    pub async fn volume_up(&self) {
        self.adjust_volume(5).await;
    }

    pub async fn volume_down(&self) {
        self.adjust_volume(-5).await;
    }

    pub(crate) async fn adjust_volume(&self, delta: i16) {
        let model = self.model.lock().await;
        let mut settings = model.get_settings().await;
        settings.volume = (i16::from(settings.volume) + delta).clamp(0, 100) as u8;
        let volume = settings.volume;
        model.set_settings(settings.clone()).await;
        drop(model);

        let _ = self.audio.send(AudioCmd::SetVolume(volume));
        if let Err(e) = self.storage.update_settings(settings).await {
            tracing::warn!(error = %e, "Failed to persist volume");
        }
    }

    pub async fn cycle_quality(&self) {
        let model = self.model.lock().await;
        let mut settings = model.get_settings().await;
        settings.quality = settings.quality.cycle();
        model.set_settings(settings.clone()).await;
        drop(model);
        tracing::info!(quality = settings.quality.label(), "Stream quality changed");
        if let Err(e) = self.storage.update_settings(settings).await {
            tracing::warn!(error = %e, "Failed to persist quality");
        }
    }

    pub async fn cycle_accent(&self) {
        let model = self.model.lock().await;
        let mut settings = model.get_settings().await;
        settings.accent = settings.accent.cycle();
        model.set_settings(settings.clone()).await;
        drop(model);
        if let Err(e) = self.storage.update_settings(settings).await {
            tracing::warn!(error = %e, "Failed to persist accent color");
        }
    }

    pub async fn toggle_compact_tracklist(&self) {
        let model = self.model.lock().await;
        let mut settings = model.get_settings().await;
        settings.compact_tracklist = !settings.compact_tracklist;
        model.set_settings(settings.clone()).await;
        drop(model);
        if let Err(e) = self.storage.update_settings(settings).await {
            tracing::warn!(error = %e, "Failed to persist setting");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use crate::audio::AudioPlayer;
    use crate::model::{Album, AppModel, Artist, HifiClient, Track};
    use crate::storage::Storage;

    use super::AppController;

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

    fn controller(dir: &tempfile::TempDir) -> AppController {
        AppController::new(
            Arc::new(Mutex::new(AppModel::new())),
            HifiClient::new().unwrap(),
            Storage::at_path(dir.path().join("library.json")),
            Arc::new(AudioPlayer::new(50)),
        )
    }

    async fn play_directly(ctrl: &AppController, queue: Vec<Track>, current: Track) {
        let model = ctrl.model.lock().await;
        model.replace_queue(queue).await;
        let epoch = model.begin_play().await;
        assert!(model.apply_play(current, epoch).await);
    }

    #[tokio::test]
    async fn manual_next_at_queue_end_keeps_current_playing() {
        let dir = tempfile::tempdir().unwrap();
        let ctrl = controller(&dir);
        play_directly(
            &ctrl,
            vec![track("a"), track("b"), track("c")],
            track("c"),
        )
        .await;

        ctrl.next_track().await;
        let model = ctrl.model.lock().await;
        assert_eq!(model.current_track_id().await.as_deref(), Some("c"));
        assert!(model.is_playing().await);
        drop(model);

        // Pressing next again still has nowhere to go.
        ctrl.next_track().await;
        let model = ctrl.model.lock().await;
        assert_eq!(model.current_track_id().await.as_deref(), Some("c"));
        assert!(model.is_playing().await);
    }

    #[tokio::test]
    async fn drained_queue_pauses_but_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        let ctrl = controller(&dir);
        play_directly(&ctrl, vec![track("a"), track("b")], track("b")).await;

        ctrl.handle_track_finished().await;
        let model = ctrl.model.lock().await;
        assert_eq!(model.current_track_id().await.as_deref(), Some("b"));
        assert!(!model.is_playing().await);
    }

    #[tokio::test]
    async fn replaying_current_track_installs_the_new_context() {
        let dir = tempfile::tempdir().unwrap();
        let ctrl = controller(&dir);
        play_directly(&ctrl, vec![track("a")], track("a")).await;

        ctrl.play_track(track("a"), vec![track("a"), track("b")]).await;
        let model = ctrl.model.lock().await;
        let ids: Vec<String> = model
            .queue_tracks()
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, ["a", "b"]);
        // Same track: pause toggled instead of a restart.
        assert_eq!(model.current_track_id().await.as_deref(), Some("a"));
        assert!(!model.is_playing().await);
    }
}
