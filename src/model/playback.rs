//! Playback state: the current track and the epoch guard that keeps
//! slow fetches from clobbering newer play requests.

use std::time::Duration;

use super::types::{RepeatMode, Track};

/// State of the currently playing (or paused) track.
#[derive(Clone, Debug, Default)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub is_playing: bool,
    epoch: u64,
}

impl PlaybackState {
    /// Marks the start of a new play request and returns its epoch.
    /// Any in-flight fetch holding an older epoch is now stale.
    pub fn begin_play(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Whether a fetch started at `epoch` is still the latest request.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn current_id(&self) -> Option<String> {
        self.current.as_ref().map(|t| t.id.clone())
    }
}

/// Everything the player bar needs for one render.
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub track: Option<Track>,
    pub position: Duration,
    pub is_playing: bool,
    pub shuffling: bool,
    pub repeat: RepeatMode,
    pub volume: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_play_invalidates_older_epoch() {
        let mut state = PlaybackState::default();
        let first = state.begin_play();
        assert!(state.is_current(first));

        let second = state.begin_play();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }
}
