//! Play queue state machine: ordering, shuffle and repeat semantics.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::types::{RepeatMode, Track};

/// What playback should do after the current track ends or is skipped.
#[derive(Clone, Debug, PartialEq)]
pub enum NextStep {
    /// Restart the current track from the beginning (repeat-one).
    Restart,
    /// Start this track.
    Play(Track),
    /// End of queue, stop playback.
    Stop,
}

/// The play queue together with its pre-shuffle backup.
///
/// `tracks` is the order playback actually follows. While shuffling,
/// `original` preserves the order the queue had before shuffle was
/// engaged so it can be restored exactly when shuffle is turned off.
#[derive(Clone, Debug, Default)]
pub struct PlayQueue {
    tracks: Vec<Track>,
    original: Vec<Track>,
    shuffling: bool,
    repeat: RepeatMode,
}

impl PlayQueue {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn shuffling(&self) -> bool {
        self.shuffling
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Replaces the whole queue with a new play context. Any active
    /// shuffle is discarded, the new context becomes both the live
    /// order and the backup order.
    pub fn replace(&mut self, context: Vec<Track>) {
        self.original = context.clone();
        self.tracks = context;
        self.shuffling = false;
    }

    /// Appends a track to the end of the queue. While shuffling the
    /// backup order is left untouched, so turning shuffle off restores
    /// the context exactly as it was before shuffle was engaged.
    pub fn enqueue(&mut self, track: Track) {
        if !self.shuffling {
            self.original.push(track.clone());
        }
        self.tracks.push(track);
    }

    /// Decides what follows `current` in the queue.
    ///
    /// Without a current track (or with an empty queue) nothing
    /// happens. Repeat-one always restarts in place. A current track
    /// that is no longer in the queue advances to the first track. At
    /// the end of the queue, repeat-all wraps to the front and
    /// otherwise playback stops.
    pub fn next_after(&self, current: Option<&str>) -> NextStep {
        let Some(id) = current else {
            return NextStep::Stop;
        };
        if self.tracks.is_empty() {
            return NextStep::Stop;
        }
        if self.repeat == RepeatMode::One {
            return NextStep::Restart;
        }
        let next = match self.tracks.iter().position(|t| t.id == id) {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            Some(_) => {
                if self.repeat == RepeatMode::All {
                    0
                } else {
                    return NextStep::Stop;
                }
            }
            // The current track left the queue, fall back to the front.
            None => 0,
        };
        NextStep::Play(self.tracks[next].clone())
    }

    /// The track preceding `current`. At the front of the queue (or
    /// when the current track went missing from it) the first track
    /// replays. Without a current track there is nothing to step back
    /// from.
    pub fn prev_before(&self, current: Option<&str>) -> Option<Track> {
        let id = current?;
        if self.tracks.is_empty() {
            return None;
        }
        let idx = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .unwrap_or(0);
        let prev = idx.saturating_sub(1);
        Some(self.tracks[prev].clone())
    }

    /// Engages or disengages shuffle.
    ///
    /// Turning shuffle on backs up the current order, then shuffles the
    /// remaining tracks behind the currently playing one, which is
    /// pinned to the front. Turning it off restores the backup.
    pub fn set_shuffle<R: Rng>(&mut self, on: bool, current: Option<&str>, rng: &mut R) {
        if on == self.shuffling {
            return;
        }
        if on {
            self.original = self.tracks.clone();
            let mut rest: Vec<Track> = match current {
                Some(id) => self.tracks.iter().filter(|t| t.id != id).cloned().collect(),
                None => self.tracks.clone(),
            };
            rest.shuffle(rng);
            let mut shuffled = Vec::with_capacity(self.tracks.len());
            if let Some(id) = current {
                if let Some(cur) = self.tracks.iter().find(|t| t.id == id) {
                    shuffled.push(cur.clone());
                }
            }
            shuffled.extend(rest);
            self.tracks = shuffled;
        } else {
            self.tracks = self.original.clone();
        }
        self.shuffling = on;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Album, Artist};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

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
            duration_secs: 180,
            stream_url: None,
            quality: None,
        }
    }

    fn queue_of(ids: &[&str]) -> PlayQueue {
        let mut q = PlayQueue::default();
        q.replace(ids.iter().map(|id| track(id)).collect());
        q
    }

    fn ids(q: &PlayQueue) -> Vec<&str> {
        q.tracks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn replace_resets_shuffle() {
        let mut q = queue_of(&["1", "2", "3"]);
        let mut rng = StdRng::seed_from_u64(7);
        q.set_shuffle(true, Some("2"), &mut rng);
        assert!(q.shuffling());

        q.replace(vec![track("4"), track("5")]);
        assert!(!q.shuffling());
        assert_eq!(ids(&q), vec!["4", "5"]);
    }

    #[test]
    fn next_advances_in_order() {
        let q = queue_of(&["1", "2", "3"]);
        match q.next_after(Some("1")) {
            NextStep::Play(t) => assert_eq!(t.id, "2"),
            other => panic!("expected Play, got {other:?}"),
        }
    }

    #[test]
    fn next_at_end_stops_without_repeat() {
        let q = queue_of(&["1", "2", "3"]);
        assert_eq!(q.next_after(Some("3")), NextStep::Stop);
    }

    #[test]
    fn next_at_end_wraps_with_repeat_all() {
        let mut q = queue_of(&["1", "2", "3"]);
        q.cycle_repeat(); // All
        match q.next_after(Some("3")) {
            NextStep::Play(t) => assert_eq!(t.id, "1"),
            other => panic!("expected Play, got {other:?}"),
        }
    }

    #[test]
    fn repeat_one_restarts_in_place() {
        let mut q = queue_of(&["1", "2", "3"]);
        q.cycle_repeat();
        q.cycle_repeat(); // One
        assert_eq!(q.next_after(Some("2")), NextStep::Restart);
    }

    #[test]
    fn next_with_unknown_current_plays_first() {
        let q = queue_of(&["1", "2", "3"]);
        match q.next_after(Some("gone")) {
            NextStep::Play(t) => assert_eq!(t.id, "1"),
            other => panic!("expected Play, got {other:?}"),
        }
    }

    #[test]
    fn next_on_empty_queue_stops() {
        let q = PlayQueue::default();
        assert_eq!(q.next_after(Some("1")), NextStep::Stop);
    }

    #[test]
    fn next_without_current_does_nothing() {
        let q = queue_of(&["1", "2", "3"]);
        assert_eq!(q.next_after(None), NextStep::Stop);
    }

    #[test]
    fn prev_steps_back() {
        let q = queue_of(&["1", "2", "3"]);
        assert_eq!(q.prev_before(Some("3")).unwrap().id, "2");
    }

    #[test]
    fn prev_at_front_replays_first() {
        let q = queue_of(&["1", "2", "3"]);
        assert_eq!(q.prev_before(Some("1")).unwrap().id, "1");
        assert_eq!(q.prev_before(Some("gone")).unwrap().id, "1");
    }

    #[test]
    fn prev_without_current_does_nothing() {
        let q = queue_of(&["1", "2", "3"]);
        assert!(q.prev_before(None).is_none());
        assert!(PlayQueue::default().prev_before(Some("1")).is_none());
    }

    #[test]
    fn shuffle_pins_current_and_keeps_members() {
        let mut q = queue_of(&["1", "2", "3", "4", "5"]);
        let mut rng = StdRng::seed_from_u64(42);
        q.set_shuffle(true, Some("3"), &mut rng);

        assert_eq!(q.tracks()[0].id, "3");
        let mut sorted = ids(&q);
        sorted.sort();
        assert_eq!(sorted, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn unshuffle_restores_original_order() {
        let mut q = queue_of(&["1", "2", "3", "4", "5"]);
        let mut rng = StdRng::seed_from_u64(42);
        q.set_shuffle(true, Some("2"), &mut rng);
        q.set_shuffle(false, Some("2"), &mut rng);
        assert_eq!(ids(&q), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn enqueue_while_shuffling_spares_backup() {
        let mut q = queue_of(&["1", "2", "3"]);
        let mut rng = StdRng::seed_from_u64(9);
        q.set_shuffle(true, Some("1"), &mut rng);
        q.enqueue(track("4"));
        assert_eq!(q.len(), 4);

        q.set_shuffle(false, Some("1"), &mut rng);
        // The backup never saw "4".
        assert_eq!(ids(&q), vec!["1", "2", "3"]);
    }

    #[test]
    fn enqueue_without_shuffle_extends_both_orders() {
        let mut q = queue_of(&["1", "2"]);
        q.enqueue(track("3"));
        assert_eq!(ids(&q), vec!["1", "2", "3"]);

        let mut rng = StdRng::seed_from_u64(1);
        q.set_shuffle(true, None, &mut rng);
        q.set_shuffle(false, None, &mut rng);
        assert_eq!(ids(&q), vec!["1", "2", "3"]);
    }

    #[test]
    fn repeat_cycles_off_all_one() {
        let mut q = PlayQueue::default();
        assert_eq!(q.repeat(), RepeatMode::Off);
        assert_eq!(q.cycle_repeat(), RepeatMode::All);
        assert_eq!(q.cycle_repeat(), RepeatMode::One);
        assert_eq!(q.cycle_repeat(), RepeatMode::Off);
    }
}
