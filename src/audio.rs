//! Audio output thread.
//!
//! Decoding and playback run on a dedicated OS thread because the
//! underlying output stream is not `Send`. The rest of the app talks to
//! it through a command channel and reads progress back through a
//! shared status handle.

use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use rodio::{Decoder, OutputStreamBuilder, Sink};

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing fully downloaded audio bytes.
    Play(Vec<u8>),
    TogglePause,
    /// Restart the current audio from the beginning (repeat-one).
    Restart,
    /// Volume as 0..=100.
    SetVolume(u8),
    Quit,
}

#[derive(Clone, Debug, Default)]
pub struct AudioStatus {
    pub playing: bool,
    pub position: Duration,
    /// Set once when the current audio runs out, cleared on read.
    pub finished: bool,
}

pub type StatusHandle = Arc<Mutex<AudioStatus>>;

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    status: StatusHandle,
}

impl AudioPlayer {
    pub fn new(initial_volume: u8) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let status: StatusHandle = Arc::new(Mutex::new(AudioStatus::default()));

        let status_for_thread = status.clone();
        thread::spawn(move || {
            let stream = match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!(error = %e, "No audio output device");
                    return;
                }
            };
            // rodio logs to stderr when the stream drops, which tears up
            // the alternate screen.
            let mut stream = stream;
            stream.log_on_drop(false);

            let mut sink: Option<Sink> = None;
            // Kept so Restart can replay without refetching.
            let mut current: Option<Vec<u8>> = None;
            let mut volume = volume_gain(initial_volume);

            fn start(
                bytes: &[u8],
                stream: &rodio::OutputStream,
                volume: f32,
            ) -> Result<Sink> {
                let source = Decoder::new(Cursor::new(bytes.to_vec()))?;
                let sink = Sink::connect_new(stream.mixer());
                sink.set_volume(volume);
                sink.append(source);
                sink.play();
                Ok(sink)
            }

            loop {
                match rx.recv_timeout(Duration::from_millis(200)) {
                    Ok(AudioCmd::Play(bytes)) => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        match start(&bytes, &stream, volume) {
                            Ok(s) => {
                                sink = Some(s);
                                current = Some(bytes);
                                if let Ok(mut st) = status_for_thread.lock() {
                                    st.playing = true;
                                    st.position = Duration::ZERO;
                                    st.finished = false;
                                }
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to decode audio");
                                current = None;
                                if let Ok(mut st) = status_for_thread.lock() {
                                    st.playing = false;
                                    st.finished = true;
                                }
                            }
                        }
                    }
                    Ok(AudioCmd::TogglePause) => {
                        if let Some(ref s) = sink {
                            if s.is_paused() {
                                s.play();
                            } else {
                                s.pause();
                            }
                            if let Ok(mut st) = status_for_thread.lock() {
                                st.playing = !s.is_paused();
                            }
                        }
                    }
                    Ok(AudioCmd::Restart) => {
                        if let Some(ref bytes) = current {
                            if let Some(s) = sink.take() {
                                s.stop();
                            }
                            match start(bytes, &stream, volume) {
                                Ok(s) => {
                                    sink = Some(s);
                                    if let Ok(mut st) = status_for_thread.lock() {
                                        st.playing = true;
                                        st.position = Duration::ZERO;
                                        st.finished = false;
                                    }
                                }
                                Err(e) => {
                                    tracing::error!(error = %e, "Failed to restart audio");
                                }
                            }
                        }
                    }
                    Ok(AudioCmd::SetVolume(v)) => {
                        volume = volume_gain(v);
                        if let Some(ref s) = sink {
                            s.set_volume(volume);
                        }
                    }
                    Ok(AudioCmd::Quit) => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(ref s) = sink {
                            if let Ok(mut st) = status_for_thread.lock() {
                                st.position = s.get_pos();
                                if !s.is_paused() && s.empty() {
                                    st.playing = false;
                                    st.finished = true;
                                }
                            }
                            if s.empty() {
                                sink = None;
                            }
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self { tx, status }
    }

    /// Reads and clears the track-finished flag.
    pub fn take_finished(&self) -> bool {
        if let Ok(mut st) = self.status.lock() {
            if st.finished {
                st.finished = false;
                return true;
            }
        }
        false
    }

    pub fn position(&self) -> Duration {
        self.status.lock().map(|st| st.position).unwrap_or_default()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<()> {
        self.tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("audio thread is gone"))
    }
}

/// Perceptual volume curve: 0..=100 mapped quadratically to gain.
fn volume_gain(volume: u8) -> f32 {
    let v = f32::from(volume.min(100)) / 100.0;
    v * v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_curve_endpoints() {
        assert_eq!(volume_gain(0), 0.0);
        assert_eq!(volume_gain(100), 1.0);
        assert_eq!(volume_gain(200), 1.0);
    }

    #[test]
    fn volume_curve_is_quadratic() {
        assert!((volume_gain(50) - 0.25).abs() < f32::EPSILON);
    }
}
