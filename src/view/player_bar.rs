//! Playback gauge rendering

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{PlaybackInfo, RepeatMode, Settings};
use super::utils::{accent_color, format_duration};

pub fn render_player_bar(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackInfo,
    settings: &Settings,
) {
    let status_text = match &playback.track {
        None => " No track playing".to_string(),
        Some(track) => {
            let icon = if playback.is_playing { "▶" } else { "⏸" };
            format!(
                " {} {} | {} ({})",
                icon, track.title, track.artist.name, track.album.title
            )
        }
    };

    let shuffle_text = if playback.shuffling { "Shuffle: On" } else { "Shuffle: Off" };
    let repeat_text = match playback.repeat {
        RepeatMode::Off => "Repeat: Off",
        RepeatMode::All => "Repeat: All",
        RepeatMode::One => "Repeat: One",
    };
    let volume_text = format!("Vol: {}%", playback.volume);
    let quality_text = settings.quality.label();

    let position_secs = playback.position.as_secs();
    let duration_secs = playback.track.as_ref().map_or(0, |t| t.duration_secs);

    let time_str = format!(
        "{} / {}",
        format_duration(position_secs),
        format_duration(duration_secs)
    );

    let progress_ratio = if duration_secs > 0 {
        (position_secs as f64 / duration_secs as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let title = format!("{} ", status_text);
    let controls_info = format!(
        " {} | {} | {} | {} ",
        shuffle_text, repeat_text, volume_text, quality_text
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(accent_color(settings.accent)))
        .ratio(progress_ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}
