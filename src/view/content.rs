//! Main content area rendering (home, search results, library, detail views)

use std::collections::HashSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ActiveSection, Album, Artist, ArtistSection, CategoryFilter, Entity, LibraryTab, Playlist,
    RecentEntry, Screen, Track,
};
use super::utils::{
    accent_color, calculate_num_width, format_duration, render_scrollable_list, truncate_string,
};
use super::ViewState;

pub fn render_main_content(frame: &mut Frame, area: Rect, state: &ViewState) {
    let is_focused = state.ui.active_section == ActiveSection::MainContent;
    let accent = accent_color(state.settings.accent);
    let border_style = if is_focused {
        Style::default().fg(accent)
    } else {
        Style::default()
    };

    if state.ui.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Content ")
                    .border_style(border_style),
            );
        frame.render_widget(loading, area);
        return;
    }

    let liked_ids: HashSet<&str> = state.library.liked.iter().map(|t| t.id.as_str()).collect();
    let playing_id = state.playback.track.as_ref().map(|t| t.id.as_str());
    let ctx = RenderCtx {
        selected: state.ui.content_selected,
        is_focused,
        playing_id,
        liked_ids: &liked_ids,
        compact: state.settings.compact_tracklist,
        accent,
        border_style,
    };

    match state.entry.screen {
        Screen::Home => render_home(frame, area, state, &ctx),
        Screen::Search => render_search(frame, area, state, &ctx),
        Screen::Library => render_library(frame, area, state, &ctx),
        Screen::LikedSongs => {
            render_track_table(frame, area, " Liked Songs ", &state.library.liked, &ctx)
        }
        Screen::Settings => render_settings(frame, area, state, &ctx),
        Screen::AlbumDetail => render_album_detail(frame, area, state, &ctx),
        Screen::PlaylistDetail => render_playlist_detail(frame, area, state, &ctx),
        Screen::ArtistDetail => render_artist_detail(frame, area, state, &ctx),
    }
}

/// Per-frame rendering context shared by the list renderers.
#[derive(Clone, Copy)]
struct RenderCtx<'a> {
    selected: usize,
    is_focused: bool,
    playing_id: Option<&'a str>,
    liked_ids: &'a HashSet<&'a str>,
    compact: bool,
    accent: Color,
    border_style: Style,
}

impl RenderCtx<'_> {
    fn row_style(&self, index: usize, is_playing: bool) -> Style {
        if index == self.selected && self.is_focused {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else if is_playing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if index == self.selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }
}

fn release_year(album: &Album) -> String {
    album
        .release_date
        .as_deref()
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_else(|| "-".to_string())
}

// ============================================================================
// Home
// ============================================================================

fn render_home(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let has_recommended = !state.home.recommended.is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if has_recommended {
            [
                Constraint::Percentage(45), // Recently played
                Constraint::Percentage(30), // Recommended
                Constraint::Percentage(25), // Recent searches
            ]
            .as_slice()
        } else {
            [
                Constraint::Percentage(65), // Recently played
                Constraint::Percentage(35), // Recent searches
            ]
            .as_slice()
        })
        .split(area);

    let recents: Vec<ListItem> = state
        .home
        .recents
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_playing = matches!(
                (entry, ctx.playing_id),
                (RecentEntry::Track { track, .. }, Some(id)) if track.id == id
            );
            let style = ctx.row_style(i, is_playing);
            let text = match entry {
                RecentEntry::Track { track, .. } => {
                    format!("🎵 {} - {}", track.title, track.artist.name)
                }
                RecentEntry::Album { album, .. } => {
                    let artist = album.artist.as_ref().map_or("", |a| a.name.as_str());
                    format!("💿 {} - {}", album.title, artist)
                }
                RecentEntry::Artist { artist, .. } => format!("👤 {}", artist.name),
                RecentEntry::Playlist { playlist, .. } => {
                    format!("📻 {} - {}", playlist.title, playlist.creator)
                }
            };
            ListItem::new(text).style(style)
        })
        .collect();

    if recents.is_empty() {
        let empty = Paragraph::new("Nothing played yet\n\nSearch for music and press Enter to play")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Recently Played ")
                    .padding(Padding::horizontal(1))
                    .border_style(ctx.border_style),
            );
        frame.render_widget(empty, chunks[0]);
    } else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Recently Played ")
            .padding(Padding::horizontal(1))
            .border_style(ctx.border_style);
        render_scrollable_list(frame, chunks[0], recents, ctx.selected, block);
    }

    if has_recommended {
        let offset = state.home.recents.len();
        let rows: Vec<ListItem> = state
            .home
            .recommended
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let is_playing = ctx.playing_id == Some(track.id.as_str());
                let liked = if ctx.liked_ids.contains(track.id.as_str()) {
                    "💚 "
                } else {
                    ""
                };
                ListItem::new(format!("🎵 {liked}{} - {}", track.title, track.artist.name))
                    .style(ctx.row_style(offset + i, is_playing))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", state.home.recommended_title))
            .padding(Padding::horizontal(1))
            .border_style(ctx.border_style);
        render_scrollable_list(
            frame,
            chunks[1],
            rows,
            ctx.selected.saturating_sub(offset),
            block,
        );
    }

    let searches: Vec<ListItem> = state
        .home
        .search_history
        .iter()
        .enumerate()
        .map(|(i, query)| {
            ListItem::new(format!("{:>2}. {}", i + 1, query))
                .style(Style::default().fg(Color::DarkGray))
        })
        .collect();

    let searches_block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Searches ")
        .padding(Padding::horizontal(1));
    let searches_chunk = if has_recommended { chunks[2] } else { chunks[1] };
    render_scrollable_list(frame, searches_chunk, searches, 0, searches_block);
}

// ============================================================================
// Search results
// ============================================================================

fn render_search(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let results = &state.entry.results;
    let filter = state.ui.search_filter;

    // Split into tabs area and content area
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Min(0),    // Results list
        ])
        .split(area);

    let total =
        results.tracks.len() + results.albums.len() + results.artists.len() + results.playlists.len();
    let tabs = [
        (CategoryFilter::All, total),
        (CategoryFilter::Tracks, results.tracks.len()),
        (CategoryFilter::Albums, results.albums.len()),
        (CategoryFilter::Artists, results.artists.len()),
        (CategoryFilter::Playlists, results.playlists.len()),
    ];

    let tabs_content: Vec<Span> = tabs
        .iter()
        .flat_map(|(tab, count)| {
            let style = if *tab == filter {
                Style::default()
                    .fg(ctx.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::styled(format!(" {} ({}) ", tab.label(), count), style),
                Span::raw("  "),
            ]
        })
        .collect();

    let tabs_line = ratatui::text::Line::from(tabs_content);
    let tabs_widget = Paragraph::new(tabs_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Results for \"{}\" (←/→ to switch) ", state.entry.query))
            .border_style(ctx.border_style),
    );
    frame.render_widget(tabs_widget, chunks[0]);

    if total == 0 {
        let empty = Paragraph::new("  Nothing found")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1))
                    .border_style(ctx.border_style),
            );
        frame.render_widget(empty, chunks[1]);
        return;
    }

    match filter {
        CategoryFilter::All => render_flat_results(frame, chunks[1], state, ctx),
        CategoryFilter::Tracks => {
            render_track_table(frame, chunks[1], " Songs ", &results.tracks, ctx)
        }
        CategoryFilter::Albums => {
            render_album_table(frame, chunks[1], " Albums ", &results.albums, ctx)
        }
        CategoryFilter::Artists => {
            render_artist_rows(frame, chunks[1], " Artists ", &results.artists, ctx)
        }
        CategoryFilter::Playlists => {
            render_playlist_table(frame, chunks[1], " Playlists ", &results.playlists, ctx)
        }
    }
}

/// The "All" tab: one flat list over every result kind, in the same
/// order the selection cursor walks them.
fn render_flat_results(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let results = &state.entry.results;
    let mut items: Vec<ListItem> = Vec::new();
    let mut index = 0usize;

    for track in &results.tracks {
        let is_playing = ctx.playing_id == Some(track.id.as_str());
        let liked = if ctx.liked_ids.contains(track.id.as_str()) { "💚 " } else { "" };
        items.push(
            ListItem::new(format!(
                "🎵 {}{} - {} ({})",
                liked,
                track.title,
                track.artist.name,
                format_duration(track.duration_secs)
            ))
            .style(ctx.row_style(index, is_playing)),
        );
        index += 1;
    }
    for album in &results.albums {
        let artist = album.artist.as_ref().map_or("", |a| a.name.as_str());
        items.push(
            ListItem::new(format!("💿 {} - {} ({})", album.title, artist, release_year(album)))
                .style(ctx.row_style(index, false)),
        );
        index += 1;
    }
    for artist in &results.artists {
        items.push(
            ListItem::new(format!("👤 {}", artist.name)).style(ctx.row_style(index, false)),
        );
        index += 1;
    }
    for playlist in &results.playlists {
        items.push(
            ListItem::new(format!("📻 {} - {}", playlist.title, playlist.creator))
                .style(ctx.row_style(index, false)),
        );
        index += 1;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .border_style(ctx.border_style);
    render_scrollable_list(frame, area, items, ctx.selected, block);
}

// ============================================================================
// Library
// ============================================================================

fn render_library(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let library = state.library;
    let tab = state.ui.library_tab;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Tab content
        ])
        .split(area);

    let tabs = [
        (LibraryTab::Playlists, library.playlists.len()),
        (LibraryTab::Liked, library.liked.len()),
        (LibraryTab::Albums, library.albums.len()),
        (LibraryTab::Artists, library.artists.len()),
    ];

    let tabs_content: Vec<Span> = tabs
        .iter()
        .flat_map(|(t, count)| {
            let style = if *t == tab {
                Style::default()
                    .fg(ctx.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::styled(format!(" {} ({}) ", t.label(), count), style),
                Span::raw("  "),
            ]
        })
        .collect();

    let tabs_widget = Paragraph::new(ratatui::text::Line::from(tabs_content)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Library (←/→ to switch) ")
            .border_style(ctx.border_style),
    );
    frame.render_widget(tabs_widget, chunks[0]);

    match tab {
        LibraryTab::Playlists => {
            render_playlist_table(frame, chunks[1], " Playlists ", &library.playlists, ctx)
        }
        LibraryTab::Liked => {
            render_track_table(frame, chunks[1], " Liked Songs ", &library.liked, ctx)
        }
        LibraryTab::Albums => {
            render_album_table(frame, chunks[1], " Saved Albums ", &library.albums, ctx)
        }
        LibraryTab::Artists => {
            render_artist_rows(frame, chunks[1], " Followed Artists ", &library.artists, ctx)
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

fn render_settings(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let settings = state.settings;
    let rows = [
        format!("Quality:           {}", settings.quality.label()),
        format!("Volume:            {}%", settings.volume),
        format!(
            "Compact tracklist: {}",
            if settings.compact_tracklist { "On" } else { "Off" }
        ),
        format!("Accent color:      {}", settings.accent.label()),
    ];

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| ListItem::new(row.clone()).style(ctx.row_style(i, false)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Settings (←/→ or Enter to change) ")
        .padding(Padding::horizontal(1))
        .border_style(ctx.border_style);
    render_scrollable_list(frame, area, items, ctx.selected, block);
}

// ============================================================================
// Detail screens
// ============================================================================

fn render_album_detail(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Tracks
        ])
        .split(area);

    let (title, artist, year) = match &state.entry.entity {
        Some(Entity::Album(album)) => (
            album.title.clone(),
            album
                .artist
                .as_ref()
                .map_or_else(String::new, |a| a.name.clone()),
            release_year(album),
        ),
        _ => (String::new(), String::new(), "-".to_string()),
    };

    let header_text = format!(
        "💿 {} by {} ({})\n {} tracks | Enter: Play from selected | Backspace: Go back",
        title,
        artist,
        year,
        state.entry.detail_tracks.len()
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .border_style(ctx.border_style),
        );
    frame.render_widget(header, chunks[0]);

    render_track_table(frame, chunks[1], " Tracks ", &state.entry.detail_tracks, ctx);
}

fn render_playlist_detail(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Tracks
        ])
        .split(area);

    let (title, creator, local) = match &state.entry.entity {
        Some(Entity::Playlist(playlist)) => {
            (playlist.title.clone(), playlist.creator.clone(), playlist.is_local)
        }
        _ => (String::new(), String::new(), false),
    };

    let source = if local { " [local]" } else { "" };
    let header_text = format!(
        "📻 {} by {}{}\n {} tracks | Enter: Play from selected | Backspace: Go back",
        title,
        creator,
        source,
        state.entry.detail_tracks.len()
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .border_style(ctx.border_style),
        );
    frame.render_widget(header, chunks[0]);

    render_track_table(frame, chunks[1], " Tracks ", &state.entry.detail_tracks, ctx);
}

fn render_artist_detail(frame: &mut Frame, area: Rect, state: &ViewState, ctx: &RenderCtx) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Top tracks + albums
        ])
        .split(area);

    let name = match &state.entry.entity {
        Some(Entity::Artist(artist)) => artist.name.as_str(),
        _ => "",
    };
    let header_text = format!(" {} | Press ←/→ to switch sections, Backspace to go back", name);
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).border_style(ctx.border_style));
    frame.render_widget(header, chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let section = state.ui.artist_section;

    let tracks_ctx = RenderCtx {
        is_focused: ctx.is_focused && section == ArtistSection::TopTracks,
        border_style: if ctx.is_focused && section == ArtistSection::TopTracks {
            Style::default().fg(ctx.accent)
        } else {
            Style::default()
        },
        ..*ctx
    };
    render_track_table(
        frame,
        content_chunks[0],
        " Top Tracks ",
        &state.entry.detail_tracks,
        &tracks_ctx,
    );

    let albums_focused = ctx.is_focused && section == ArtistSection::Albums;
    let album_items: Vec<ListItem> = state
        .entry
        .detail_albums
        .iter()
        .enumerate()
        .map(|(i, album)| {
            let style = if i == ctx.selected && albums_focused {
                Style::default().fg(ctx.accent).add_modifier(Modifier::BOLD)
            } else if i == ctx.selected && section == ArtistSection::Albums {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} ({})", album.title, release_year(album))).style(style)
        })
        .collect();

    let albums_block = Block::default()
        .borders(Borders::ALL)
        .title(" Albums ")
        .padding(Padding::horizontal(1))
        .border_style(if albums_focused {
            Style::default().fg(ctx.accent)
        } else {
            Style::default()
        });

    let album_selected = if section == ArtistSection::Albums { ctx.selected } else { 0 };
    render_scrollable_list(frame, content_chunks[1], album_items, album_selected, albums_block);
}

// ============================================================================
// Shared list renderers
// ============================================================================

fn render_track_table(frame: &mut Frame, area: Rect, title: &str, tracks: &[Track], ctx: &RenderCtx) {
    if tracks.is_empty() {
        let empty = Paragraph::new("  No songs here yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .padding(Padding::horizontal(1))
                    .border_style(ctx.border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
        .border_style(ctx.border_style);

    if ctx.compact {
        let items: Vec<ListItem> = tracks
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let is_playing = ctx.playing_id == Some(track.id.as_str());
                let marker = if is_playing { "▶ " } else { "  " };
                ListItem::new(format!(
                    "{}{} - {} ({})",
                    marker,
                    track.title,
                    track.artist.name,
                    format_duration(track.duration_secs)
                ))
                .style(ctx.row_style(i, is_playing))
            })
            .collect();
        render_scrollable_list(frame, area, items, ctx.selected, block);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items = track_table_items(tracks, ctx, content_width);
    // +1 for the header row
    render_scrollable_list(frame, area, items, ctx.selected + 1, block);
}

fn track_table_items(tracks: &[Track], ctx: &RenderCtx, content_width: usize) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(tracks.len());
    let liked_width = 2;
    let duration_width = 8;
    let fixed_width = 1 + num_width + 3 + liked_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    // Header as first item
    let mut items: Vec<ListItem<'static>> = vec![
        ListItem::new(format!(
            " {:<num_width$}   {}   {:<title_width$}   {:<artist_width$}   {}",
            "#", "  ", "Title", "Artist", "Duration",
            num_width = num_width,
            title_width = title_width,
            artist_width = artist_width
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    let track_items: Vec<ListItem> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let duration = format_duration(track.duration_secs);
            let is_playing = ctx.playing_id == Some(track.id.as_str());
            let style = ctx.row_style(i, is_playing);

            let liked_indicator = if ctx.liked_ids.contains(track.id.as_str()) { "💚" } else { "  " };
            let playing_indicator = if is_playing { "▶" } else { " " };
            let track_num = format!("{}{:<num_width$}", playing_indicator, i + 1, num_width = num_width);

            let title_str = truncate_string(&track.title, title_width);
            let artist_str = truncate_string(&track.artist.name, artist_width);

            ListItem::new(format!(
                "{}   {}   {}   {}   {}",
                track_num, liked_indicator, title_str, artist_str, duration
            ))
            .style(style)
        })
        .collect();

    items.extend(track_items);
    items
}

fn render_album_table(frame: &mut Frame, area: Rect, title: &str, albums: &[Album], ctx: &RenderCtx) {
    if albums.is_empty() {
        let empty = Paragraph::new("  No albums here yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .padding(Padding::horizontal(1))
                    .border_style(ctx.border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(albums.len());
    let year_width = 4;
    let fixed_width = 1 + num_width + 3 + 3 + 3 + year_width;
    let remaining = content_width.saturating_sub(fixed_width);
    let name_width = (remaining * 50) / 100;
    let artist_width = remaining.saturating_sub(name_width);

    let mut items: Vec<ListItem> = vec![
        ListItem::new(format!(
            " {:<num_w$}   {:<album_w$}   {:<artist_w$}   {:>year_w$}",
            "#", "Album", "Artist", "Year",
            num_w = num_width,
            album_w = name_width,
            artist_w = artist_width,
            year_w = year_width
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(albums.iter().enumerate().map(|(i, album)| {
        let style = ctx.row_style(i, false);
        let album_str = truncate_string(&album.title, name_width);
        let artist = album.artist.as_ref().map_or("", |a| a.name.as_str());
        let artist_str = truncate_string(artist, artist_width);
        ListItem::new(format!(
            " {:<num_w$}   {}   {}   {:>year_w$}",
            i + 1,
            album_str,
            artist_str,
            release_year(album),
            num_w = num_width,
            year_w = year_width
        ))
        .style(style)
    }));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
        .border_style(ctx.border_style);
    render_scrollable_list(frame, area, items, ctx.selected + 1, block);
}

fn render_artist_rows(frame: &mut Frame, area: Rect, title: &str, artists: &[Artist], ctx: &RenderCtx) {
    let items: Vec<ListItem> = artists
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            ListItem::new(format!("👤 {}", artist.name)).style(ctx.row_style(i, false))
        })
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new("  No artists here yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .padding(Padding::horizontal(1))
                    .border_style(ctx.border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
        .border_style(ctx.border_style);
    render_scrollable_list(frame, area, items, ctx.selected, block);
}

fn render_playlist_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    playlists: &[Playlist],
    ctx: &RenderCtx,
) {
    if playlists.is_empty() {
        let empty = Paragraph::new("  No playlists yet\n\n  Press 'a' on a track to start one")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .padding(Padding::horizontal(1))
                    .border_style(ctx.border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(playlists.len());
    let tracks_width = 8;
    let creator_width = 20;
    let fixed_width = 1 + num_width + 3 + 3 + creator_width + 3 + tracks_width;
    let name_width = content_width.saturating_sub(fixed_width);

    let mut items: Vec<ListItem> = vec![
        ListItem::new(format!(
            " {:<num_w$}   {:<name_w$}   {:<creator_w$}   {:>tracks_w$}",
            "#", "Playlist", "Creator", "Tracks",
            num_w = num_width,
            name_w = name_width,
            creator_w = creator_width,
            tracks_w = tracks_width
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(playlists.iter().enumerate().map(|(i, playlist)| {
        let style = ctx.row_style(i, false);
        let name_str = truncate_string(&playlist.title, name_width);
        let creator_str = truncate_string(&playlist.creator, creator_width);
        let tracks_str = if playlist.is_local {
            playlist.tracks.len().to_string()
        } else {
            "-".to_string()
        };
        ListItem::new(format!(
            " {:<num_w$}   {}   {}   {:>tracks_w$}",
            i + 1,
            name_str,
            creator_str,
            tracks_str,
            num_w = num_width,
            tracks_w = tracks_width
        ))
        .style(style)
    }));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
        .border_style(ctx.border_style);
    render_scrollable_list(frame, area, items, ctx.selected + 1, block);
}
