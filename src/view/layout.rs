//! Layout rendering (top bar, sidebar, main area structure)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, LibraryView, UiState};

pub fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    accent: Color,
    can_back: bool,
    can_forward: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(11), // Back/forward indicator
        ])
        .split(area);

    let search_style = if ui_state.active_section == ActiveSection::Search {
        Style::default().fg(accent)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_input.is_empty() {
        "Type to search..."
    } else {
        &ui_state.search_input
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(if ui_state.active_section == ActiveSection::Search {
                    Style::default().fg(accent)
                } else {
                    Style::default()
                }),
        );
    frame.render_widget(search, chunks[0]);

    // Back/forward availability, browser style
    let arrow_style = |enabled: bool| {
        if enabled {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let nav_line = Line::from(vec![
        Span::styled("  ◀ ", arrow_style(can_back)),
        Span::raw(" "),
        Span::styled(" ▶", arrow_style(can_forward)),
    ]);
    let nav = Paragraph::new(nav_line)
        .block(Block::default().borders(Borders::ALL).title(" Nav "));
    frame.render_widget(nav, chunks[1]);
}

pub fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    library: &LibraryView,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Shortcuts (4 items + 2 borderlines)
            Constraint::Min(0),    // Playlists (fills remaining space)
        ])
        .split(area);

    let shortcut_items: Vec<ListItem> = ui_state
        .sidebar_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == ui_state.sidebar_selected
                && ui_state.active_section == ActiveSection::Sidebar
            {
                Style::default()
                    .fg(accent)
                    .add_modifier(Modifier::BOLD)
            } else if i == ui_state.sidebar_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(item.name.clone()).style(style)
        })
        .collect();

    let shortcuts_border_style = if ui_state.active_section == ActiveSection::Sidebar {
        Style::default().fg(accent)
    } else {
        Style::default()
    };

    let shortcuts = List::new(shortcut_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Menu ")
            .padding(Padding::horizontal(1))
            .border_style(shortcuts_border_style),
    );
    frame.render_widget(shortcuts, chunks[0]);

    // Saved playlists, read-only here; opened from the Library screen
    let playlist_items: Vec<ListItem> = library
        .playlists
        .iter()
        .map(|playlist| {
            let marker = if playlist.is_local { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, playlist.title))
                .style(Style::default().fg(Color::White))
        })
        .collect();

    let playlists = List::new(playlist_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Playlists ")
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(Style::default());

    let mut list_state = ListState::default();
    list_state.select(Some(0));

    frame.render_stateful_widget(playlists, chunks[1], &mut list_state);
}
