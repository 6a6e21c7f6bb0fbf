//! Overlay rendering (error notification, playlist picker, help popup, transfers)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::model::{LibraryView, UiState};

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Fixed width popup (responsive to screen size)
        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4) as usize; // account for borders

        // Calculate how many lines the error message will take when wrapped
        let error_line_count = ((error_msg.chars().count() as f32) / (inner_width as f32)).ceil() as u16;

        // Height: top border (1) + error lines + bottom border (1)
        let popup_height = (2 + error_line_count.max(1)).min(area.height - 4);

        let popup_x = area.width.saturating_sub(popup_width) / 2;
        let popup_y = area.height.saturating_sub(popup_height) / 2;

        let popup_area = Rect {
            x: popup_x,
            y: popup_y,
            width: popup_width,
            height: popup_height,
        };

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

pub fn render_playlist_picker(
    frame: &mut Frame,
    ui_state: &UiState,
    library: &LibraryView,
    accent: Color,
) {
    let area = frame.area();

    // Naming mode: a single input line instead of the list
    if let Some(ref name) = ui_state.new_playlist_input {
        let popup_width = 44.min(area.width.saturating_sub(4));
        let popup_area = Rect {
            x: area.width.saturating_sub(popup_width) / 2,
            y: area.height.saturating_sub(3) / 2,
            width: popup_width,
            height: 3,
        };
        frame.render_widget(Clear, popup_area);

        let input = Paragraph::new(format!("{}▎", name))
            .style(Style::default().fg(accent))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" New playlist name (Enter to create) ")
                    .style(Style::default().bg(Color::Black)),
            );
        frame.render_widget(input, popup_area);
        return;
    }

    let locals: Vec<&str> = library
        .playlists
        .iter()
        .filter(|p| p.is_local)
        .map(|p| p.title.as_str())
        .collect();

    let max_name_len = locals.iter().map(|n| n.len()).max().unwrap_or(20);
    let popup_width = (max_name_len as u16 + 10).clamp(36, 60);
    let popup_height = (locals.len() as u16 + 3 + 2).min(area.height.saturating_sub(4));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let mut items: Vec<ListItem> = locals
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == ui_state.playlist_picker_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("📻 {}", name)).style(style)
        })
        .collect();

    // Last row creates a fresh playlist
    let new_style = if ui_state.playlist_picker_selected == locals.len() {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    items.push(ListItem::new("+ New playlist...").style(new_style));

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Add to playlist (↑↓ Enter Esc) ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.playlist_picker_selected));

    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

pub fn render_transfers(frame: &mut Frame, transfers: &[crate::model::TransferState]) {
    let area = frame.area();

    let lines: Vec<String> = transfers
        .iter()
        .map(|t| format!("⇣ {}: {} {}%", t.kind.label(), t.name, t.percent))
        .collect();

    let max_len = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let popup_width = (max_len + 4).min(area.width.saturating_sub(2));
    let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));

    // Pinned bottom-right, just above the player bar
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width + 1),
        y: area.height.saturating_sub(popup_height + 3),
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let text = lines.join("\n");
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Transfers ")
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("← / →", "Switch category / tab / section"),
        ("Enter", "Select / Play"),
        ("Backspace / Esc", "Go back"),
        ("F", "Go forward"),
        ("G", "Focus search"),
        ("1-9", "Re-run recent search (Home)"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("N", "Next track"),
        ("P", "Previous track"),
        ("S", "Toggle shuffle"),
        ("R", "Cycle repeat (off → all → one)"),
        ("+ / -", "Volume up / down"),
        ("V", "Play current view"),
        ("", ""),
        ("", "── Library ──"),
        ("X", "Like / Unlike track"),
        ("B", "Save / Unsave album, artist, playlist"),
        ("K", "Add to queue"),
        ("A", "Add track to playlist"),
        ("W", "Save queue as playlist"),
        ("Delete", "Delete playlist / remove track from it"),
        ("", ""),
        ("", "── Export ──"),
        ("C", "Export view as CSV"),
        ("Z", "Export view as ZIP"),
        ("D", "Download selected track"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_width = 62;
    let popup_height = (keybindings.len() as u16 + 2).min(area.height - 4);

    let popup_x = area.width.saturating_sub(popup_width) / 2;
    let popup_y = area.height.saturating_sub(popup_height) / 2;

    let popup_area = Rect {
        x: popup_x,
        y: popup_y,
        width: popup_width,
        height: popup_height,
    };

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        desc.to_string(),
                        Style::default().fg(Color::White),
                    ),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
