//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::AppController;
use crate::model::{ActiveSection, Screen};

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.get_ui_state().await.error_message.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle playlist picker modal
        if model.is_playlist_picker_open().await {
            let ui = model.get_ui_state().await;

            // Naming a brand-new playlist
            if ui.new_playlist_input.is_some() {
                match key.code {
                    KeyCode::Enter => {
                        let name = ui.new_playlist_input.clone().unwrap_or_default();
                        drop(model);
                        self.add_selected_to_playlist(usize::MAX, Some(&name)).await;
                    }
                    KeyCode::Esc => {
                        model.close_playlist_picker().await;
                    }
                    KeyCode::Backspace => {
                        let mut state = model.ui_state.lock().await;
                        if let Some(input) = state.new_playlist_input.as_mut() {
                            input.pop();
                        }
                    }
                    KeyCode::Char(c) => {
                        let mut state = model.ui_state.lock().await;
                        if let Some(input) = state.new_playlist_input.as_mut() {
                            input.push(c);
                        }
                    }
                    _ => {}
                }
                return Ok(());
            }

            match key.code {
                KeyCode::Up => model.playlist_picker_move(false).await,
                KeyCode::Down => model.playlist_picker_move(true).await,
                KeyCode::Enter => {
                    let local_count = model
                        .get_library()
                        .await
                        .playlists
                        .iter()
                        .filter(|p| p.is_local)
                        .count();
                    let index = ui.playlist_picker_selected;
                    if index < local_count {
                        drop(model);
                        self.add_selected_to_playlist(index, None).await;
                    } else {
                        // Last row creates a new playlist.
                        model.ui_state.lock().await.new_playlist_input = Some(String::new());
                    }
                }
                KeyCode::Esc | KeyCode::Char('a') => {
                    model.close_playlist_picker().await;
                }
                _ => {}
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::Enter => {
                    let query = ui_state.search_input.clone();
                    if !query.trim().is_empty() {
                        model.set_active_section(ActiveSection::MainContent).await;
                        drop(model);
                        self.perform_search(&query).await;
                    }
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.set_search_input(String::new()).await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Handle MainContent section navigation
        if ui_state.active_section == ActiveSection::MainContent {
            let screen = model.current_entry().await.screen;
            match key.code {
                KeyCode::Up => {
                    model.content_move(false).await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.content_move(true).await;
                    return Ok(());
                }
                KeyCode::Left | KeyCode::Right => {
                    let forward = key.code == KeyCode::Right;
                    match screen {
                        Screen::Search => {
                            let filter = if forward {
                                ui_state.search_filter.next()
                            } else {
                                ui_state.search_filter.prev()
                            };
                            model.set_entry_filter(filter).await;
                        }
                        Screen::Library => model.cycle_library_tab(forward).await,
                        Screen::ArtistDetail => model.toggle_artist_section().await,
                        Screen::Settings => {
                            drop(model);
                            self.adjust_settings_row(ui_state.content_selected, forward)
                                .await;
                        }
                        _ => {}
                    }
                    return Ok(());
                }
                KeyCode::Enter => {
                    if screen == Screen::Settings {
                        drop(model);
                        self.adjust_settings_row(ui_state.content_selected, true).await;
                        return Ok(());
                    }
                    let selected = model.get_selected_content_item().await;
                    drop(model);
                    if let Some(item) = selected {
                        self.handle_selected_item(item).await;
                    }
                    return Ok(());
                }
                KeyCode::Backspace | KeyCode::Esc => {
                    drop(model);
                    self.go_back().await;
                    return Ok(());
                }
                KeyCode::Char('f') | KeyCode::Char('F') => {
                    drop(model);
                    self.go_forward().await;
                    return Ok(());
                }
                KeyCode::Char('x') | KeyCode::Char('X') => {
                    drop(model);
                    self.toggle_like_selected().await;
                    return Ok(());
                }
                KeyCode::Char('k') | KeyCode::Char('K') => {
                    let selected = model.get_selected_content_item().await;
                    drop(model);
                    if let Some(crate::model::SelectedItem::Track { track, .. }) = selected {
                        self.enqueue_track(track).await;
                    }
                    return Ok(());
                }
                KeyCode::Char('a') | KeyCode::Char('A') => {
                    model.open_playlist_picker().await;
                    return Ok(());
                }
                KeyCode::Char('v') | KeyCode::Char('V') => {
                    drop(model);
                    self.play_current_view().await;
                    return Ok(());
                }
                KeyCode::Char('b') | KeyCode::Char('B') => {
                    drop(model);
                    self.toggle_save_current().await;
                    return Ok(());
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    drop(model);
                    self.export_current_view_csv().await;
                    return Ok(());
                }
                KeyCode::Char('z') | KeyCode::Char('Z') => {
                    drop(model);
                    self.export_current_view_zip().await;
                    return Ok(());
                }
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    drop(model);
                    self.download_selected_track().await;
                    return Ok(());
                }
                KeyCode::Delete => {
                    drop(model);
                    if screen == Screen::PlaylistDetail {
                        self.remove_selected_from_playlist().await;
                    } else {
                        self.delete_selected_local_playlist().await;
                    }
                    return Ok(());
                }
                KeyCode::Char(c @ '1'..='9') if screen == Screen::Home => {
                    drop(model);
                    let index = c as usize - '1' as usize;
                    self.search_from_history(index).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                if ui_state.active_section == ActiveSection::Sidebar {
                    model.sidebar_move(false).await;
                }
            }
            KeyCode::Down => {
                if ui_state.active_section == ActiveSection::Sidebar {
                    model.sidebar_move(true).await;
                }
            }
            KeyCode::Enter => {
                if ui_state.active_section == ActiveSection::Sidebar {
                    let selected = ui_state.sidebar_selected;
                    model.set_active_section(ActiveSection::MainContent).await;
                    drop(model);
                    self.open_sidebar_item(selected).await;
                    return Ok(());
                }
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            // Next track
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_track().await;
            }
            // Previous track
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_track().await;
            }
            // Toggle shuffle
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.toggle_shuffle().await;
            }
            // Cycle repeat mode
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.cycle_repeat().await;
            }
            // Volume
            KeyCode::Char('+') | KeyCode::Char('=') => {
                drop(model);
                self.volume_up().await;
            }
            KeyCode::Char('-') => {
                drop(model);
                self.volume_down().await;
            }
            // Save queue as a local playlist
            KeyCode::Char('w') | KeyCode::Char('W') => {
                drop(model);
                let name = format!("Queue {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
                self.save_queue_as_playlist(&name).await;
            }
            // Focus search
            KeyCode::Char('g') | KeyCode::Char('G') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Adjusts the settings screen row under the cursor.
    async fn adjust_settings_row(&self, row: usize, forward: bool) {
        match row {
            0 => self.cycle_quality().await,
            1 => {
                if forward {
                    self.volume_up().await;
                } else {
                    self.volume_down().await;
                }
            }
            2 => self.toggle_compact_tracklist().await,
            3 => self.cycle_accent().await,
            _ => {}
        }
    }
}
