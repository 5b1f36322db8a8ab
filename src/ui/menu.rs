// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Home screen and game setup.

use super::navigation::Screen;
use super::{page_heading, Services};
use crate::game::link::{file_ids_or_default, GameLink};
use crate::models::scan::{Difficulty, GameMode};

/// Result of interacting with the menus.
pub enum MenuAction {
    None,
    Navigate(Screen),
    StartGame(GameLink),
}

/// Choices on the setup screen.
#[derive(Debug, Clone, Default)]
pub struct SetupState {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Challenge ids as typed, e.g. `[1,2,3]`
    pub challenge_text: String,
}

impl SetupState {
    pub fn from_link(link: &GameLink) -> Self {
        let challenge_text = link
            .file_ids
            .as_ref()
            .map(|ids| {
                let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
                format!("[{}]", ids.join(","))
            })
            .unwrap_or_default();
        Self {
            mode: link.mode,
            difficulty: link.difficulty,
            challenge_text,
        }
    }

    pub fn to_link(&self) -> GameLink {
        let text = self.challenge_text.trim();
        let file_ids = if text.is_empty() {
            None
        } else {
            file_ids_or_default(Some(text), None)
        };
        GameLink {
            mode: self.mode,
            difficulty: self.difficulty,
            file_ids,
        }
    }
}

/// Display the home screen.
pub fn show_home(ui: &mut egui::Ui, services: &mut Services) -> MenuAction {
    let mut action = MenuAction::None;

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        page_heading(ui, "Spot the Lesion");
        ui.label(
            egui::RichText::new("Can you beat the AI at finding lesions in CT scans?")
                .size(14.0)
                .color(egui::Color32::from_gray(90)),
        );
        ui.add_space(24.0);

        if services.state.is_first_session() {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.label("First time here? Have a look at the tutorial before you play.");
                ui.horizontal(|ui| {
                    if ui.button("Show tutorial").clicked() {
                        action = MenuAction::Navigate(Screen::About);
                    }
                    if ui.button("Dismiss").clicked() {
                        if let Err(e) = services.state.mark_session_seen() {
                            e.report("first session flag", Some(&mut *services.notifications));
                        }
                    }
                });
            });
            ui.add_space(16.0);
        }

        let button = |text: &str| {
            egui::Button::new(egui::RichText::new(text).size(18.0)).min_size(egui::vec2(220.0, 36.0))
        };
        for (text, screen) in [
            ("Play", Screen::GameSetup),
            ("Leaderboard", Screen::Leaderboard),
            ("Statistics", Screen::Statistics),
            ("Achievements", Screen::Achievements),
            ("About", Screen::About),
            ("Admin", Screen::Admin),
        ] {
            if ui.add(button(text)).clicked() {
                action = MenuAction::Navigate(screen);
            }
            ui.add_space(6.0);
        }
    });

    action
}

/// Display the game setup screen.
pub fn show_setup(ui: &mut egui::Ui, setup: &mut SetupState) -> MenuAction {
    let mut action = MenuAction::None;

    page_heading(ui, "New Game");

    egui::Grid::new("setup_grid")
        .num_columns(2)
        .spacing([16.0, 12.0])
        .show(ui, |ui| {
            ui.label("Mode:");
            ui.horizontal(|ui| {
                for mode in GameMode::ALL {
                    ui.selectable_value(&mut setup.mode, mode, mode.as_str());
                }
            });
            ui.end_row();

            ui.label("Difficulty:");
            ui.horizontal(|ui| {
                for difficulty in Difficulty::ALL {
                    ui.selectable_value(&mut setup.difficulty, difficulty, difficulty.as_str());
                }
            });
            ui.end_row();

            ui.label("Challenge ids:");
            ui.add(
                egui::TextEdit::singleline(&mut setup.challenge_text)
                    .hint_text("[1,2,3] (optional)"),
            );
            ui.end_row();
        });

    let text = setup.challenge_text.trim();
    let valid_ids = text.is_empty() || file_ids_or_default(Some(text), None).is_some();
    if !valid_ids {
        ui.label(
            egui::RichText::new("Challenge ids must look like [1,2,3]")
                .color(egui::Color32::LIGHT_RED),
        );
    }

    ui.add_space(16.0);
    let mode_help = match setup.mode {
        GameMode::Casual => "Play as many rounds as you like and practise spotting lesions.",
        GameMode::Competitive => "Race the AI over a fixed number of rounds and submit your score.",
    };
    ui.label(egui::RichText::new(mode_help).italics().weak());

    ui.add_space(16.0);
    if ui
        .add_enabled(valid_ids, egui::Button::new(egui::RichText::new("Start").size(18.0)))
        .clicked()
    {
        action = MenuAction::StartGame(setup.to_link());
    }

    action
}
