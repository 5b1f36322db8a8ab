// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screen routing and the navigation bar.

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    GameSetup,
    Game,
    Leaderboard,
    Statistics,
    Achievements,
    Admin,
    About,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Spot the Lesion",
            Screen::GameSetup => "New Game",
            Screen::Game => "Game",
            Screen::Leaderboard => "Leaderboard",
            Screen::Statistics => "Statistics",
            Screen::Achievements => "Achievements",
            Screen::Admin => "Admin",
            Screen::About => "About",
        }
    }

    /// Where the back button leads.
    pub fn parent(&self) -> Option<Screen> {
        match self {
            Screen::Home => None,
            Screen::Game => Some(Screen::GameSetup),
            _ => Some(Screen::Home),
        }
    }
}

/// Display the navigation bar. Returns the screen to switch to, if any.
pub fn show(ui: &mut egui::Ui, current: Screen) -> Option<Screen> {
    let mut target = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if let Some(parent) = current.parent() {
            if ui.button("⬅ Back").clicked() {
                target = Some(parent);
            }
            ui.separator();
        }

        ui.label(egui::RichText::new(current.title()).strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for screen in [Screen::About, Screen::Achievements, Screen::Statistics, Screen::Leaderboard] {
                if ui.selectable_label(current == screen, screen.title()).clicked() {
                    target = Some(screen);
                }
            }
        });
    });

    target.filter(|screen| *screen != current)
}
