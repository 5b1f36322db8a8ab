// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! About page: a paged tutorial and the credits.

use super::{page_heading, Services, PRIMARY_COLOR};

const TUTORIAL_STEPS: &[&str] = &[
    "Welcome to Spot the Lesion!",
    "You get a CT scan and have to find the lesion in it.",
    "There are two game modes: competitive and casual.",
    "In competitive mode you have a few seconds per scan to click where you think the lesion is.",
    "Part way through the round a red circle appears around the area you should look at.",
    "Your click is marked with a cross: green when it is inside the lesion, red otherwise.",
    "The faster you answer, the more points you score...",
    "...and answering before the hint appears doubles them.",
    "The AI's prediction is outlined in green when it found the lesion and in red when it missed.",
    "The real lesion is outlined in yellow.",
    "Casual mode has no fixed number of rounds, so finish whenever you like.",
    "At the end of a game you can submit your score to the leaderboard or share the same scans as a challenge.",
    "That's it! Can you spot more lesions than the AI?",
];

/// Crates the app is built on, as `name@version`.
const LIBRARIES: &[&str] = &[
    "eframe@0.28",
    "egui@0.28",
    "rfd@0.14",
    "image@0.25",
    "serde@1.0",
    "serde_json@1.0",
    "serde_yaml@0.9",
    "reqwest@0.12",
    "url@2.5",
    "thiserror@2.0",
    "anyhow@1.0",
    "log@0.4",
    "env_logger@0.11",
    "rand@0.9",
    "chrono@0.4",
    "dirs@5.0",
];

/// Split `name@version`. Strings without a separator are returned as both
/// name and version.
pub fn package_name_and_version(package: &str) -> (&str, &str) {
    match package.rsplit_once('@') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => (name, version),
        _ => (package, package),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Tutorial,
    Credits,
}

#[derive(Default)]
pub struct AboutScreen {
    tab: Tab,
    step: usize,
}

impl AboutScreen {
    /// Open the About page on the first tutorial step.
    pub fn open_tutorial(&mut self) {
        self.tab = Tab::Tutorial;
        self.step = 0;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        page_heading(ui, "About");

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, Tab::Tutorial, "How to play");
            ui.selectable_value(&mut self.tab, Tab::Credits, "Credits");
        });
        ui.separator();

        match self.tab {
            Tab::Tutorial => self.show_tutorial(ui, services),
            Tab::Credits => show_credits(ui),
        }
    }

    fn show_tutorial(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        let last = TUTORIAL_STEPS.len() - 1;
        self.step = self.step.min(last);

        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(TUTORIAL_STEPS[self.step])
                    .size(18.0)
                    .color(PRIMARY_COLOR),
            );
            ui.add_space(24.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.step > 0, egui::Button::new("Previous"))
                    .clicked()
                {
                    self.step -= 1;
                }
                ui.label(format!("{} / {}", self.step + 1, TUTORIAL_STEPS.len()));
                if ui
                    .add_enabled(self.step < last, egui::Button::new("Next"))
                    .clicked()
                {
                    self.step += 1;
                }
            });
        });

        if self.step == last && services.state.is_first_session() {
            if let Err(e) = services.state.mark_session_seen() {
                e.report("first session flag", Some(&mut *services.notifications));
            }
        }
    }
}

fn show_credits(ui: &mut egui::Ui) {
    ui.label("Spot the Lesion pits you against an AI at finding lesions on CT scans.");
    ui.add_space(12.0);
    ui.label(egui::RichText::new("Built with").strong());

    egui::Grid::new("credits_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for package in LIBRARIES {
                let (name, version) = package_name_and_version(package);
                ui.hyperlink_to(name, format!("https://crates.io/crates/{}", name));
                ui.label(version);
                ui.end_row();
            }
        });
}
