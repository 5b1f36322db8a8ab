// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI screens for the Spot the Lesion application.

pub mod about;
pub mod achievements;
pub mod admin;
pub mod canvas;
pub mod game;
pub mod leaderboard;
pub mod menu;
pub mod navigation;
pub mod statistics;

use crate::config::AppConfig;
use crate::io::leaderboard::SharedScoreStore;
use crate::io::storage::{FileStorage, PersistedState};
use crate::models::settings::GameSettings;
use crate::notifications::Notifications;

/// Flags kept across launches in the data directory.
pub type AppState = PersistedState<FileStorage>;

/// Shared application services handed to each screen while it draws.
pub struct Services<'a> {
    pub config: &'a AppConfig,
    pub settings: &'a mut GameSettings,
    pub state: &'a mut AppState,
    pub scores: &'a SharedScoreStore,
    pub notifications: &'a mut Notifications,
}

pub const PRIMARY_COLOR: egui::Color32 = egui::Color32::from_rgb(0x07, 0x57, 0x5b);
pub const SECONDARY_COLOR: egui::Color32 = egui::Color32::from_rgb(0x63, 0xa2, 0xab);
pub const WON_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0x80, 0x00);
pub const LOST_COLOR: egui::Color32 = egui::Color32::RED;
pub const DRAW_COLOR: egui::Color32 = egui::Color32::GRAY;

/// Light theme with the app's primary colour on selections.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.selection.bg_fill = SECONDARY_COLOR;
    visuals.hyperlink_color = PRIMARY_COLOR;
    ctx.set_visuals(visuals);
}

/// Heading used at the top of each page.
pub fn page_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(8.0);
    ui.heading(egui::RichText::new(text).size(26.0).color(PRIMARY_COLOR));
    ui.add_space(8.0);
}
