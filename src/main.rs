// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Spot the Lesion
//!
//! A desktop quiz game: find the lesion on a CT scan before the timer runs
//! out and compare your answer with an AI's prediction.

mod app;
mod config;
mod error;
mod game;
mod io;
mod models;
mod notifications;
mod ui;
mod util;

use anyhow::Result;
use app::SpotTheLesionApp;
use game::link::parse_game_link;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = config::load_config(&config::config_path());

    // An optional challenge link or query string starts a game directly
    let link = std::env::args().nth(1).map(|arg| parse_game_link(&arg));
    if let Some(link) = &link {
        log::info!("Starting from link: {:?}", link);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 640.0])
            .with_title("Spot the Lesion"),
        ..Default::default()
    };

    eframe::run_native(
        "Spot the Lesion",
        options,
        Box::new(move |cc| {
            ui::apply_theme(&cc.egui_ctx);
            Ok(Box::new(SpotTheLesionApp::new(config).with_link(link)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
