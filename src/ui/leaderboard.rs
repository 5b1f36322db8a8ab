// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Leaderboard screen.

use super::{page_heading, Services};
use crate::io::background::Pending;
use crate::io::leaderboard::{color_by_rank, lock_store, rank_scores, LeaderboardEntry, TimeFilter};
use crate::models::scan::GameMode;
use crate::models::score::ScoreRecord;

pub struct LeaderboardScreen {
    mode: GameMode,
    filter: TimeFilter,
    records: Vec<ScoreRecord>,
    loader: Option<Pending<Vec<ScoreRecord>>>,
    stale: bool,
}

impl Default for LeaderboardScreen {
    fn default() -> Self {
        Self {
            mode: GameMode::Competitive,
            filter: TimeFilter::default(),
            records: Vec::new(),
            loader: None,
            stale: true,
        }
    }
}

impl LeaderboardScreen {
    /// Reload scores the next time the screen is shown.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    fn poll(&mut self, services: &mut Services) {
        if self.stale && self.loader.is_none() {
            let store = std::sync::Arc::clone(services.scores);
            let mode = self.mode;
            self.loader = Some(Pending::spawn("loading scores", move || lock_store(&store)?.scores(mode)));
            self.stale = false;
        }

        let finished = self.loader.as_ref().and_then(Pending::try_take);
        if let Some(result) = finished {
            self.loader = None;
            match result {
                Ok(records) => self.records = records,
                Err(e) => {
                    self.records.clear();
                    e.report("loading scores", Some(&mut *services.notifications));
                }
            }
        }
    }

    pub fn entries(&self, today: chrono::NaiveDate) -> Vec<LeaderboardEntry> {
        rank_scores(&self.records, self.filter, today)
    }

    /// Display the leaderboard.
    pub fn show(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        self.poll(services);

        page_heading(ui, "Leaderboard");

        ui.horizontal(|ui| {
            for mode in GameMode::ALL {
                if ui.selectable_label(self.mode == mode, mode.as_str()).clicked() && self.mode != mode {
                    self.mode = mode;
                    self.records.clear();
                    self.stale = true;
                }
            }
            ui.separator();
            for filter in TimeFilter::ALL {
                ui.selectable_value(&mut self.filter, filter, filter.label());
            }
        });
        ui.separator();

        if self.loader.is_some() {
            ui.spinner();
            ui.ctx().request_repaint_after(std::time::Duration::from_millis(100));
            return;
        }

        let entries = self.entries(chrono::Local::now().date_naive());
        if entries.is_empty() {
            ui.label(egui::RichText::new("No scores yet.").italics().weak());
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("leaderboard_grid")
                .num_columns(3)
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("Rank").strong());
                    ui.label(egui::RichText::new("Name").strong());
                    ui.label(egui::RichText::new("Score").strong());
                    ui.end_row();

                    for entry in &entries {
                        let color = color_by_rank(entry.rank);
                        ui.label(egui::RichText::new(entry.rank.to_string()).strong().color(color));
                        ui.label(&entry.user);
                        ui.label(entry.score.to_string());
                        ui.end_row();
                    }
                });
        });
    }
}
