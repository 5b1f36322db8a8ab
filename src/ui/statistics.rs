// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Statistics screen: game outcomes across both modes and per-scan answers.

use super::{page_heading, Services, DRAW_COLOR, LOST_COLOR, PRIMARY_COLOR, WON_COLOR};
use crate::io::background::Pending;
use crate::io::leaderboard::{lock_store, ScoreStatistics};
use crate::models::scan::{Difficulty, GameMode};
use crate::models::score::ImageStats;
use std::sync::Arc;

/// Fraction of `part` in `total`, 0 for an empty total.
pub fn share(part: u32, total: u32) -> f32 {
    match total {
        0 => 0.0,
        n => part as f32 / n as f32,
    }
}

#[derive(Default)]
pub struct StatisticsScreen {
    stats: Option<ScoreStatistics>,
    loader: Option<Pending<ScoreStatistics>>,
    difficulty: Difficulty,
    scan_id: u32,
    scan_stats: Option<(Difficulty, u32, ImageStats)>,
    scan_loader: Option<Pending<(Difficulty, u32, ImageStats)>>,
}

impl StatisticsScreen {
    pub fn invalidate(&mut self) {
        self.stats = None;
    }

    fn poll(&mut self, services: &mut Services) {
        if self.stats.is_none() && self.loader.is_none() {
            let store = Arc::clone(services.scores);
            self.loader = Some(Pending::spawn("loading statistics", move || {
                let store = lock_store(&store)?;
                let mut records = Vec::new();
                for mode in GameMode::ALL {
                    records.extend(store.scores(mode)?);
                }
                Ok(ScoreStatistics::from_records(&records))
            }));
        }

        let finished = self.loader.as_ref().and_then(Pending::try_take);
        if let Some(result) = finished {
            self.loader = None;
            match result {
                Ok(stats) => self.stats = Some(stats),
                Err(e) => {
                    self.stats = Some(ScoreStatistics::default());
                    e.report("loading statistics", Some(&mut *services.notifications));
                }
            }
        }

        let finished = self.scan_loader.as_ref().and_then(Pending::try_take);
        if let Some(result) = finished {
            self.scan_loader = None;
            match result {
                Ok(stats) => self.scan_stats = Some(stats),
                Err(e) => e.report("loading scan statistics", Some(&mut *services.notifications)),
            }
        }
    }

    /// Display the statistics page.
    pub fn show(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        self.poll(services);
        if self.loader.is_some() || self.scan_loader.is_some() {
            ui.ctx().request_repaint_after(std::time::Duration::from_millis(100));
        }

        page_heading(ui, "Statistics");

        match &self.stats {
            None => {
                ui.spinner();
            }
            Some(stats) if stats.games() == 0 => {
                ui.label(egui::RichText::new("No games submitted yet.").italics().weak());
            }
            Some(stats) => outcome_bars(ui, stats),
        }

        ui.add_space(16.0);
        ui.separator();
        ui.label(egui::RichText::new("Scan answers").strong().color(PRIMARY_COLOR));

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_source("stats_difficulty")
                .selected_text(self.difficulty.as_str())
                .show_ui(ui, |ui| {
                    for difficulty in Difficulty::ALL {
                        ui.selectable_value(&mut self.difficulty, difficulty, difficulty.as_str());
                    }
                });
            ui.label("Scan:");
            ui.add(
                egui::DragValue::new(&mut self.scan_id)
                    .clamp_range(0..=self.difficulty.files_number().saturating_sub(1)),
            );
            if ui
                .add_enabled(self.scan_loader.is_none(), egui::Button::new("Look up"))
                .clicked()
            {
                let store = Arc::clone(services.scores);
                let (difficulty, scan_id) = (self.difficulty, self.scan_id);
                self.scan_loader = Some(Pending::spawn("loading scan statistics", move || {
                    let stats = lock_store(&store)?.image_stats(difficulty, scan_id)?;
                    Ok((difficulty, scan_id, stats))
                }));
            }
        });

        if let Some((difficulty, scan_id, stats)) = &self.scan_stats {
            ui.label(format!("{} scan {}", difficulty, scan_id));
            if stats.answers() == 0 {
                ui.label(egui::RichText::new("Nobody has played this scan yet.").weak());
            } else {
                ui.label(format!("Answers: {}", stats.answers()));
                labelled_bar(ui, "Correct", stats.correct_ratio(), WON_COLOR);
                labelled_bar(ui, "Used hint", stats.hint_ratio(), DRAW_COLOR);
            }
        }
    }
}

fn outcome_bars(ui: &mut egui::Ui, stats: &ScoreStatistics) {
    let games = stats.games();
    ui.label(format!("Games played: {}", games));
    ui.add_space(4.0);
    labelled_bar(ui, "Human wins", share(stats.human_wins, games), WON_COLOR);
    labelled_bar(ui, "AI wins", share(stats.ai_wins, games), LOST_COLOR);
    labelled_bar(ui, "Draws", share(stats.draws, games), DRAW_COLOR);
    ui.add_space(8.0);
    labelled_bar(ui, "With hints", share(stats.with_hints, games), DRAW_COLOR);
    labelled_bar(ui, "Without hints", share(stats.without_hints, games), PRIMARY_COLOR);
}

fn labelled_bar(ui: &mut egui::Ui, label: &str, fraction: f32, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add_sized([110.0, 18.0], egui::Label::new(label));
        ui.add(
            egui::ProgressBar::new(fraction)
                .fill(color)
                .desired_width(260.0)
                .text(format!("{:.0}%", fraction * 100.0)),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share() {
        assert_eq!(share(0, 0), 0.0);
        assert_eq!(share(1, 4), 0.25);
        assert_eq!(share(3, 3), 1.0);
    }
}
