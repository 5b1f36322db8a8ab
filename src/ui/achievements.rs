// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Achievements page.

use super::{page_heading, AppState, PRIMARY_COLOR};
use crate::game::achievements::{is_unlocked, Achievement};

/// Number of achievements unlocked so far.
pub fn unlocked_count(state: &AppState) -> usize {
    Achievement::ALL
        .iter()
        .filter(|achievement| is_unlocked(state, **achievement))
        .count()
}

/// Display every achievement, greyed out until unlocked.
pub fn show(ui: &mut egui::Ui, state: &AppState) {
    page_heading(ui, "Achievements");
    ui.label(format!(
        "{} of {} unlocked",
        unlocked_count(state),
        Achievement::ALL.len()
    ));
    ui.add_space(8.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("achievements_grid")
            .num_columns(2)
            .spacing([24.0, 10.0])
            .striped(true)
            .show(ui, |ui| {
                for achievement in Achievement::ALL {
                    let unlocked = is_unlocked(state, achievement);
                    let (icon, color) = if unlocked {
                        ("🏆", PRIMARY_COLOR)
                    } else {
                        ("🔒", egui::Color32::GRAY)
                    };

                    ui.label(egui::RichText::new(icon).size(20.0));
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(achievement.title()).strong().color(color));
                        ui.label(egui::RichText::new(achievement.description()).small());
                    });
                    ui.end_row();
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::FileStorage;

    #[test]
    fn test_unlocked_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(FileStorage::open(dir.path().join("state.json")));
        assert_eq!(unlocked_count(&state), 0);

        state.set_flag(Achievement::ALL[0].key()).unwrap();
        assert_eq!(unlocked_count(&state), 1);
    }
}
