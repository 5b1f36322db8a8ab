// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Admin console: password gate, game settings editor and scan upload.

use super::{page_heading, AppState, Services, LOST_COLOR, PRIMARY_COLOR};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::io::background::{drain_finished, Pending};
use crate::io::serialization::{load_settings, save_settings};
use crate::io::upload::{file_names, pair_files, sort_by_name, SelectionError, UploadClient};
use crate::models::settings::GameSettings;
use crate::notifications::{NoticeLevel, Notify};
use std::path::PathBuf;
use std::sync::Arc;

/// Check `password` against the configured admin password and remember a
/// successful login for the rest of the session.
pub fn login(config: &AppConfig, state: &mut AppState, password: &str) -> Result<()> {
    let Some(expected) = config.admin_password.as_deref().filter(|p| !p.is_empty()) else {
        return Err(Error::auth(
            "auth/operation-not-allowed",
            "No admin password is configured.",
        ));
    };
    if password != expected {
        log::warn!("Rejected admin login");
        return Err(Error::auth("auth/wrong-password", "The password is invalid."));
    }
    state.set_admin_authenticated(true)?;
    log::info!("Admin logged in");
    Ok(())
}

pub fn logout(state: &mut AppState) -> Result<()> {
    state.set_admin_authenticated(false)
}

#[derive(Default)]
pub struct AdminScreen {
    password: String,
    draft: Option<GameSettings>,
    images: Vec<PathBuf>,
    jsons: Vec<PathBuf>,
    selection_error: SelectionError,
    uploads: Vec<Pending<String>>,
}

impl AdminScreen {
    /// Display the admin console, or the login form when signed out.
    pub fn show(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        self.poll_uploads(services);

        page_heading(ui, "Admin");

        if !services.state.is_admin_authenticated() {
            self.show_login(ui, services);
            return;
        }

        if ui.button("Log out").clicked() {
            if let Err(e) = logout(services.state) {
                e.report("logging out", Some(&mut *services.notifications));
            }
            self.draft = None;
            return;
        }
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            self.show_settings(ui, services);
            ui.add_space(16.0);
            ui.separator();
            self.show_upload(ui, services);
        });
    }

    fn show_login(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        ui.label("Enter the admin password:");
        let response = ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Log in").clicked() || submitted {
            match login(services.config, services.state, &self.password) {
                Ok(()) => services
                    .notifications
                    .notify("Logged in.".to_string(), NoticeLevel::Success),
                Err(e) => {
                    e.report("admin login", None);
                    services.notifications.notify(e.to_string(), NoticeLevel::Error);
                }
            }
            self.password.clear();
        }
    }

    fn show_settings(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        ui.label(egui::RichText::new("Game settings").strong().color(PRIMARY_COLOR));
        let draft = self.draft.get_or_insert_with(|| services.settings.clone());

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label("AI score multiplier:");
                ui.add(egui::DragValue::new(&mut draft.ai_score_multiplier).clamp_range(0..=1000));
                ui.end_row();

                ui.label("Animation duration (ms):");
                ui.add(
                    egui::DragValue::new(&mut draft.animation_duration_ms)
                        .speed(50.0)
                        .clamp_range(0..=20_000),
                );
                ui.end_row();

                ui.label("Hint line width:");
                ui.add(
                    egui::DragValue::new(&mut draft.hint_line_width)
                        .speed(0.1)
                        .clamp_range(0.5..=20.0),
                );
                ui.end_row();

                ui.label("Hint radius:");
                ui.add(egui::DragValue::new(&mut draft.hint_radius).clamp_range(1.0..=512.0));
                ui.end_row();

                ui.label("Hint time (ms):");
                ui.add(
                    egui::DragValue::new(&mut draft.hint_time_ms)
                        .speed(50.0)
                        .clamp_range(0..=60_000),
                );
                ui.end_row();

                ui.label("Round duration (ms):");
                ui.add(
                    egui::DragValue::new(&mut draft.round_duration_ms)
                        .speed(50.0)
                        .clamp_range(1000..=60_000),
                );
                ui.end_row();

                ui.label("Rounds per game:");
                ui.add(egui::DragValue::new(&mut draft.rounds_number).clamp_range(1..=100));
                ui.end_row();
            });

        if let Err(e) = draft.validate() {
            ui.label(egui::RichText::new(e.to_string()).color(LOST_COLOR));
        }

        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                self.save(services);
            }
            if ui.button("Reset to defaults").clicked() {
                self.draft = Some(GameSettings::default());
            }
            if ui.button("Import...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Settings", &["yaml", "yml", "json"])
                    .pick_file()
                {
                    match load_settings(&path) {
                        Ok(settings) => self.draft = Some(settings),
                        Err(e) => e.report("importing settings", Some(&mut *services.notifications)),
                    }
                }
            }
            if ui.button("Export...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("YAML", &["yaml", "yml"])
                    .add_filter("JSON", &["json"])
                    .set_file_name("settings.yaml")
                    .save_file()
                {
                    let draft = self.draft.clone().unwrap_or_else(|| services.settings.clone());
                    match save_settings(&draft, &path) {
                        Ok(()) => services.notifications.notify(
                            format!("Exported settings to {}", path.display()),
                            NoticeLevel::Success,
                        ),
                        Err(e) => e.report("exporting settings", Some(&mut *services.notifications)),
                    }
                }
            }
        });
    }

    fn save(&mut self, services: &mut Services) {
        let Some(draft) = self.draft.clone() else {
            return;
        };
        match save_settings(&draft, &services.config.settings_path()) {
            Ok(()) => {
                *services.settings = draft;
                services
                    .notifications
                    .notify("Settings saved.".to_string(), NoticeLevel::Success);
            }
            Err(e) => e.report("saving settings", Some(&mut *services.notifications)),
        }
    }

    fn show_upload(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        ui.label(egui::RichText::new("Upload scans").strong().color(PRIMARY_COLOR));

        ui.horizontal(|ui| {
            if ui.button("Select images...").clicked() {
                if let Some(mut paths) = rfd::FileDialog::new()
                    .add_filter("Images", &["png"])
                    .pick_files()
                {
                    sort_by_name(&mut paths);
                    self.images = paths;
                    self.selection_error = SelectionError::default();
                }
            }
            ui.label(file_names(&self.images));
        });
        if let Some(message) = self.selection_error.images {
            ui.label(egui::RichText::new(message).color(LOST_COLOR));
        }

        ui.horizontal(|ui| {
            if ui.button("Select jsons...").clicked() {
                if let Some(mut paths) = rfd::FileDialog::new()
                    .add_filter("Annotations", &["json"])
                    .pick_files()
                {
                    sort_by_name(&mut paths);
                    self.jsons = paths;
                    self.selection_error = SelectionError::default();
                }
            }
            ui.label(file_names(&self.jsons));
        });
        if let Some(message) = self.selection_error.jsons {
            ui.label(egui::RichText::new(message).color(LOST_COLOR));
        }

        let uploading = !self.uploads.is_empty();
        if ui
            .add_enabled(!uploading, egui::Button::new("Upload"))
            .clicked()
        {
            self.start_upload(services);
        }
        if uploading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("{} upload(s) in progress", self.uploads.len()));
            });
            ui.ctx().request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn start_upload(&mut self, services: &mut Services) {
        let pairs = match pair_files(&self.images, &self.jsons) {
            Ok(pairs) => pairs,
            Err(selection_error) => {
                self.selection_error = selection_error;
                return;
            }
        };

        let client = match UploadClient::new(
            services.config.upload_endpoint.clone(),
            services.config.upload_key.clone(),
        ) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                e.report("creating upload client", Some(&mut *services.notifications));
                return;
            }
        };

        for pair in pairs {
            let client = Arc::clone(&client);
            self.uploads
                .push(Pending::spawn("uploading scan", move || client.upload(&pair)));
        }
        self.images.clear();
        self.jsons.clear();
    }

    fn poll_uploads(&mut self, services: &mut Services) {
        for (context, result) in drain_finished(&mut self.uploads) {
            match result {
                Ok(message) => services.notifications.notify(message, NoticeLevel::Success),
                Err(e) => e.report(context, Some(&mut *services.notifications)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::FileStorage;

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(FileStorage::open(dir.path().join("state.json")));
        (dir, state)
    }

    #[test]
    fn test_login() {
        let (_dir, mut state) = state();
        let config = AppConfig {
            admin_password: Some("secret".to_string()),
            ..Default::default()
        };

        let err = login(&config, &mut state, "guess").unwrap_err();
        assert!(err.is_auth_error());
        assert!(!state.is_admin_authenticated());

        login(&config, &mut state, "secret").unwrap();
        assert!(state.is_admin_authenticated());

        logout(&mut state).unwrap();
        assert!(!state.is_admin_authenticated());
    }

    #[test]
    fn test_login_without_password_configured() {
        let (_dir, mut state) = state();
        let config = AppConfig::default();
        assert!(login(&config, &mut state, "").unwrap_err().is_auth_error());
        assert!(!state.is_admin_authenticated());
    }
}
