// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the long-lived services (config, settings, persisted flags,
//! score store, scan source) and routes each frame to the active screen.

use crate::config::AppConfig;
use crate::game::link::GameLink;
use crate::io::assets::ScanSource;
use crate::io::leaderboard::{shared, JsonScoreStore, SharedScoreStore};
use crate::io::serialization::load_settings_or_default;
use crate::io::storage::FileStorage;
use crate::models::settings::GameSettings;
use crate::notifications::{NoticeLevel, Notifications, Notify};
use crate::ui::about::AboutScreen;
use crate::ui::admin::AdminScreen;
use crate::ui::game::{GameAction, GameScreen, USERNAME_KEY};
use crate::ui::leaderboard::LeaderboardScreen;
use crate::ui::menu::{self, MenuAction, SetupState};
use crate::ui::navigation::{self, Screen};
use crate::ui::statistics::StatisticsScreen;
use crate::ui::{achievements, AppState, Services};
use std::sync::Arc;
use std::time::Instant;

/// Main application state.
pub struct SpotTheLesionApp {
    config: AppConfig,
    settings: GameSettings,
    state: AppState,
    scores: SharedScoreStore,
    /// `None` when the asset base could not be turned into a source
    source: Option<Arc<dyn ScanSource>>,
    notifications: Notifications,

    screen: Screen,
    setup: SetupState,
    game: Option<GameScreen>,
    leaderboard: LeaderboardScreen,
    statistics: StatisticsScreen,
    admin: AdminScreen,
    about: AboutScreen,
}

impl SpotTheLesionApp {
    pub fn new(config: AppConfig) -> Self {
        let data_dir = config.data_dir();
        log::info!("Using data directory {}", data_dir.display());

        let settings = load_settings_or_default(&config.settings_path());
        let state = AppState::new(FileStorage::open(config.storage_path()));
        let scores = shared(JsonScoreStore::new(data_dir));

        let mut notifications = Notifications::default();
        let source = match config.scan_source() {
            Ok(source) => Some(source),
            Err(e) => {
                e.report("opening scan source", Some(&mut notifications));
                None
            }
        };

        Self {
            config,
            settings,
            state,
            scores,
            source,
            notifications,
            screen: Screen::Home,
            setup: SetupState::default(),
            game: None,
            leaderboard: LeaderboardScreen::default(),
            statistics: StatisticsScreen::default(),
            admin: AdminScreen::default(),
            about: AboutScreen::default(),
        }
    }

    /// Start a game straight away, e.g. from a challenge link.
    pub fn with_link(mut self, link: Option<GameLink>) -> Self {
        if let Some(link) = link {
            self.start_game(link);
        }
        self
    }

    fn start_game(&mut self, link: GameLink) {
        let Some(source) = self.source.clone() else {
            self.notifications
                .notify("No scan source is available.".to_string(), NoticeLevel::Error);
            return;
        };

        if let Some(game) = self.game.as_mut() {
            game.teardown();
        }
        log::info!(
            "Starting {} game on {} scans{}",
            link.mode,
            link.difficulty,
            if link.file_ids.is_some() { " (challenge)" } else { "" }
        );
        self.setup = SetupState::from_link(&link);
        let username = self.state.session_value(USERNAME_KEY, String::new());
        self.game = Some(GameScreen::new(source, self.settings.clone(), &link).with_username(username));
        self.screen = Screen::Game;
    }

    fn navigate(&mut self, target: Screen) {
        if self.screen == Screen::Game && target != Screen::Game {
            if let Some(mut game) = self.game.take() {
                game.teardown();
            }
        }

        match target {
            Screen::Leaderboard => self.leaderboard.invalidate(),
            Screen::Statistics => self.statistics.invalidate(),
            Screen::About => self.about.open_tutorial(),
            Screen::Game if self.game.is_none() => {
                self.screen = Screen::GameSetup;
                return;
            }
            _ => {}
        }
        self.screen = target;
    }
}

impl eframe::App for SpotTheLesionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.notifications.expire(Instant::now());

        let mut target = None;
        let mut start = None;

        egui::TopBottomPanel::top("navigation").show(ctx, |ui| {
            target = navigation::show(ui, self.screen);
        });

        let Self {
            config,
            settings,
            state,
            scores,
            notifications,
            screen,
            setup,
            game,
            leaderboard,
            statistics,
            admin,
            about,
            ..
        } = self;
        let mut services = Services {
            config,
            settings,
            state,
            scores,
            notifications,
        };

        match *screen {
            Screen::Game => match game.as_mut() {
                Some(game) => match game.show(ctx, &mut services) {
                    GameAction::PlayAgain => start = Some(game.link().clone()),
                    GameAction::Quit => target = Some(Screen::Home),
                    GameAction::None => {}
                },
                None => target = Some(Screen::GameSetup),
            },
            current => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let action = match current {
                        Screen::Home => menu::show_home(ui, &mut services),
                        Screen::GameSetup => menu::show_setup(ui, setup),
                        Screen::Leaderboard => {
                            leaderboard.show(ui, &mut services);
                            MenuAction::None
                        }
                        Screen::Statistics => {
                            statistics.show(ui, &mut services);
                            MenuAction::None
                        }
                        Screen::Achievements => {
                            achievements::show(ui, &*services.state);
                            MenuAction::None
                        }
                        Screen::Admin => {
                            admin.show(ui, &mut services);
                            MenuAction::None
                        }
                        Screen::About => {
                            about.show(ui, &mut services);
                            MenuAction::None
                        }
                        Screen::Game => MenuAction::None,
                    };

                    match action {
                        MenuAction::Navigate(screen) => target = Some(screen),
                        MenuAction::StartGame(link) => start = Some(link),
                        MenuAction::None => {}
                    }
                });
            }
        }

        services.notifications.show(ctx);

        if let Some(link) = start {
            self.start_game(link);
        } else if let Some(target) = target {
            self.navigate(target);
        }
    }
}
