// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Game screen: timer bar, scan canvas and score side bar.
//!
//! The screen owns a [`RoundController`] and feeds it the clock, pointer
//! clicks and background fetch results once per frame.

use super::canvas::{self, EguiSurface};
use super::{Services, DRAW_COLOR, LOST_COLOR, PRIMARY_COLOR, WON_COLOR};
use crate::game::achievements::{game_achievements, round_achievements, unlock_achievement, Achievement};
use crate::game::file_ids::FileIdSequence;
use crate::game::link::{challenge_link, GameLink};
use crate::game::round::{
    GameSummary, RoundController, RoundEvent, RoundState, RoundTicket, TimerColor, Winner, TICK_MS,
};
use crate::game::scoring::RoundOutcome;
use crate::io::assets::{ScanData, ScanSource};
use crate::io::background::{drain_finished, Pending};
use crate::io::leaderboard::lock_store;
use crate::models::annotation::Point;
use crate::models::scan::{Difficulty, GameMode};
use crate::models::score::{ImageClick, ImageStats, ScoreTally};
use crate::models::settings::GameSettings;
use crate::notifications::{NoticeLevel, Notify};
use crate::util::geometry::{fit_centered, map_click_to_canvas, to_default_scale};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Session key of the last name a score was submitted under.
pub const USERNAME_KEY: &str = "username";

/// Result of interacting with the game screen.
pub enum GameAction {
    None,
    PlayAgain,
    Quit,
}

pub fn timer_color(color: TimerColor) -> egui::Color32 {
    match color {
        TimerColor::Normal => egui::Color32::from_rgb(0x37, 0x37, 0x37),
        TimerColor::Warning => egui::Color32::from_rgb(0xff, 0xa5, 0x00),
        TimerColor::Critical => egui::Color32::RED,
    }
}

/// Map a pointer position over the displayed scan to canonical coordinates.
pub fn canonical_click(canvas_rect: egui::Rect, image_size: egui::Vec2, pointer: egui::Pos2) -> Point {
    let pixel = map_click_to_canvas(canvas_rect, image_size, pointer);
    let width = image_size.x as f64;
    Point::new(to_default_scale(width, pixel.x), to_default_scale(width, pixel.y))
}

/// Statistics entry for a resolved round.
pub fn image_click(outcome: &RoundOutcome) -> ImageClick {
    ImageClick {
        position: outcome
            .click
            .map(|p| (p.x.round() as i32, p.y.round() as i32)),
        correct: outcome.player_correct,
        used_hint: outcome.used_hint,
    }
}

/// Fraction of the reveal animation played, 1 once it is over.
pub fn animation_progress(resolved_at_ms: u64, now_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (now_ms.saturating_sub(resolved_at_ms) as f32 / duration_ms as f32).min(1.0)
}

fn unlock_all(achievements: Vec<Achievement>, services: &mut Services) {
    for achievement in achievements {
        if let Err(e) = unlock_achievement(&mut *services.state, achievement, &mut *services.notifications) {
            e.report("unlocking achievement", Some(&mut *services.notifications));
        }
    }
}

pub struct GameScreen {
    link: GameLink,
    controller: RoundController,
    difficulty: Difficulty,
    ids: FileIdSequence,
    played_ids: Vec<u32>,
    source: Arc<dyn ScanSource>,
    loader: Option<(RoundTicket, Pending<ScanData>)>,
    texture: Option<egui::TextureHandle>,
    image_size: egui::Vec2,
    epoch: Instant,
    resolved_at_ms: Option<u64>,
    summary: Option<GameSummary>,
    username: String,
    submitted: bool,
    share_link: Option<String>,
    jobs: Vec<Pending<String>>,
    stats_loader: Option<Pending<ImageStats>>,
    stats: Option<(u32, ImageStats)>,
}

impl GameScreen {
    pub fn new(source: Arc<dyn ScanSource>, settings: GameSettings, link: &GameLink) -> Self {
        let mut controller = RoundController::new(settings, link.mode);
        controller.start_game();

        Self {
            link: link.clone(),
            controller,
            difficulty: link.difficulty,
            ids: FileIdSequence::for_game(link.difficulty, link.file_ids.clone()),
            played_ids: Vec::new(),
            source,
            loader: None,
            texture: None,
            image_size: egui::vec2(512.0, 512.0),
            epoch: Instant::now(),
            resolved_at_ms: None,
            summary: None,
            username: String::new(),
            submitted: false,
            share_link: None,
            jobs: Vec::new(),
            stats_loader: None,
            stats: None,
        }
    }

    /// Prefill the name used for score submission.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    /// Link the game was started from, used to play again.
    pub fn link(&self) -> &GameLink {
        &self.link
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Cancel timers and pending fetches before leaving the screen.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.loader = None;
    }

    fn start_round(&mut self, notifier: &mut dyn Notify) {
        let Some(scan_id) = self.ids.next_id() else {
            notifier.notify("There are no scans to play.".to_string(), NoticeLevel::Error);
            return;
        };

        match self.controller.begin_round(scan_id) {
            Ok(ticket) => {
                let source = Arc::clone(&self.source);
                let difficulty = self.difficulty;
                self.loader = Some((
                    ticket,
                    Pending::spawn("fetching scan", move || source.fetch(difficulty, scan_id)),
                ));
                self.texture = None;
                self.resolved_at_ms = None;
                self.stats = None;
            }
            Err(e) => e.report("starting round", Some(notifier)),
        }
    }

    fn poll_loader(&mut self, ctx: &egui::Context, services: &mut Services) {
        let finished = self
            .loader
            .as_ref()
            .and_then(|(ticket, pending)| pending.try_take().map(|result| (*ticket, result)));
        let Some((ticket, result)) = finished else {
            return;
        };
        self.loader = None;

        match result {
            Ok(data) => {
                let (width, height) = (data.image.width, data.image.height);
                let color_image = data.image.to_color_image();
                if self.controller.scan_loaded(ticket, data.record, self.now_ms()) {
                    self.texture = Some(ctx.load_texture("scan", color_image, egui::TextureOptions::LINEAR));
                    self.image_size = egui::vec2(width as f32, height as f32);
                    self.played_ids.push(ticket.scan_id);
                }
            }
            Err(e) => {
                if self.controller.scan_failed(ticket) {
                    e.report("fetching scan", Some(&mut *services.notifications));
                }
            }
        }
    }

    fn poll_jobs(&mut self, services: &mut Services) {
        for (context, result) in drain_finished(&mut self.jobs) {
            match result {
                Ok(message) if message.is_empty() => {}
                Ok(message) => services.notifications.notify(message, NoticeLevel::Success),
                Err(e) => e.report(context, Some(&mut *services.notifications)),
            }
        }

        let stats = self.stats_loader.as_ref().and_then(Pending::try_take);
        if let Some(result) = stats {
            self.stats_loader = None;
            match (result, self.controller.last_outcome()) {
                (Ok(stats), Some(outcome)) => self.stats = Some((outcome.scan_id, stats)),
                (Ok(_), None) => {}
                (Err(e), _) => e.report("loading scan statistics", Some(&mut *services.notifications)),
            }
        }
    }

    fn handle_events(&mut self, events: Vec<RoundEvent>, services: &mut Services) {
        for event in events {
            match event {
                RoundEvent::Tick { remaining_ms, color } => {
                    log::trace!("{} ms left ({:?})", remaining_ms, color);
                }
                RoundEvent::HintRevealed { center } => {
                    log::debug!("Hint centred at ({}, {})", center.x, center.y);
                }
                RoundEvent::Resolved(outcome) => self.on_resolved(outcome, services),
                RoundEvent::GameEnded(summary) => self.on_game_ended(summary, services),
            }
        }
    }

    fn on_resolved(&mut self, outcome: RoundOutcome, services: &mut Services) {
        self.resolved_at_ms = Some(self.now_ms());
        let earned = round_achievements(
            &outcome,
            self.controller.mode(),
            self.controller.correct_player_answers(),
            self.controller.settings().round_duration_ms,
        );
        unlock_all(earned, services);

        let store = Arc::clone(services.scores);
        let difficulty = self.difficulty;
        let click = image_click(&outcome);
        let scan_id = outcome.scan_id;
        self.jobs.push(Pending::spawn("recording answer", move || {
            lock_store(&store)?.record_click(difficulty, scan_id, click)?;
            Ok(String::new())
        }));
    }

    fn on_game_ended(&mut self, summary: GameSummary, services: &mut Services) {
        unlock_all(game_achievements(&summary), services);
        self.summary = Some(summary);
    }

    fn submit_score(&mut self, services: &mut Services) {
        let user = self.username.trim();
        if user.is_empty() {
            services
                .notifications
                .notify("Please enter a name.".to_string(), NoticeLevel::Error);
            return;
        }

        let record = self
            .controller
            .score_record(user, chrono::Local::now().date_naive());
        if let Err(e) = services.state.set_session_value(USERNAME_KEY, &record.user) {
            e.report("remembering name", None);
        }
        let mode = self.controller.mode();
        let store = Arc::clone(services.scores);
        self.jobs.push(Pending::spawn("submitting score", move || {
            lock_store(&store)?.submit(mode, record)?;
            Ok("Score submitted!".to_string())
        }));
        self.submitted = true;
    }

    /// Display the game screen.
    pub fn show(&mut self, ctx: &egui::Context, services: &mut Services) -> GameAction {
        self.poll_loader(ctx, services);
        self.poll_jobs(services);

        let events = self.controller.advance(self.now_ms());
        self.handle_events(events, services);

        let mut action = GameAction::None;

        egui::TopBottomPanel::top("game_top_bar").show(ctx, |ui| {
            self.show_top_bar(ui);
        });

        egui::SidePanel::right("game_side_bar")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                action = self.show_side_bar(ui, services);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_canvas(ui, services);
        });

        self.show_stats_window(ctx);

        let animating = self.resolved_at_ms.is_some_and(|at| {
            animation_progress(at, self.now_ms(), self.controller.settings().animation_duration_ms) < 1.0
        });
        if self.controller.has_pending_timers()
            || self.controller.is_loading()
            || animating
            || !self.jobs.is_empty()
            || self.stats_loader.is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(TICK_MS));
        }

        action
    }

    fn show_top_bar(&self, ui: &mut egui::Ui) {
        let duration = self.controller.settings().round_duration_ms.max(1);
        let remaining = self.controller.remaining_ms();
        let color = timer_color(self.controller.timer_color());

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{:.1}s", remaining as f64 / 1000.0))
                    .size(22.0)
                    .monospace()
                    .color(color),
            );
            ui.add(
                egui::ProgressBar::new(remaining as f32 / duration as f32).fill(color),
            );
        });
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui, services: &mut Services) {
        let aspect = self.image_size.x / self.image_size.y.max(1.0);
        let canvas_rect = fit_centered(ui.available_rect_before_wrap(), aspect);
        let response = ui.allocate_rect(canvas_rect, egui::Sense::click());
        let painter = ui.painter_at(canvas_rect);
        let settings = self.controller.settings().clone();

        match self.controller.state() {
            RoundState::NotStarted => {
                if self.loader.is_none() {
                    painter.text(
                        canvas_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Press Start round to begin",
                        egui::FontId::proportional(20.0),
                        egui::Color32::from_gray(90),
                    );
                }
            }
            RoundState::Loading { .. } => {
                ui.put(
                    egui::Rect::from_center_size(canvas_rect.center(), egui::vec2(32.0, 32.0)),
                    egui::Spinner::new(),
                );
            }
            RoundState::Running { .. } | RoundState::HintShown { .. } => {
                let mut surface = EguiSurface::new(&painter, canvas_rect, self.texture.as_ref().map(|t| t.id()));
                canvas::draw_running(&mut surface, self.controller.hint_center(), &settings);
            }
            RoundState::Resolved(_) | RoundState::GameEnded(_) => {
                if let (Some(scan), Some(outcome)) = (self.controller.scan(), self.controller.last_outcome()) {
                    let mut surface =
                        EguiSurface::new(&painter, canvas_rect, self.texture.as_ref().map(|t| t.id()));
                    let progress = self
                        .resolved_at_ms
                        .map(|at| animation_progress(at, self.now_ms(), settings.animation_duration_ms))
                        .unwrap_or(1.0);
                    if progress < 1.0 {
                        canvas::draw_ai_search(
                            &mut surface,
                            outcome.hint_center,
                            outcome.click,
                            &settings,
                            progress,
                        );
                    } else {
                        canvas::draw_round_outcome(&mut surface, scan, outcome, &settings);
                    }
                }
            }
        }

        if response.clicked() && self.controller.is_in_round() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let point = canonical_click(canvas_rect, self.image_size, pointer);
                let events = self.controller.handle_click(point);
                self.handle_events(events, services);
            }
        }
    }

    fn show_side_bar(&mut self, ui: &mut egui::Ui, services: &mut Services) -> GameAction {
        let mut action = GameAction::None;
        let mode = self.controller.mode();

        ui.add_space(8.0);
        score_with_increment(ui, "You", self.controller.player_score());
        ui.add_space(4.0);
        score_with_increment(ui, "AI", self.controller.ai_score());
        ui.separator();

        match mode {
            GameMode::Competitive => ui.label(format!(
                "Round {} / {}",
                self.controller.rounds_played(),
                self.controller.settings().rounds_number
            )),
            GameMode::Casual => ui.label(format!("Rounds played: {}", self.controller.rounds_played())),
        };
        ui.label(format!("Correct answers: {}", self.controller.correct_player_answers()));
        if let Some(outcome) = self.controller.last_outcome() {
            ui.label(format!("AI overlap: {:.0}%", outcome.iou * 100.0));
        }
        ui.label(format!("Difficulty: {}", self.difficulty));
        if self.ids.is_challenge() {
            ui.label(egui::RichText::new("Challenge").italics().color(PRIMARY_COLOR));
        }
        ui.separator();

        if let Some(summary) = self.summary.clone() {
            self.show_summary(ui, &summary, services, &mut action);
            return action;
        }

        let animation_done = self.resolved_at_ms.map_or(true, |at| {
            animation_progress(at, self.now_ms(), self.controller.settings().animation_duration_ms) >= 1.0
        });
        let can_start = !self.controller.is_in_round() && self.loader.is_none() && animation_done;
        let label = if self.controller.rounds_played() == 0 {
            "Start round"
        } else {
            "Next round"
        };
        if ui.add_enabled(can_start, egui::Button::new(label)).clicked() {
            self.start_round(&mut *services.notifications);
        }

        let resolved = matches!(self.controller.state(), RoundState::Resolved(_));
        if ui
            .add_enabled(resolved && animation_done && self.stats_loader.is_none(), egui::Button::new("Scan statistics"))
            .clicked()
        {
            self.request_stats(services);
        }

        if mode == GameMode::Casual
            && ui
                .add_enabled(self.controller.rounds_played() > 0, egui::Button::new("Finish game"))
                .clicked()
        {
            self.loader = None;
            let summary = self.controller.finish();
            self.on_game_ended(summary, services);
        }

        action
    }

    fn request_stats(&mut self, services: &mut Services) {
        let Some(outcome) = self.controller.last_outcome() else {
            return;
        };
        let scan_id = outcome.scan_id;
        let difficulty = self.difficulty;
        let store = Arc::clone(services.scores);
        self.stats_loader = Some(Pending::spawn("loading scan statistics", move || {
            lock_store(&store)?.image_stats(difficulty, scan_id)
        }));
    }

    fn show_summary(
        &mut self,
        ui: &mut egui::Ui,
        summary: &GameSummary,
        services: &mut Services,
        action: &mut GameAction,
    ) {
        let (text, color) = match summary.winner() {
            Winner::Player => ("You beat the AI!", WON_COLOR),
            Winner::Ai => ("The AI won this time.", LOST_COLOR),
            Winner::Draw => ("It's a draw!", DRAW_COLOR),
        };
        ui.label(egui::RichText::new(text).size(18.0).strong().color(color));
        ui.label(format!(
            "You spotted {} of {} lesions, the AI {}.",
            summary.correct_player_answers, summary.rounds_played, summary.correct_ai_answers
        ));
        if summary.used_hints {
            ui.label(egui::RichText::new("Hints were used this game.").weak());
        }
        ui.add_space(8.0);

        ui.label("Name:");
        ui.add_enabled(!self.submitted, egui::TextEdit::singleline(&mut self.username));
        if ui
            .add_enabled(!self.submitted, egui::Button::new("Submit score"))
            .clicked()
        {
            self.submit_score(services);
        }

        ui.add_space(8.0);
        if ui.button("Share challenge").clicked() {
            match challenge_link(
                &services.config.share_base_url,
                summary.mode,
                self.difficulty,
                &self.played_ids,
            ) {
                Ok(link) => {
                    ui.output_mut(|o| o.copied_text = link.clone());
                    services
                        .notifications
                        .notify("Challenge link copied to clipboard.".to_string(), NoticeLevel::Info);
                    self.share_link = Some(link);
                }
                Err(e) => e.report("sharing challenge", Some(&mut *services.notifications)),
            }
        }
        if let Some(link) = &self.share_link {
            ui.label(egui::RichText::new(link).small().color(PRIMARY_COLOR));
        }

        ui.add_space(8.0);
        if ui.button("Play again").clicked() {
            *action = GameAction::PlayAgain;
        }
        if ui.button("Quit").clicked() {
            *action = GameAction::Quit;
        }
    }

    fn show_stats_window(&mut self, ctx: &egui::Context) {
        let Some((scan_id, stats)) = &self.stats else {
            return;
        };

        let mut open = true;
        egui::Window::new(format!("Scan {} statistics", scan_id))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Answers: {}", stats.answers()));
                ui.label(format!("Correct: {:.0}%", stats.correct_ratio() * 100.0));
                ui.label(format!("Hints used: {:.0}%", stats.hint_ratio() * 100.0));
                ui.separator();
                heatmap(ui, stats);
            });

        if !open {
            self.stats = None;
        }
    }
}

/// Score line with the last round's delta next to it.
fn score_with_increment(ui: &mut egui::Ui, who: &str, tally: ScoreTally) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{}: {}", who, tally.total)).size(18.0));
        let color = if tally.round > 0 { WON_COLOR } else { LOST_COLOR };
        ui.label(egui::RichText::new(format!("+{}", tally.round)).color(color));
    });
}

/// Click positions over the canonical space, shaded by how often they were hit.
fn heatmap(ui: &mut egui::Ui, stats: &ImageStats) {
    let size = 256.0;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

    let max = stats.clicks.iter().map(|c| c.click_count).max().unwrap_or(1).max(1);
    let scale = size / crate::models::annotation::DEFAULT_IMAGE_SIZE as f32;
    for click in &stats.clicks {
        let alpha = (64 + 191 * click.click_count / max) as u8;
        painter.circle_filled(
            rect.min + egui::vec2(click.x as f32 * scale, click.y as f32 * scale),
            4.0,
            egui::Color32::from_rgba_unmultiplied(0xff, 0x40, 0x00, alpha),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_click() {
        // 512 px scan shown at 256 px
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 100.0), egui::vec2(256.0, 256.0));
        let point = canonical_click(rect, egui::vec2(512.0, 512.0), egui::pos2(105.0, 110.0));
        assert_eq!(point, Point::new(10.0, 20.0));

        // Larger source image is scaled back to 512 space
        let point = canonical_click(rect, egui::vec2(1024.0, 1024.0), egui::pos2(105.0, 110.0));
        assert_eq!(point, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_image_click_rounds_position() {
        let outcome = RoundOutcome {
            scan_id: 2,
            click: Some(Point::new(10.4, 19.6)),
            player_correct: true,
            ai_correct: false,
            iou: 0.0,
            remaining_ms: 0,
            used_hint: true,
            hint_center: None,
            player_score: 0,
            ai_score: 0,
        };
        let click = image_click(&outcome);
        assert_eq!(click.position, Some((10, 20)));
        assert!(click.correct);
        assert!(click.used_hint);
    }

    #[test]
    fn test_animation_progress() {
        assert_eq!(animation_progress(1000, 1000, 3000), 0.0);
        assert_eq!(animation_progress(1000, 2500, 3000), 0.5);
        assert_eq!(animation_progress(1000, 9000, 3000), 1.0);
        assert_eq!(animation_progress(1000, 1000, 0), 1.0);
    }

    #[test]
    fn test_timer_colors_are_distinct() {
        assert_ne!(timer_color(TimerColor::Normal), timer_color(TimerColor::Warning));
        assert_ne!(timer_color(TimerColor::Warning), timer_color(TimerColor::Critical));
    }
}
