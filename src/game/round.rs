// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Round controller.
//!
//! The single authority over a game: which round is active, how much time is
//! left, whether the hint is showing, and the running scores. Every round gets
//! a fresh monotonic id. Timers and background fetch results carry the id they
//! were created for and are dropped when it no longer matches, so nothing
//! from a replaced round can touch the current one.

use super::scoring::{evaluate_round, RoundOutcome};
use super::timer::{TimerKind, TimerSet};
use crate::error::{Error, Result};
use crate::models::annotation::Point;
use crate::models::scan::{GameMode, ScanRecord};
use crate::models::score::{Month, ScoreRecord, ScoreTally};
use crate::models::settings::GameSettings;
use crate::util::numbers::random_around;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Countdown step.
pub const TICK_MS: u64 = 100;

/// Remaining time at or below which the timer turns orange.
pub const WARNING_THRESHOLD_MS: u64 = 5000;

/// Remaining time at or below which the timer turns red.
pub const CRITICAL_THRESHOLD_MS: u64 = 2000;

/// Maximum offset of the hint circle from the lesion centre (canonical units).
pub const HINT_RANGE: f64 = 50.0;

/// Timer display colour band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerColor {
    Normal,
    Warning,
    Critical,
}

impl TimerColor {
    pub fn for_remaining(remaining_ms: u64) -> Self {
        if remaining_ms <= CRITICAL_THRESHOLD_MS {
            TimerColor::Critical
        } else if remaining_ms <= WARNING_THRESHOLD_MS {
            TimerColor::Warning
        } else {
            TimerColor::Normal
        }
    }
}

/// Handle for an in-flight scan fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    pub round_id: u64,
    pub scan_id: u32,
}

/// Who came out ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player,
    Ai,
    Draw,
}

/// End-of-game figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub mode: GameMode,
    pub player_score: u32,
    pub ai_score: u32,
    pub correct_player_answers: u32,
    pub correct_ai_answers: u32,
    pub rounds_played: u32,
    pub used_hints: bool,
}

impl GameSummary {
    pub fn winner(&self) -> Winner {
        match self.player_score.cmp(&self.ai_score) {
            std::cmp::Ordering::Greater => Winner::Player,
            std::cmp::Ordering::Less => Winner::Ai,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

/// Lifecycle of the current round.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundState {
    NotStarted,
    Loading { scan_id: u32 },
    Running { started_at_ms: u64, remaining_ms: u64 },
    HintShown { started_at_ms: u64, remaining_ms: u64, hint_center: Point },
    Resolved(RoundOutcome),
    GameEnded(GameSummary),
}

/// Something the UI should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    Tick { remaining_ms: u64, color: TimerColor },
    HintRevealed { center: Point },
    Resolved(RoundOutcome),
    GameEnded(GameSummary),
}

/// Drives rounds from scan selection to resolution.
pub struct RoundController {
    settings: GameSettings,
    mode: GameMode,
    round_id: u64,
    state: RoundState,
    scan: Option<ScanRecord>,
    timers: TimerSet,
    player: ScoreTally,
    ai: ScoreTally,
    rounds_played: u32,
    correct_player_answers: u32,
    correct_ai_answers: u32,
    used_hints: bool,
    last_outcome: Option<RoundOutcome>,
    rng: StdRng,
}

impl RoundController {
    pub fn new(settings: GameSettings, mode: GameMode) -> Self {
        Self::with_rng(settings, mode, StdRng::from_os_rng())
    }

    pub fn with_rng(settings: GameSettings, mode: GameMode, rng: StdRng) -> Self {
        Self {
            settings,
            mode,
            round_id: 0,
            state: RoundState::NotStarted,
            scan: None,
            timers: TimerSet::new(),
            player: ScoreTally::default(),
            ai: ScoreTally::default(),
            rounds_played: 0,
            correct_player_answers: 0,
            correct_ai_answers: 0,
            used_hints: false,
            last_outcome: None,
            rng,
        }
    }

    /// Reset scores and counters for a fresh game.
    pub fn start_game(&mut self) {
        self.invalidate();
        self.state = RoundState::NotStarted;
        self.scan = None;
        self.player.reset();
        self.ai.reset();
        self.rounds_played = 0;
        self.correct_player_answers = 0;
        self.correct_ai_answers = 0;
        self.used_hints = false;
        self.last_outcome = None;
        log::info!("Started new {} game", self.mode);
    }

    /// Start loading a new round. The returned ticket must accompany the
    /// fetch result passed to [`Self::scan_loaded`].
    pub fn begin_round(&mut self, scan_id: u32) -> Result<RoundTicket> {
        if self.is_game_over() {
            return Err(Error::GameOver);
        }
        if self.is_in_round() {
            log::warn!("Abandoning round {} before it resolved", self.round_id);
        }

        self.invalidate();
        self.scan = None;
        self.state = RoundState::Loading { scan_id };
        log::info!("Round {} loading scan {}", self.round_id, scan_id);

        Ok(RoundTicket {
            round_id: self.round_id,
            scan_id,
        })
    }

    /// Fetch continuation: start the countdown if the ticket is still current.
    ///
    /// Returns `false` when the result belongs to a replaced round.
    pub fn scan_loaded(&mut self, ticket: RoundTicket, scan: ScanRecord, now_ms: u64) -> bool {
        if !self.accepts(ticket) {
            log::debug!(
                "Dropping stale scan {} for round {} (current round {})",
                ticket.scan_id,
                ticket.round_id,
                self.round_id
            );
            return false;
        }

        let duration = self.settings.round_duration_ms;
        self.timers.arm(self.round_id, TimerKind::Hint, now_ms + self.settings.hint_time_ms);
        self.timers.arm(self.round_id, TimerKind::Timeout, now_ms + duration);
        self.timers
            .arm_repeating(self.round_id, TimerKind::Tick, now_ms + TICK_MS, TICK_MS);

        self.scan = Some(scan);
        self.state = RoundState::Running {
            started_at_ms: now_ms,
            remaining_ms: duration,
        };
        log::info!("Round {} running", self.round_id);
        true
    }

    /// Fetch failed: let the player retry. Stale failures are ignored.
    pub fn scan_failed(&mut self, ticket: RoundTicket) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = RoundState::NotStarted;
        true
    }

    /// Process every timer due at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Vec<RoundEvent> {
        let mut events = Vec::new();

        for firing in self.timers.due(now_ms) {
            if firing.round_id != self.round_id {
                log::debug!("Ignoring {:?} timer of round {}", firing.kind, firing.round_id);
                continue;
            }

            match firing.kind {
                TimerKind::Tick => {
                    if let RoundState::Running { remaining_ms, .. }
                    | RoundState::HintShown { remaining_ms, .. } = &mut self.state
                    {
                        *remaining_ms = remaining_ms.saturating_sub(TICK_MS);
                        events.push(RoundEvent::Tick {
                            remaining_ms: *remaining_ms,
                            color: TimerColor::for_remaining(*remaining_ms),
                        });
                    }
                }
                TimerKind::Hint => {
                    if let RoundState::Running {
                        started_at_ms,
                        remaining_ms,
                    } = self.state
                    {
                        let center = self.hint_center_for_scan();
                        self.state = RoundState::HintShown {
                            started_at_ms,
                            remaining_ms,
                            hint_center: center,
                        };
                        log::info!("Round {} hint shown", self.round_id);
                        events.push(RoundEvent::HintRevealed { center });
                    }
                }
                TimerKind::Timeout => events.extend(self.handle_timeout()),
            }
        }

        events
    }

    /// Resolve the round with the player's click (canonical coordinates).
    /// Ignored unless a round is running.
    pub fn handle_click(&mut self, point: Point) -> Vec<RoundEvent> {
        self.resolve(Some(point))
    }

    /// Resolve the round as a missed answer.
    pub fn handle_timeout(&mut self) -> Vec<RoundEvent> {
        self.resolve(None)
    }

    /// Casual games end when the player leaves; competitive games can be
    /// abandoned. Returns the summary of what was played.
    pub fn finish(&mut self) -> GameSummary {
        self.invalidate();
        let summary = self.summary();
        self.state = RoundState::GameEnded(summary.clone());
        summary
    }

    /// Cancel everything pending, e.g. when the game screen closes.
    pub fn teardown(&mut self) {
        self.invalidate();
        if matches!(
            self.state,
            RoundState::Loading { .. } | RoundState::Running { .. } | RoundState::HintShown { .. }
        ) {
            self.state = RoundState::NotStarted;
        }
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            mode: self.mode,
            player_score: self.player.total,
            ai_score: self.ai.total,
            correct_player_answers: self.correct_player_answers,
            correct_ai_answers: self.correct_ai_answers,
            rounds_played: self.rounds_played,
            used_hints: self.used_hints,
        }
    }

    /// Leaderboard document for the current totals.
    pub fn score_record(&self, user: &str, date: NaiveDate) -> ScoreRecord {
        ScoreRecord {
            user: user.to_string(),
            score: self.player.total,
            ai_score: self.ai.total,
            correct_player_answers: self.correct_player_answers,
            correct_ai_answers: self.correct_ai_answers,
            day: date.day(),
            month: Month::of(date),
            year: date.year(),
            used_hints: self.used_hints,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn scan(&self) -> Option<&ScanRecord> {
        self.scan.as_ref()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Correct player answers in the current game.
    pub fn correct_player_answers(&self) -> u32 {
        self.correct_player_answers
    }

    pub fn player_score(&self) -> ScoreTally {
        self.player
    }

    pub fn ai_score(&self) -> ScoreTally {
        self.ai
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Time left in the running round; full duration before it starts.
    pub fn remaining_ms(&self) -> u64 {
        match &self.state {
            RoundState::Running { remaining_ms, .. } | RoundState::HintShown { remaining_ms, .. } => {
                *remaining_ms
            }
            RoundState::Resolved(outcome) => outcome.remaining_ms,
            _ => self.settings.round_duration_ms,
        }
    }

    pub fn timer_color(&self) -> TimerColor {
        TimerColor::for_remaining(self.remaining_ms())
    }

    pub fn hint_center(&self) -> Option<Point> {
        match &self.state {
            RoundState::HintShown { hint_center, .. } => Some(*hint_center),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RoundState::Loading { .. })
    }

    pub fn is_in_round(&self) -> bool {
        matches!(
            self.state,
            RoundState::Running { .. } | RoundState::HintShown { .. }
        )
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, RoundState::GameEnded(_))
    }

    fn accepts(&self, ticket: RoundTicket) -> bool {
        ticket.round_id == self.round_id
            && matches!(self.state, RoundState::Loading { scan_id } if scan_id == ticket.scan_id)
    }

    /// Cancel all timers and move to a new round id.
    fn invalidate(&mut self) {
        self.timers.cancel_all();
        self.round_id += 1;
    }

    fn hint_center_for_scan(&mut self) -> Point {
        let center = match &self.scan {
            Some(scan) => scan.truth.center(),
            None => return Point::new(0.0, 0.0),
        };
        Point::new(
            random_around(&mut self.rng, center.x, HINT_RANGE),
            random_around(&mut self.rng, center.y, HINT_RANGE),
        )
    }

    fn resolve(&mut self, click: Option<Point>) -> Vec<RoundEvent> {
        let (remaining_ms, hint_center) = match &self.state {
            RoundState::Running { remaining_ms, .. } => (*remaining_ms, None),
            RoundState::HintShown {
                remaining_ms,
                hint_center,
                ..
            } => (*remaining_ms, Some(*hint_center)),
            _ => return Vec::new(),
        };
        let Some(scan) = &self.scan else {
            return Vec::new();
        };

        self.timers.cancel_all();

        let outcome = evaluate_round(
            scan.id,
            &scan.truth,
            &scan.predicted,
            click,
            remaining_ms,
            hint_center,
            &self.settings,
        );

        self.player.add_round(outcome.player_score);
        self.ai.add_round(outcome.ai_score);
        self.rounds_played += 1;
        if outcome.player_correct {
            self.correct_player_answers += 1;
        }
        if outcome.ai_correct {
            self.correct_ai_answers += 1;
        }
        self.used_hints |= outcome.used_hint;

        log::info!(
            "Round {} resolved: player {} (+{}), AI {} (+{})",
            self.round_id,
            if outcome.player_correct { "correct" } else { "wrong" },
            outcome.player_score,
            if outcome.ai_correct { "correct" } else { "wrong" },
            outcome.ai_score
        );

        self.last_outcome = Some(outcome.clone());
        self.state = RoundState::Resolved(outcome.clone());
        let mut events = vec![RoundEvent::Resolved(outcome)];

        if self.mode == GameMode::Competitive && self.rounds_played >= self.settings.rounds_number {
            let summary = self.summary();
            log::info!("Game ended after {} rounds", self.rounds_played);
            self.state = RoundState::GameEnded(summary.clone());
            events.push(RoundEvent::GameEnded(summary));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Rectangle;

    fn scan(id: u32) -> ScanRecord {
        ScanRecord {
            id,
            image_path: format!("images/easy/{}.png", id),
            truth: Rectangle::new(10.0, 10.0, 20.0, 20.0).unwrap(),
            predicted: Rectangle::new(15.0, 15.0, 25.0, 25.0).unwrap(),
        }
    }

    fn controller(mode: GameMode) -> RoundController {
        RoundController::with_rng(GameSettings::default(), mode, StdRng::seed_from_u64(42))
    }

    fn running(ctrl: &mut RoundController, id: u32, now: u64) {
        let ticket = ctrl.begin_round(id).unwrap();
        assert!(ctrl.scan_loaded(ticket, scan(id), now));
    }

    #[test]
    fn test_click_resolves_round() {
        let mut ctrl = controller(GameMode::Casual);
        running(&mut ctrl, 1, 0);

        ctrl.advance(2500);
        assert_eq!(ctrl.remaining_ms(), 7500);

        let events = ctrl.handle_click(Point::new(15.0, 15.0));
        let RoundEvent::Resolved(outcome) = &events[0] else {
            panic!("expected resolution, got {:?}", events);
        };
        assert!(outcome.player_correct);
        assert!(!outcome.ai_correct);
        assert_eq!(outcome.player_score, 150);
        assert_eq!(ctrl.player_score(), ScoreTally { total: 150, round: 150 });
        assert_eq!(ctrl.ai_score().total, 0);
        assert!(!ctrl.has_pending_timers());
    }

    #[test]
    fn test_wrong_click() {
        let mut ctrl = controller(GameMode::Casual);
        running(&mut ctrl, 1, 0);
        let events = ctrl.handle_click(Point::new(0.0, 0.0));
        assert!(matches!(&events[0], RoundEvent::Resolved(o) if !o.player_correct && o.player_score == 0));
    }

    #[test]
    fn test_correct_answers_counted_per_game() {
        let mut ctrl = controller(GameMode::Casual);
        running(&mut ctrl, 1, 0);
        ctrl.handle_click(Point::new(15.0, 15.0));
        running(&mut ctrl, 2, 20_000);
        ctrl.handle_click(Point::new(0.0, 0.0));
        running(&mut ctrl, 3, 40_000);
        ctrl.handle_click(Point::new(12.0, 18.0));
        assert_eq!(ctrl.correct_player_answers(), 2);

        ctrl.start_game();
        assert_eq!(ctrl.correct_player_answers(), 0);
    }

    #[test]
    fn test_clicks_ignored_outside_round() {
        let mut ctrl = controller(GameMode::Casual);
        assert!(ctrl.handle_click(Point::new(15.0, 15.0)).is_empty());

        running(&mut ctrl, 1, 0);
        assert_eq!(ctrl.handle_click(Point::new(15.0, 15.0)).len(), 1);
        // Second click on a resolved round
        assert!(ctrl.handle_click(Point::new(15.0, 15.0)).is_empty());
        assert_eq!(ctrl.rounds_played(), 1);
    }

    #[test]
    fn test_hint_then_timeout() {
        let mut ctrl = controller(GameMode::Casual);
        running(&mut ctrl, 1, 1_000);

        let events = ctrl.advance(6_000);
        let hint = events
            .iter()
            .find_map(|e| match e {
                RoundEvent::HintRevealed { center } => Some(*center),
                _ => None,
            })
            .expect("hint should be revealed");
        assert!((hint.x - 15.0).abs() <= HINT_RANGE);
        assert!(matches!(ctrl.state(), RoundState::HintShown { .. }));
        assert_eq!(ctrl.timer_color(), TimerColor::Warning);

        let events = ctrl.advance(11_000);
        let outcome = events
            .iter()
            .find_map(|e| match e {
                RoundEvent::Resolved(o) => Some(o.clone()),
                _ => None,
            })
            .expect("round should time out");
        assert!(outcome.click.is_none());
        assert!(!outcome.player_correct);
        assert!(outcome.used_hint);
        assert_eq!(outcome.remaining_ms, 0);
        assert!(ctrl.advance(20_000).is_empty());
    }

    #[test]
    fn test_timer_colors() {
        assert_eq!(TimerColor::for_remaining(10_000), TimerColor::Normal);
        assert_eq!(TimerColor::for_remaining(5_001), TimerColor::Normal);
        assert_eq!(TimerColor::for_remaining(5_000), TimerColor::Warning);
        assert_eq!(TimerColor::for_remaining(2_000), TimerColor::Critical);
        assert_eq!(TimerColor::for_remaining(0), TimerColor::Critical);
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let mut ctrl = controller(GameMode::Casual);
        let first = ctrl.begin_round(1).unwrap();
        let second = ctrl.begin_round(2).unwrap();

        assert!(!ctrl.scan_loaded(first, scan(1), 0));
        assert!(ctrl.is_loading());
        assert!(!ctrl.scan_failed(first));

        assert!(ctrl.scan_loaded(second, scan(2), 0));
        assert_eq!(ctrl.scan().map(|s| s.id), Some(2));
    }

    #[test]
    fn test_new_round_cancels_old_timers() {
        let mut ctrl = controller(GameMode::Casual);
        running(&mut ctrl, 1, 0);
        let ticket = ctrl.begin_round(2).unwrap();
        // The first round's timeout would have fired here
        assert!(ctrl.advance(50_000).is_empty());
        assert!(ctrl.is_loading());
        assert!(ctrl.scan_failed(ticket));
        assert_eq!(ctrl.state(), &RoundState::NotStarted);
    }

    #[test]
    fn test_teardown_invalidates_pending_fetch() {
        let mut ctrl = controller(GameMode::Casual);
        let ticket = ctrl.begin_round(1).unwrap();
        ctrl.teardown();
        assert!(!ctrl.scan_loaded(ticket, scan(1), 0));
        assert_eq!(ctrl.state(), &RoundState::NotStarted);
    }

    #[test]
    fn test_competitive_game_ends() {
        let settings = GameSettings {
            rounds_number: 2,
            ..Default::default()
        };
        let mut ctrl = RoundController::with_rng(settings, GameMode::Competitive, StdRng::seed_from_u64(1));
        running(&mut ctrl, 1, 0);
        ctrl.handle_click(Point::new(15.0, 15.0));
        running(&mut ctrl, 2, 20_000);
        let events = ctrl.handle_click(Point::new(0.0, 0.0));

        assert_eq!(events.len(), 2);
        let RoundEvent::GameEnded(summary) = &events[1] else {
            panic!("expected game end");
        };
        assert_eq!(summary.rounds_played, 2);
        assert_eq!(summary.correct_player_answers, 1);
        assert_eq!(summary.player_score, 200);
        assert_eq!(summary.winner(), Winner::Player);
        assert!(matches!(ctrl.begin_round(3), Err(Error::GameOver)));

        ctrl.start_game();
        assert_eq!(ctrl.player_score().total, 0);
        assert!(ctrl.begin_round(3).is_ok());
    }

    #[test]
    fn test_score_record() {
        let mut ctrl = controller(GameMode::Casual);
        running(&mut ctrl, 1, 0);
        ctrl.handle_click(Point::new(15.0, 15.0));
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let record = ctrl.score_record("ana", date);
        assert_eq!(record.score, 200);
        assert_eq!(record.month, Month::Oct);
        assert_eq!(record.day, 19);
        assert_eq!(record.year, 2026);
        assert!(!record.used_hints);
    }
}
