// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Score tallies, leaderboard records and per-scan statistics.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Running score of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTally {
    /// Accumulated over the session
    pub total: u32,
    /// Delta earned in the last resolved round
    pub round: u32,
}

impl ScoreTally {
    pub fn add_round(&mut self, delta: u32) {
        self.total += delta;
        self.round = delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Three-letter month names as stored in score records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Month from a zero-based index (0 = January).
    pub fn from_index(index: u32) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidMonth(index))
    }

    pub fn of(date: NaiveDate) -> Self {
        // month0() is always within 0..12
        Self::from_index(date.month0()).unwrap_or(Month::Jan)
    }
}

/// A submitted game result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub user: String,
    pub score: u32,
    pub ai_score: u32,
    pub correct_player_answers: u32,
    pub correct_ai_answers: u32,
    pub day: u32,
    pub month: Month,
    pub year: i32,
    #[serde(rename = "usedHints", default)]
    pub used_hints: bool,
}

impl ScoreRecord {
    pub fn is_on_day(&self, date: NaiveDate) -> bool {
        self.is_in_month(date) && self.day == date.day()
    }

    pub fn is_in_month(&self, date: NaiveDate) -> bool {
        self.year == date.year() && self.month == Month::of(date)
    }
}

/// One heat-map point: a canonical click position and how often it was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickCount {
    pub x: i32,
    pub y: i32,
    pub click_count: u32,
}

/// Aggregated answers for a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStats {
    pub clicks: Vec<ClickCount>,
    pub correct_clicks: u32,
    pub wrong_clicks: u32,
    pub hint_count: u32,
}

/// A player's answer on a scan, fed into [`ImageStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageClick {
    /// Canonical click position, `None` when the round timed out
    pub position: Option<(i32, i32)>,
    pub correct: bool,
    pub used_hint: bool,
}

impl ImageStats {
    pub fn record(&mut self, click: ImageClick) {
        if click.correct {
            self.correct_clicks += 1;
        } else {
            self.wrong_clicks += 1;
        }
        if click.used_hint {
            self.hint_count += 1;
        }
        if let Some((x, y)) = click.position {
            match self.clicks.iter_mut().find(|c| c.x == x && c.y == y) {
                Some(existing) => existing.click_count += 1,
                None => self.clicks.push(ClickCount { x, y, click_count: 1 }),
            }
        }
    }

    pub fn answers(&self) -> u32 {
        self.correct_clicks + self.wrong_clicks
    }

    /// Fraction of correct answers, 0 when nobody played the scan yet.
    pub fn correct_ratio(&self) -> f32 {
        match self.answers() {
            0 => 0.0,
            n => self.correct_clicks as f32 / n as f32,
        }
    }

    pub fn hint_ratio(&self) -> f32 {
        match self.answers() {
            0 => 0.0,
            n => self.hint_count as f32 / n as f32,
        }
    }
}
