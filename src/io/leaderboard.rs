// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Score persistence, leaderboard ranking and game statistics.

use crate::error::{Error, Result};
use crate::game::round::Winner;
use crate::models::scan::{Difficulty, GameMode};
use crate::models::score::{ImageClick, ImageStats, ScoreRecord};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Backend that keeps submitted scores and per-scan click statistics.
pub trait ScoreStore: Send {
    fn submit(&mut self, mode: GameMode, record: ScoreRecord) -> Result<()>;
    fn scores(&self, mode: GameMode) -> Result<Vec<ScoreRecord>>;
    fn record_click(&mut self, difficulty: Difficulty, scan_id: u32, click: ImageClick) -> Result<()>;
    fn image_stats(&self, difficulty: Difficulty, scan_id: u32) -> Result<ImageStats>;
}

/// Store shared between the UI and background jobs.
pub type SharedScoreStore = Arc<Mutex<dyn ScoreStore>>;

pub fn shared(store: impl ScoreStore + 'static) -> SharedScoreStore {
    Arc::new(Mutex::new(store))
}

pub fn lock_store(store: &SharedScoreStore) -> Result<MutexGuard<'_, dyn ScoreStore + 'static>> {
    store
        .lock()
        .map_err(|_| Error::store("store/aborted", "score store lock poisoned"))
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<GameMode, Vec<ScoreRecord>>,
    stats: HashMap<(Difficulty, u32), ImageStats>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn submit(&mut self, mode: GameMode, record: ScoreRecord) -> Result<()> {
        self.scores.entry(mode).or_default().push(record);
        Ok(())
    }

    fn scores(&self, mode: GameMode) -> Result<Vec<ScoreRecord>> {
        Ok(self.scores.get(&mode).cloned().unwrap_or_default())
    }

    fn record_click(&mut self, difficulty: Difficulty, scan_id: u32, click: ImageClick) -> Result<()> {
        self.stats.entry((difficulty, scan_id)).or_default().record(click);
        Ok(())
    }

    fn image_stats(&self, difficulty: Difficulty, scan_id: u32) -> Result<ImageStats> {
        Ok(self
            .stats
            .get(&(difficulty, scan_id))
            .cloned()
            .unwrap_or_default())
    }
}

/// Store writing one JSON file per game mode and per difficulty under a
/// data directory:
///
/// ```text
/// <root>/scores/casual.json
/// <root>/scores/competitive.json
/// <root>/images/easy.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    root: PathBuf,
}

impl JsonScoreStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scores_path(&self, mode: GameMode) -> PathBuf {
        self.root.join("scores").join(format!("{}.json", mode.as_str()))
    }

    fn stats_path(&self, difficulty: Difficulty) -> PathBuf {
        self.root
            .join("images")
            .join(format!("{}.json", difficulty.as_str()))
    }
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

impl ScoreStore for JsonScoreStore {
    fn submit(&mut self, mode: GameMode, record: ScoreRecord) -> Result<()> {
        let path = self.scores_path(mode);
        let mut records: Vec<ScoreRecord> = read_json_or_default(&path)?;
        log::info!("Submitting {} score {} for {}", mode, record.score, record.user);
        records.push(record);
        write_json(&path, &records)
    }

    fn scores(&self, mode: GameMode) -> Result<Vec<ScoreRecord>> {
        read_json_or_default(&self.scores_path(mode))
    }

    fn record_click(&mut self, difficulty: Difficulty, scan_id: u32, click: ImageClick) -> Result<()> {
        let path = self.stats_path(difficulty);
        let mut stats: BTreeMap<u32, ImageStats> = read_json_or_default(&path)?;
        stats.entry(scan_id).or_default().record(click);
        write_json(&path, &stats)
    }

    fn image_stats(&self, difficulty: Difficulty, scan_id: u32) -> Result<ImageStats> {
        let mut stats: BTreeMap<u32, ImageStats> = read_json_or_default(&self.stats_path(difficulty))?;
        Ok(stats.remove(&scan_id).unwrap_or_default())
    }
}

/// Leaderboard time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    Daily,
    Monthly,
    AllTime,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 3] = [TimeFilter::Daily, TimeFilter::Monthly, TimeFilter::AllTime];

    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::Daily => "Daily",
            TimeFilter::Monthly => "Monthly",
            TimeFilter::AllTime => "All Time",
        }
    }

    fn accepts(&self, record: &ScoreRecord, today: NaiveDate) -> bool {
        match self {
            TimeFilter::Daily => record.is_on_day(today),
            TimeFilter::Monthly => record.is_in_month(today),
            TimeFilter::AllTime => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: String,
    pub score: u32,
}

/// Rank the records inside `filter`, best score first, one entry per user.
pub fn rank_scores(records: &[ScoreRecord], filter: TimeFilter, today: NaiveDate) -> Vec<LeaderboardEntry> {
    let mut matching: Vec<&ScoreRecord> = records
        .iter()
        .filter(|record| filter.accepts(record, today))
        .collect();
    matching.sort_by(|a, b| b.score.cmp(&a.score));

    let mut seen = HashSet::new();
    matching
        .into_iter()
        .filter(|record| seen.insert(record.user.as_str()))
        .enumerate()
        .map(|(ix, record)| LeaderboardEntry {
            rank: ix + 1,
            user: record.user.clone(),
            score: record.score,
        })
        .collect()
}

/// Row colour for a leaderboard rank.
pub fn color_by_rank(rank: usize) -> egui::Color32 {
    match rank {
        1 => egui::Color32::from_rgb(0xff, 0xcc, 0x00),
        2 => egui::Color32::from_rgb(0xa9, 0xa9, 0xa9),
        3 => egui::Color32::from_rgb(0xcd, 0x7f, 0x32),
        _ => egui::Color32::from_rgb(0xc4, 0xdf, 0xe6),
    }
}

/// Outcome counts over many games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreStatistics {
    pub human_wins: u32,
    pub ai_wins: u32,
    pub draws: u32,
    pub with_hints: u32,
    pub without_hints: u32,
}

impl ScoreStatistics {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ScoreRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            match winner_of(record) {
                Winner::Player => stats.human_wins += 1,
                Winner::Ai => stats.ai_wins += 1,
                Winner::Draw => stats.draws += 1,
            }
            if record.used_hints {
                stats.with_hints += 1;
            } else {
                stats.without_hints += 1;
            }
        }
        stats
    }

    pub fn games(&self) -> u32 {
        self.human_wins + self.ai_wins + self.draws
    }
}

fn winner_of(record: &ScoreRecord) -> Winner {
    match record.score.cmp(&record.ai_score) {
        std::cmp::Ordering::Greater => Winner::Player,
        std::cmp::Ordering::Less => Winner::Ai,
        std::cmp::Ordering::Equal => Winner::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::score::Month;

    fn record(user: &str, score: u32, ai_score: u32, day: u32, month: Month, year: i32) -> ScoreRecord {
        ScoreRecord {
            user: user.to_string(),
            score,
            ai_score,
            correct_player_answers: 0,
            correct_ai_answers: 0,
            day,
            month,
            year,
            used_hints: false,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_rank_filters_and_dedups() {
        let records = vec![
            record("ana", 300, 0, 19, Month::Oct, 2026),
            record("bob", 500, 0, 19, Month::Oct, 2026),
            record("ana", 700, 0, 3, Month::Oct, 2026),
            record("cy", 900, 0, 19, Month::Oct, 2025),
        ];

        let daily = rank_scores(&records, TimeFilter::Daily, today());
        assert_eq!(
            daily,
            vec![
                LeaderboardEntry { rank: 1, user: "bob".into(), score: 500 },
                LeaderboardEntry { rank: 2, user: "ana".into(), score: 300 },
            ]
        );

        let monthly = rank_scores(&records, TimeFilter::Monthly, today());
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].user, "ana");
        assert_eq!(monthly[0].score, 700);

        let all = rank_scores(&records, TimeFilter::AllTime, today());
        assert_eq!(all.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(all[0].user, "cy");
    }

    #[test]
    fn test_rank_ties_keep_submission_order() {
        let records = vec![
            record("dee", 400, 0, 19, Month::Oct, 2026),
            record("bob", 500, 0, 19, Month::Oct, 2026),
            record("ana", 400, 0, 19, Month::Oct, 2026),
            record("dee", 400, 0, 19, Month::Oct, 2026),
            record("eve", 500, 0, 19, Month::Oct, 2026),
        ];

        let ranked = rank_scores(&records, TimeFilter::AllTime, today());
        assert_eq!(
            ranked,
            vec![
                LeaderboardEntry { rank: 1, user: "bob".into(), score: 500 },
                LeaderboardEntry { rank: 2, user: "eve".into(), score: 500 },
                LeaderboardEntry { rank: 3, user: "dee".into(), score: 400 },
                LeaderboardEntry { rank: 4, user: "ana".into(), score: 400 },
            ]
        );
    }

    #[test]
    fn test_rank_colors() {
        assert_eq!(color_by_rank(1), egui::Color32::from_rgb(0xff, 0xcc, 0x00));
        assert_eq!(color_by_rank(4), color_by_rank(40));
    }

    #[test]
    fn test_statistics() {
        let mut hinted = record("a", 10, 10, 1, Month::Jan, 2026);
        hinted.used_hints = true;
        let records = vec![
            record("a", 100, 72, 1, Month::Jan, 2026),
            record("b", 0, 72, 1, Month::Jan, 2026),
            hinted,
        ];
        let stats = ScoreStatistics::from_records(&records);
        assert_eq!(stats.human_wins, 1);
        assert_eq!(stats.ai_wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.with_hints, 1);
        assert_eq!(stats.without_hints, 2);
        assert_eq!(stats.games(), 3);
    }

    #[test]
    fn test_json_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonScoreStore::new(dir.path());

        assert!(store.scores(GameMode::Casual).unwrap().is_empty());
        store
            .submit(GameMode::Competitive, record("ana", 900, 72, 19, Month::Oct, 2026))
            .unwrap();
        assert_eq!(store.scores(GameMode::Competitive).unwrap().len(), 1);
        assert!(store.scores(GameMode::Casual).unwrap().is_empty());

        let click = ImageClick {
            position: Some((100, 120)),
            correct: true,
            used_hint: false,
        };
        store.record_click(Difficulty::Hard, 7, click).unwrap();
        store.record_click(Difficulty::Hard, 7, click).unwrap();
        let stats = store.image_stats(Difficulty::Hard, 7).unwrap();
        assert_eq!(stats.correct_clicks, 2);
        assert_eq!(stats.clicks[0].click_count, 2);
        assert_eq!(store.image_stats(Difficulty::Hard, 8).unwrap(), ImageStats::default());
    }

    #[test]
    fn test_shared_store_across_threads() {
        let store = shared(MemoryScoreStore::new());
        let worker = store.clone();
        std::thread::spawn(move || {
            lock_store(&worker)
                .unwrap()
                .submit(GameMode::Casual, record("ana", 5, 0, 1, Month::Jan, 2026))
                .unwrap();
        })
        .join()
        .unwrap();
        assert_eq!(lock_store(&store).unwrap().scores(GameMode::Casual).unwrap().len(), 1);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryScoreStore::new();
        store
            .submit(GameMode::Casual, record("ana", 1, 0, 1, Month::Jan, 2026))
            .unwrap();
        assert_eq!(store.scores(GameMode::Casual).unwrap().len(), 1);
        store
            .record_click(
                Difficulty::Easy,
                1,
                ImageClick {
                    position: None,
                    correct: false,
                    used_hint: true,
                },
            )
            .unwrap();
        assert_eq!(store.image_stats(Difficulty::Easy, 1).unwrap().hint_count, 1);
    }
}
