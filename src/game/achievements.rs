// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Achievements.
//!
//! Rules are pure functions over round outcomes and game summaries that
//! return candidate achievements; [`unlock_achievement`] persists them and
//! tells the player the first time only.

use super::round::{GameSummary, Winner};
use super::scoring::RoundOutcome;
use crate::error::Result;
use crate::io::storage::{KeyValueStorage, PersistedState};
use crate::models::scan::GameMode;
use crate::notifications::{NoticeLevel, Notify};

/// Points needed in one competitive run for [`Achievement::CompetitivePointsRun`].
pub const COMPETITIVE_POINTS_TARGET: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Achievement {
    FirstCorrect,
    FirstCorrectWithoutHint,
    FirstCasualWin,
    FirstCompetitiveWin,
    FiveCorrectSameRunCasual,
    FiveCorrectSameRunCompetitive,
    CompetitivePointsRun,
    AllCorrectCompetitive,
    FastAnswer,
    SlowAnswer,
    TwentyCorrectSameRunCasual,
    FiftyCorrectSameRunCasual,
}

impl Achievement {
    pub const ALL: [Achievement; 12] = [
        Achievement::FirstCorrect,
        Achievement::FirstCorrectWithoutHint,
        Achievement::FirstCasualWin,
        Achievement::FirstCompetitiveWin,
        Achievement::FiveCorrectSameRunCasual,
        Achievement::FiveCorrectSameRunCompetitive,
        Achievement::CompetitivePointsRun,
        Achievement::AllCorrectCompetitive,
        Achievement::FastAnswer,
        Achievement::SlowAnswer,
        Achievement::TwentyCorrectSameRunCasual,
        Achievement::FiftyCorrectSameRunCasual,
    ];

    /// Storage key of the unlock flag.
    pub fn key(&self) -> &'static str {
        match self {
            Achievement::FirstCorrect => "firstCorrect",
            Achievement::FirstCorrectWithoutHint => "firstCorrectWithoutHint",
            Achievement::FirstCasualWin => "firstCasualWin",
            Achievement::FirstCompetitiveWin => "firstCompetitiveWin",
            Achievement::FiveCorrectSameRunCasual => "fiveCorrectSameRunCasual",
            Achievement::FiveCorrectSameRunCompetitive => "fiveCorrectSameRunCompetitive",
            Achievement::CompetitivePointsRun => "competitivePointsRun",
            Achievement::AllCorrectCompetitive => "allCorrectCompetitive",
            Achievement::FastAnswer => "fastAnswer",
            Achievement::SlowAnswer => "slowAnswer",
            Achievement::TwentyCorrectSameRunCasual => "twentyCorrectSameRunCasual",
            Achievement::FiftyCorrectSameRunCasual => "fiftyCorrectSameRunCasual",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstCorrect => "First Step",
            Achievement::FirstCorrectWithoutHint => "Independent Spotter",
            Achievement::FirstCasualWin => "Casually Winning",
            Achievement::FirstCompetitiveWin => "Competitive Winner",
            Achievement::FiveCorrectSameRunCasual => "Practice makes perfect",
            Achievement::FiveCorrectSameRunCompetitive => "Master Spotter",
            Achievement::CompetitivePointsRun => "IT'S OVER 1000!!!",
            Achievement::AllCorrectCompetitive => "Perfectionist",
            Achievement::FastAnswer => "The flash!",
            Achievement::SlowAnswer => "Nerves of steel",
            Achievement::TwentyCorrectSameRunCasual => "Going the distance",
            Achievement::FiftyCorrectSameRunCasual => "Still going?!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstCorrect => {
                "Congratulations! You have spotted your first lesion. How many more can you spot?"
            }
            Achievement::FirstCorrectWithoutHint => {
                "Getting better, eh? You have spotted your first lesion without the help of a hint."
            }
            Achievement::FirstCasualWin => {
                "Congratulations! You have won your first casual game. How about a new challenge?"
            }
            Achievement::FirstCompetitiveWin => {
                "Who said machines have outsmarted humans? You have beaten the AI in a race against time!"
            }
            Achievement::FiveCorrectSameRunCasual => {
                "You are getting the hang of it! You have spotted five lesions in the same casual run."
            }
            Achievement::FiveCorrectSameRunCompetitive => {
                "An impressive run! You have spotted five lesions in the same competitive run."
            }
            Achievement::CompetitivePointsRun => {
                "1000 points?! You really have an eye for spotting lesions!"
            }
            Achievement::AllCorrectCompetitive => {
                "You got them all right! Have you considered a career in medicine?"
            }
            Achievement::FastAnswer => {
                "You spotted a lesion in less than 2 seconds! Are you even human?"
            }
            Achievement::SlowAnswer => {
                "You operate well under difficult circumstances. You spotted a lesion with less than 0.5 seconds remaining."
            }
            Achievement::TwentyCorrectSameRunCasual => "20 correct answers? You are spot-on!",
            Achievement::FiftyCorrectSameRunCasual => {
                "50 correct answers? You really put the spot in spot-the-lesion!"
            }
        }
    }
}

/// Unlock `achievement`, notifying only if it was not unlocked before.
///
/// Returns whether this call unlocked it.
pub fn unlock_achievement<L, S>(
    state: &mut PersistedState<L, S>,
    achievement: Achievement,
    notifier: &mut dyn Notify,
) -> Result<bool>
where
    L: KeyValueStorage,
    S: KeyValueStorage,
{
    if state.is_flag_set(achievement.key()) {
        return Ok(false);
    }

    state.set_flag(achievement.key())?;
    log::info!("Unlocked achievement {}", achievement.key());
    notifier.notify(
        format!("Achievement unlocked: {}", achievement.title()),
        NoticeLevel::Achievement,
    );
    Ok(true)
}

pub fn is_unlocked<L: KeyValueStorage, S: KeyValueStorage>(
    state: &PersistedState<L, S>,
    achievement: Achievement,
) -> bool {
    state.is_flag_set(achievement.key())
}

/// Candidates earned by a resolved round.
///
/// `correct_in_run` counts correct answers in the current game, this round
/// included.
pub fn round_achievements(
    outcome: &RoundOutcome,
    mode: GameMode,
    correct_in_run: u32,
    round_duration_ms: u64,
) -> Vec<Achievement> {
    let mut earned = Vec::new();
    if !outcome.player_correct {
        return earned;
    }

    earned.push(Achievement::FirstCorrect);
    if !outcome.used_hint {
        earned.push(Achievement::FirstCorrectWithoutHint);
    }

    let elapsed = round_duration_ms.saturating_sub(outcome.remaining_ms);
    if elapsed < 2000 {
        earned.push(Achievement::FastAnswer);
    }
    if outcome.remaining_ms < 500 {
        earned.push(Achievement::SlowAnswer);
    }

    match mode {
        GameMode::Casual => {
            if correct_in_run == 5 {
                earned.push(Achievement::FiveCorrectSameRunCasual);
            }
            if correct_in_run == 20 {
                earned.push(Achievement::TwentyCorrectSameRunCasual);
            }
            if correct_in_run == 50 {
                earned.push(Achievement::FiftyCorrectSameRunCasual);
            }
        }
        GameMode::Competitive => {
            if correct_in_run == 5 {
                earned.push(Achievement::FiveCorrectSameRunCompetitive);
            }
        }
    }

    earned
}

/// Candidates earned when a game ends.
pub fn game_achievements(summary: &GameSummary) -> Vec<Achievement> {
    let mut earned = Vec::new();
    let won = summary.winner() == Winner::Player;

    match summary.mode {
        GameMode::Casual => {
            if won && summary.rounds_played > 0 {
                earned.push(Achievement::FirstCasualWin);
            }
        }
        GameMode::Competitive => {
            if won {
                earned.push(Achievement::FirstCompetitiveWin);
            }
            if summary.player_score >= COMPETITIVE_POINTS_TARGET {
                earned.push(Achievement::CompetitivePointsRun);
            }
            if summary.rounds_played > 0 && summary.correct_player_answers == summary.rounds_played {
                earned.push(Achievement::AllCorrectCompetitive);
            }
        }
    }

    earned
}
