// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scan records, game modes and difficulties.

use super::annotation::{Annotation, Rectangle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a game is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Endless rounds, the player leaves when they like.
    #[default]
    Casual,
    /// A fixed number of rounds against the AI.
    Competitive,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Casual, GameMode::Competitive];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Casual => "casual",
            GameMode::Competitive => "competitive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "casual" => Some(GameMode::Casual),
            "competitive" => Some(GameMode::Competitive),
            _ => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan difficulty, which also selects the asset sub folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Number of scans available for this difficulty.
    pub fn files_number(&self) -> u32 {
        match self {
            Difficulty::Easy => 1252,
            Difficulty::Medium => 2202,
            Difficulty::Hard => 1269,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scan as played in a round. Immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub id: u32,
    pub image_path: String,
    pub truth: Rectangle,
    pub predicted: Rectangle,
}

impl ScanRecord {
    pub fn new(id: u32, image_path: String, annotation: Annotation) -> Self {
        Self {
            id,
            image_path,
            truth: annotation.truth,
            predicted: annotation.predicted,
        }
    }
}
