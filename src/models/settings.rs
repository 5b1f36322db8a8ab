// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tunable game parameters edited from the admin console.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Game parameters with named, typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Points the AI earns for a correct prediction
    pub ai_score_multiplier: u32,
    /// Length of the end-of-round reveal animation
    pub animation_duration_ms: u64,
    /// Stroke width of the hint circle (canonical units)
    pub hint_line_width: f32,
    /// Radius of the hint circle (canonical units)
    pub hint_radius: f32,
    /// Time into the round at which the hint appears
    pub hint_time_ms: u64,
    /// Length of a round
    pub round_duration_ms: u64,
    /// Rounds in a competitive game
    pub rounds_number: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            ai_score_multiplier: 72,
            animation_duration_ms: 3000,
            hint_line_width: 2.0,
            hint_radius: 100.0,
            hint_time_ms: 5000,
            round_duration_ms: 10000,
            rounds_number: 10,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<()> {
        if self.rounds_number < 1 {
            return Err(Error::InvalidSettings(
                "number of rounds must be at least 1".to_string(),
            ));
        }
        if self.round_duration_ms == 0 {
            return Err(Error::InvalidSettings(
                "round duration must be positive".to_string(),
            ));
        }
        if self.hint_time_ms > self.round_duration_ms {
            return Err(Error::InvalidSettings(format!(
                "hint time ({} ms) is after the end of the round ({} ms)",
                self.hint_time_ms, self.round_duration_ms
            )));
        }
        if self.hint_radius < 0.0 || self.hint_line_width < 0.0 {
            return Err(Error::InvalidSettings(
                "hint sizes must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let settings = GameSettings {
            rounds_number: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GameSettings {
            hint_time_ms: 20000,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: GameSettings = serde_yaml::from_str("rounds_number: 5\n").unwrap();
        assert_eq!(settings.rounds_number, 5);
        assert_eq!(settings.round_duration_ms, 10000);
    }
}
