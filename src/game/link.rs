// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Challenge links.
//!
//! A game can be opened from a link carrying
//! `?gameMode=casual|competitive&difficulty=easy|medium|hard&fileIds=[1,2,3]`.
//! Missing or malformed parameters fall back to casual, easy, and random play.

use crate::error::Result;
use crate::models::scan::{Difficulty, GameMode};
use url::Url;

/// Game parameters decoded from a link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameLink {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub file_ids: Option<Vec<u32>>,
}

pub fn game_mode_or_default(value: Option<&str>, default: GameMode) -> GameMode {
    value.and_then(GameMode::parse).unwrap_or(default)
}

pub fn difficulty_or_default(value: Option<&str>, default: Difficulty) -> Difficulty {
    value.and_then(Difficulty::parse).unwrap_or(default)
}

/// Decode a bracketed JSON array of ids, e.g. `[1,2,3]`.
pub fn file_ids_or_default(value: Option<&str>, default: Option<Vec<u32>>) -> Option<Vec<u32>> {
    let Some(value) = value else {
        return default;
    };
    if value.len() < 2 || !value.starts_with('[') || !value.ends_with(']') {
        return default;
    }

    match serde_json::from_str::<Vec<u32>>(value) {
        Ok(ids) => Some(ids),
        Err(e) => {
            log::warn!("Ignoring malformed file ids {:?}: {}", value, e);
            default
        }
    }
}

/// Parse a full link or a bare query string (with or without the leading `?`).
pub fn parse_game_link(input: &str) -> GameLink {
    let query = match Url::parse(input) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => input.trim_start_matches('?').to_string(),
    };

    let mut mode = None;
    let mut difficulty = None;
    let mut file_ids = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "gameMode" => mode = Some(value.into_owned()),
            "difficulty" => difficulty = Some(value.into_owned()),
            "fileIds" => file_ids = Some(value.into_owned()),
            _ => {}
        }
    }

    GameLink {
        mode: game_mode_or_default(mode.as_deref(), GameMode::Casual),
        difficulty: difficulty_or_default(difficulty.as_deref(), Difficulty::Easy),
        file_ids: file_ids_or_default(file_ids.as_deref(), None),
    }
}

/// Build a link that replays the given scans.
pub fn challenge_link(base: &str, mode: GameMode, difficulty: Difficulty, ids: &[u32]) -> Result<String> {
    let mut url = Url::parse(base)?;
    let ids = format!(
        "[{}]",
        ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
    );
    url.query_pairs_mut()
        .clear()
        .append_pair("gameMode", mode.as_str())
        .append_pair("difficulty", difficulty.as_str())
        .append_pair("fileIds", &ids);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_bogus_values() {
        assert_eq!(game_mode_or_default(Some("bogus"), GameMode::Casual), GameMode::Casual);
        assert_eq!(game_mode_or_default(None, GameMode::Competitive), GameMode::Competitive);
        assert_eq!(
            game_mode_or_default(Some("competitive"), GameMode::Casual),
            GameMode::Competitive
        );
        assert_eq!(difficulty_or_default(Some("bogus"), Difficulty::Easy), Difficulty::Easy);
        assert_eq!(difficulty_or_default(Some("hard"), Difficulty::Easy), Difficulty::Hard);
    }

    #[test]
    fn test_file_ids() {
        assert_eq!(file_ids_or_default(Some("[1,2]"), None), Some(vec![1, 2]));
        assert_eq!(file_ids_or_default(Some("[]"), None), Some(vec![]));
        assert_eq!(file_ids_or_default(Some("not-an-array"), None), None);
        assert_eq!(file_ids_or_default(Some("[1,x]"), None), None);
        assert_eq!(file_ids_or_default(Some("["), Some(vec![5])), Some(vec![5]));
        assert_eq!(file_ids_or_default(None, None), None);
    }

    #[test]
    fn test_parse_query_string() {
        let link = parse_game_link("?gameMode=competitive&difficulty=medium&fileIds=[1,2,3]");
        assert_eq!(link.mode, GameMode::Competitive);
        assert_eq!(link.difficulty, Difficulty::Medium);
        assert_eq!(link.file_ids, Some(vec![1, 2, 3]));

        let link = parse_game_link("gameMode=nope");
        assert_eq!(link, GameLink::default());
    }

    #[test]
    fn test_challenge_link_roundtrip() {
        let link = challenge_link(
            "https://example.org/spot-the-lesion/game",
            GameMode::Competitive,
            Difficulty::Hard,
            &[4, 8, 15],
        )
        .unwrap();
        let parsed = parse_game_link(&link);
        assert_eq!(parsed.mode, GameMode::Competitive);
        assert_eq!(parsed.difficulty, Difficulty::Hard);
        assert_eq!(parsed.file_ids, Some(vec![4, 8, 15]));
    }
}
