// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Round scoring.
//!
//! Decides whether the player and the AI found the lesion and how many points
//! each of them earns for the round.

use crate::models::annotation::{Point, Rectangle};
use crate::models::settings::GameSettings;

/// IoU above which the AI prediction counts as correct.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Points for a correct answer given with the full round time left.
pub const PLAYER_SCORE_MULTIPLIER: f64 = 100.0;

/// Ratio of the intersection area of two boxes over their union area.
///
/// Disjoint boxes give 0. Two identical zero-area boxes give 1.
pub fn intersection_over_union(a: &Rectangle, b: &Rectangle) -> f64 {
    let x_a = a.x1().max(b.x1());
    let x_b = a.x2().min(b.x2());
    let y_a = a.y1().max(b.y1());
    let y_b = a.y2().min(b.y2());

    let intersection = (x_b - x_a).max(0.0) * (y_b - y_a).max(0.0);
    let union = a.area() + b.area() - intersection;

    if union <= 0.0 {
        return if a == b { 1.0 } else { 0.0 };
    }

    intersection / union
}

pub fn is_ai_correct(truth: &Rectangle, predicted: &Rectangle, threshold: f64) -> bool {
    intersection_over_union(truth, predicted) > threshold
}

pub fn is_player_correct(point: Point, truth: &Rectangle) -> bool {
    truth.contains(point)
}

/// Player points for a correct answer: proportional to the time left,
/// doubled when the hint was never shown.
pub fn compute_round_score(remaining_ms: u64, round_duration_ms: u64, used_hint: bool) -> u32 {
    if round_duration_ms == 0 {
        return 0;
    }
    let fraction = remaining_ms.min(round_duration_ms) as f64 / round_duration_ms as f64;
    let base = (PLAYER_SCORE_MULTIPLIER * fraction).round() as u32;

    if used_hint {
        base
    } else {
        base * 2
    }
}

/// Everything decided when a round resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub scan_id: u32,
    /// Canonical click position, `None` on timeout
    pub click: Option<Point>,
    pub player_correct: bool,
    pub ai_correct: bool,
    pub iou: f64,
    pub remaining_ms: u64,
    pub used_hint: bool,
    pub hint_center: Option<Point>,
    pub player_score: u32,
    pub ai_score: u32,
}

/// Score one round.
pub fn evaluate_round(
    scan_id: u32,
    truth: &Rectangle,
    predicted: &Rectangle,
    click: Option<Point>,
    remaining_ms: u64,
    hint_center: Option<Point>,
    settings: &GameSettings,
) -> RoundOutcome {
    let used_hint = hint_center.is_some();
    let player_correct = click.is_some_and(|point| is_player_correct(point, truth));
    let iou = intersection_over_union(truth, predicted);
    let ai_correct = is_ai_correct(truth, predicted, DEFAULT_IOU_THRESHOLD);

    let player_score = if player_correct {
        compute_round_score(remaining_ms, settings.round_duration_ms, used_hint)
    } else {
        0
    };
    let ai_score = if ai_correct { settings.ai_score_multiplier } else { 0 };

    RoundOutcome {
        scan_id,
        click,
        player_correct,
        ai_correct,
        iou,
        remaining_ms,
        used_hint,
        hint_center,
        player_score,
        ai_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Rectangle {
        Rectangle::new(x1, y1, x2, y2).unwrap()
    }

    #[test]
    fn test_iou_identical_is_one() {
        for r in [rect(10.0, 10.0, 20.0, 20.0), rect(0.0, 0.0, 512.0, 3.0), rect(5.0, 5.0, 5.0, 5.0)] {
            assert_eq!(intersection_over_union(&r, &r), 1.0);
        }
    }

    #[test]
    fn test_iou_disjoint_is_zero() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 30.0, 30.0);
        assert_eq!(intersection_over_union(&a, &b), 0.0);
        // Touching edges share no area
        let c = rect(10.0, 0.0, 20.0, 10.0);
        assert_eq!(intersection_over_union(&a, &c), 0.0);
    }

    #[test]
    fn test_partial_overlap_ai_incorrect() {
        let truth = rect(10.0, 10.0, 20.0, 20.0);
        let predicted = rect(15.0, 15.0, 25.0, 25.0);
        let iou = intersection_over_union(&truth, &predicted);
        assert!((iou - 0.142857).abs() < 1e-4);
        assert!(!is_ai_correct(&truth, &predicted, DEFAULT_IOU_THRESHOLD));
    }

    #[test]
    fn test_player_click() {
        let truth = rect(10.0, 10.0, 20.0, 20.0);
        assert!(is_player_correct(Point::new(15.0, 15.0), &truth));
        assert!(!is_player_correct(Point::new(0.0, 0.0), &truth));
    }

    #[test]
    fn test_round_score() {
        assert_eq!(compute_round_score(10000, 10000, false), 200);
        assert_eq!(compute_round_score(7500, 10000, false), 150);
        assert_eq!(compute_round_score(4000, 10000, true), 40);
        assert_eq!(compute_round_score(0, 10000, true), 0);
        assert_eq!(compute_round_score(50, 0, false), 0);
    }

    #[test]
    fn test_evaluate_round_timeout() {
        let settings = GameSettings::default();
        let truth = rect(10.0, 10.0, 20.0, 20.0);
        let outcome = evaluate_round(3, &truth, &truth, None, 0, None, &settings);
        assert!(!outcome.player_correct);
        assert_eq!(outcome.player_score, 0);
        assert!(outcome.ai_correct);
        assert_eq!(outcome.ai_score, settings.ai_score_multiplier);
    }

    #[test]
    fn test_evaluate_round_with_hint() {
        let settings = GameSettings::default();
        let truth = rect(10.0, 10.0, 20.0, 20.0);
        let predicted = rect(100.0, 100.0, 120.0, 120.0);
        let outcome = evaluate_round(
            3,
            &truth,
            &predicted,
            Some(Point::new(12.0, 18.0)),
            3000,
            Some(Point::new(15.0, 15.0)),
            &settings,
        );
        assert!(outcome.player_correct);
        assert!(outcome.used_hint);
        assert_eq!(outcome.player_score, 30);
        assert!(!outcome.ai_correct);
        assert_eq!(outcome.ai_score, 0);
    }
}
