// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scan canvas.
//!
//! Everything is drawn through [`DrawSurface`] in canvas pixel coordinates,
//! with the origin at the top-left corner of the scan. Boxes and points come
//! in from the canonical 512x512 space and are scaled to the canvas width.

use crate::game::scoring::RoundOutcome;
use crate::models::annotation::{Point, Rectangle};
use crate::models::scan::ScanRecord;
use crate::models::settings::GameSettings;
use crate::util::geometry::{map_rectangle_to_canvas_scale, to_canvas_scale};
use egui::Color32;

pub const TRUTH_COLOR: Color32 = Color32::YELLOW;
pub const CORRECT_COLOR: Color32 = Color32::from_rgb(0x00, 0x80, 0x00);
pub const INCORRECT_COLOR: Color32 = Color32::RED;
pub const CLICK_COLOR: Color32 = Color32::from_rgb(0xff, 0xa5, 0x00);
pub const HINT_COLOR: Color32 = Color32::RED;
pub const ANIMATION_COLOR: Color32 = Color32::from_rgb(0x63, 0xa2, 0xab);

/// Line width of boxes, in canvas pixels.
const BOX_LINE_WIDTH: f32 = 3.0;

/// Half-size of the click cross, in canonical units.
const CROSS_SIZE: f64 = 5.0;

const ROUND_END_FONT_SIZE: f32 = 28.0;

/// 2D drawing target.
pub trait DrawSurface {
    /// Width and height in canvas pixels.
    fn size(&self) -> egui::Vec2;
    fn clear(&mut self);
    fn draw_base_image(&mut self);
    fn stroke_rect(&mut self, min: egui::Pos2, max: egui::Pos2, width: f32, color: Color32);
    fn stroke_line(&mut self, from: egui::Pos2, to: egui::Pos2, width: f32, color: Color32);
    fn stroke_circle(&mut self, center: egui::Pos2, radius: f32, width: f32, color: Color32);
    /// Text centred on `pos`, filled with `fill` and outlined with `outline`.
    fn stroked_text(
        &mut self,
        text: &str,
        pos: egui::Pos2,
        size: f32,
        outline_width: f32,
        outline: Color32,
        fill: Color32,
    );
}

fn pos(x: f64, y: f64) -> egui::Pos2 {
    egui::pos2(x as f32, y as f32)
}

/// Outline a canonical rectangle.
pub fn draw_rectangle(surface: &mut dyn DrawSurface, rect: &Rectangle, color: Color32, width: f32) {
    let scaled = map_rectangle_to_canvas_scale(surface.size().x as f64, rect);
    surface.stroke_rect(
        pos(scaled.x1(), scaled.y1()),
        pos(scaled.x2(), scaled.y2()),
        width,
        color,
    );
}

/// Draw an X centred on a canonical point.
pub fn draw_cross(surface: &mut dyn DrawSurface, center: Point, size: f64, color: Color32) {
    let w = surface.size().x as f64;
    let x = to_canvas_scale(w, center.x);
    let y = to_canvas_scale(w, center.y);
    let s = to_canvas_scale(w, size);

    surface.stroke_line(pos(x - s, y - s), pos(x + s, y + s), 2.0, color);
    surface.stroke_line(pos(x + s, y - s), pos(x - s, y + s), 2.0, color);
}

/// Draw a circle around a canonical point; radius and width are canonical too.
pub fn draw_circle(surface: &mut dyn DrawSurface, center: Point, radius: f64, width: f64, color: Color32) {
    let w = surface.size().x as f64;
    surface.stroke_circle(
        pos(to_canvas_scale(w, center.x), to_canvas_scale(w, center.y)),
        to_canvas_scale(w, radius) as f32,
        to_canvas_scale(w, width).max(1.0) as f32,
        color,
    );
}

pub fn draw_stroked_text(
    surface: &mut dyn DrawSurface,
    text: &str,
    at: egui::Pos2,
    outline_width: f32,
    outline: Color32,
    fill: Color32,
) {
    surface.stroked_text(text, at, ROUND_END_FONT_SIZE, outline_width, outline, fill);
}

/// Banner at the top of the canvas, a tenth of the way down.
pub fn draw_round_end_text(surface: &mut dyn DrawSurface, text: &str, color: Color32) {
    let size = surface.size();
    let at = egui::pos2((size.x / 2.0).round(), (size.y / 10.0).round());
    draw_stroked_text(surface, text, at, 3.0, Color32::WHITE, color);
}

/// Scan with the hint circle, while a round is running.
pub fn draw_running(surface: &mut dyn DrawSurface, hint: Option<Point>, settings: &GameSettings) {
    surface.clear();
    surface.draw_base_image();
    if let Some(center) = hint {
        draw_circle(
            surface,
            center,
            settings.hint_radius as f64,
            settings.hint_line_width as f64,
            HINT_COLOR,
        );
    }
}

/// The AI's scan sweep played between a click and the result, with the
/// player's answer marked in orange. `progress` runs from 0 to 1.
pub fn draw_ai_search(
    surface: &mut dyn DrawSurface,
    hint: Option<Point>,
    click: Option<Point>,
    settings: &GameSettings,
    progress: f32,
) {
    draw_running(surface, hint, settings);
    if let Some(click) = click {
        draw_cross(surface, click, CROSS_SIZE, CLICK_COLOR);
    }
    let size = surface.size();
    let x = (size.x * progress.clamp(0.0, 1.0)).round();
    surface.stroke_line(egui::pos2(x, 0.0), egui::pos2(x, size.y), 3.0, ANIMATION_COLOR);
}

/// Scan with the round's result painted over it.
pub fn draw_round_outcome(
    surface: &mut dyn DrawSurface,
    scan: &ScanRecord,
    outcome: &RoundOutcome,
    settings: &GameSettings,
) {
    surface.clear();
    surface.draw_base_image();

    draw_rectangle(surface, &scan.truth, TRUTH_COLOR, BOX_LINE_WIDTH);

    let predicted_color = if outcome.ai_correct {
        CORRECT_COLOR
    } else {
        INCORRECT_COLOR
    };
    draw_rectangle(surface, &scan.predicted, predicted_color, BOX_LINE_WIDTH);

    let player_color = if outcome.player_correct {
        CORRECT_COLOR
    } else {
        INCORRECT_COLOR
    };
    if let Some(click) = outcome.click {
        draw_cross(surface, click, CROSS_SIZE, player_color);
    }

    if let Some(center) = outcome.hint_center {
        draw_circle(
            surface,
            center,
            settings.hint_radius as f64,
            settings.hint_line_width as f64,
            HINT_COLOR,
        );
    }

    let banner = match (outcome.player_correct, outcome.click.is_some()) {
        (true, _) => "Well spotted!",
        (false, true) => "Missed!",
        (false, false) => "Out of time!",
    };
    draw_round_end_text(surface, banner, player_color);
}

/// [`DrawSurface`] over an egui painter, with the canvas placed at `rect`.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    texture: Option<egui::TextureId>,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect, texture: Option<egui::TextureId>) -> Self {
        Self {
            painter,
            rect,
            texture,
        }
    }

    fn to_screen(&self, p: egui::Pos2) -> egui::Pos2 {
        self.rect.min + p.to_vec2()
    }
}

impl DrawSurface for EguiSurface<'_> {
    fn size(&self) -> egui::Vec2 {
        self.rect.size()
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 0.0, Color32::BLACK);
    }

    fn draw_base_image(&mut self) {
        if let Some(texture) = self.texture {
            self.painter.image(
                texture,
                self.rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    fn stroke_rect(&mut self, min: egui::Pos2, max: egui::Pos2, width: f32, color: Color32) {
        let rect = egui::Rect::from_min_max(self.to_screen(min), self.to_screen(max));
        self.painter
            .rect_stroke(rect, 0.0, egui::Stroke::new(width, color));
    }

    fn stroke_line(&mut self, from: egui::Pos2, to: egui::Pos2, width: f32, color: Color32) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            egui::Stroke::new(width, color),
        );
    }

    fn stroke_circle(&mut self, center: egui::Pos2, radius: f32, width: f32, color: Color32) {
        self.painter
            .circle_stroke(self.to_screen(center), radius, egui::Stroke::new(width, color));
    }

    fn stroked_text(
        &mut self,
        text: &str,
        pos: egui::Pos2,
        size: f32,
        outline_width: f32,
        outline: Color32,
        fill: Color32,
    ) {
        let center = self.to_screen(pos);
        let font = egui::FontId::proportional(size);

        // Fake the outline by offsetting copies around the fill
        for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            self.painter.text(
                center + egui::vec2(dx * outline_width, dy * outline_width) * 0.5,
                egui::Align2::CENTER_CENTER,
                text,
                font.clone(),
                outline,
            );
        }
        self.painter
            .text(center, egui::Align2::CENTER_CENTER, text, font, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Image,
        Rect(egui::Pos2, egui::Pos2, Color32),
        Line(egui::Pos2, egui::Pos2, Color32),
        Circle(egui::Pos2, f32, Color32),
        Text(String, egui::Pos2, Color32),
    }

    struct Recording {
        size: egui::Vec2,
        ops: Vec<Op>,
    }

    impl Recording {
        fn new(width: f32) -> Self {
            Self {
                size: egui::vec2(width, width),
                ops: Vec::new(),
            }
        }
    }

    impl DrawSurface for Recording {
        fn size(&self) -> egui::Vec2 {
            self.size
        }

        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }

        fn draw_base_image(&mut self) {
            self.ops.push(Op::Image);
        }

        fn stroke_rect(&mut self, min: egui::Pos2, max: egui::Pos2, _width: f32, color: Color32) {
            self.ops.push(Op::Rect(min, max, color));
        }

        fn stroke_line(&mut self, from: egui::Pos2, to: egui::Pos2, _width: f32, color: Color32) {
            self.ops.push(Op::Line(from, to, color));
        }

        fn stroke_circle(&mut self, center: egui::Pos2, radius: f32, _width: f32, color: Color32) {
            self.ops.push(Op::Circle(center, radius, color));
        }

        fn stroked_text(
            &mut self,
            text: &str,
            pos: egui::Pos2,
            _size: f32,
            _outline_width: f32,
            _outline: Color32,
            fill: Color32,
        ) {
            self.ops.push(Op::Text(text.to_string(), pos, fill));
        }
    }

    fn scan() -> ScanRecord {
        ScanRecord {
            id: 1,
            image_path: "1.png".to_string(),
            truth: Rectangle::new(10.0, 10.0, 20.0, 20.0).unwrap(),
            predicted: Rectangle::new(15.0, 15.0, 25.0, 25.0).unwrap(),
        }
    }

    fn outcome(click: Option<Point>, player_correct: bool, hint: Option<Point>) -> RoundOutcome {
        RoundOutcome {
            scan_id: 1,
            click,
            player_correct,
            ai_correct: false,
            iou: 0.1429,
            remaining_ms: 5000,
            used_hint: hint.is_some(),
            hint_center: hint,
            player_score: 0,
            ai_score: 0,
        }
    }

    #[test]
    fn test_outcome_draw_order() {
        let mut surface = Recording::new(1024.0);
        let hint = Point::new(100.0, 100.0);
        draw_round_outcome(
            &mut surface,
            &scan(),
            &outcome(Some(Point::new(15.0, 15.0)), true, Some(hint)),
            &GameSettings::default(),
        );

        assert_eq!(surface.ops[0], Op::Clear);
        assert_eq!(surface.ops[1], Op::Image);
        assert_eq!(
            surface.ops[2],
            Op::Rect(egui::pos2(20.0, 20.0), egui::pos2(40.0, 40.0), TRUTH_COLOR)
        );
        assert_eq!(
            surface.ops[3],
            Op::Rect(egui::pos2(30.0, 30.0), egui::pos2(50.0, 50.0), INCORRECT_COLOR)
        );
        assert!(matches!(surface.ops[4], Op::Line(_, _, c) if c == CORRECT_COLOR));
        assert!(matches!(surface.ops[5], Op::Line(_, _, c) if c == CORRECT_COLOR));
        assert_eq!(surface.ops[6], Op::Circle(egui::pos2(200.0, 200.0), 200.0, HINT_COLOR));
        assert!(matches!(&surface.ops[7], Op::Text(t, p, _) if t == "Well spotted!" && *p == egui::pos2(512.0, 102.0)));
        assert_eq!(surface.ops.len(), 8);
    }

    #[test]
    fn test_timeout_has_no_cross() {
        let mut surface = Recording::new(512.0);
        draw_round_outcome(&mut surface, &scan(), &outcome(None, false, None), &GameSettings::default());

        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Line(..) | Op::Circle(..))));
        assert!(matches!(surface.ops.last(), Some(Op::Text(t, _, c)) if t == "Out of time!" && *c == INCORRECT_COLOR));
    }

    #[test]
    fn test_cross_is_centered() {
        let mut surface = Recording::new(512.0);
        draw_cross(&mut surface, Point::new(50.0, 60.0), 5.0, CLICK_COLOR);
        assert_eq!(
            surface.ops,
            vec![
                Op::Line(egui::pos2(45.0, 55.0), egui::pos2(55.0, 65.0), CLICK_COLOR),
                Op::Line(egui::pos2(55.0, 55.0), egui::pos2(45.0, 65.0), CLICK_COLOR),
            ]
        );
    }

    #[test]
    fn test_ai_search_sweeps_left_to_right() {
        let mut surface = Recording::new(200.0);
        draw_ai_search(
            &mut surface,
            None,
            Some(Point::new(100.0, 100.0)),
            &GameSettings::default(),
            0.25,
        );
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::Line(_, _, c) if *c == CLICK_COLOR)));
        assert_eq!(
            surface.ops.last(),
            Some(&Op::Line(egui::pos2(50.0, 0.0), egui::pos2(50.0, 200.0), ANIMATION_COLOR))
        );
    }

    #[test]
    fn test_running_draws_hint_only_when_shown() {
        let mut surface = Recording::new(512.0);
        draw_running(&mut surface, None, &GameSettings::default());
        assert_eq!(surface.ops, vec![Op::Clear, Op::Image]);

        draw_running(&mut surface, Some(Point::new(1.0, 2.0)), &GameSettings::default());
        assert_eq!(surface.ops.len(), 5);
    }
}
