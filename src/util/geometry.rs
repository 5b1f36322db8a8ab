// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides coordinate transformations between the canonical
//! 512x512 annotation space, canvas pixels, and on-screen pointer positions.

use crate::models::annotation::{Point, Rectangle, DEFAULT_IMAGE_SIZE};

/// Map a canonical value onto a canvas of the given pixel width, rounded.
pub fn to_canvas_scale(canvas_width: f64, x: f64) -> f64 {
    (x * canvas_width / DEFAULT_IMAGE_SIZE).round()
}

/// Map a canvas value back onto the canonical space, rounded.
/// Inverse of [`to_canvas_scale`].
pub fn to_default_scale(canvas_width: f64, x: f64) -> f64 {
    (x * DEFAULT_IMAGE_SIZE / canvas_width).round()
}

/// Map every corner of a canonical rectangle onto the canvas.
pub fn map_rectangle_to_canvas_scale(canvas_width: f64, rect: &Rectangle) -> Rectangle {
    rect.map(|v| to_canvas_scale(canvas_width, v))
}

/// Map a pointer position into canvas pixel space.
///
/// `bounds` is where the canvas is displayed on screen and `canvas_size` its
/// pixel buffer size; the two differ whenever the canvas is scaled to fit.
pub fn map_click_to_canvas(bounds: egui::Rect, canvas_size: egui::Vec2, client: egui::Pos2) -> Point {
    let width_scale = canvas_size.x / bounds.width();
    let height_scale = canvas_size.y / bounds.height();

    Point::new(
        ((client.x - bounds.min.x) * width_scale).round() as f64,
        ((client.y - bounds.min.y) * height_scale).round() as f64,
    )
}

/// Largest rectangle with the given aspect ratio that fits in `available`,
/// centered inside it.
pub fn fit_centered(available: egui::Rect, aspect: f32) -> egui::Rect {
    let available_aspect = available.width() / available.height();

    let size = if aspect > available_aspect {
        // Wider than the space - fit to width
        egui::vec2(available.width(), available.width() / aspect)
    } else {
        // Taller - fit to height
        egui::vec2(available.height() * aspect, available.height())
    };

    egui::Rect::from_center_size(available.center(), size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_roundtrip() {
        let canvas_width = 1024.0;
        for x in [0.0, 10.0, 256.0, 511.0, 512.0] {
            let scaled = to_canvas_scale(canvas_width, x);
            assert_eq!(to_default_scale(canvas_width, scaled), x);
        }
        assert_eq!(to_canvas_scale(canvas_width, 256.0), 512.0);
    }

    #[test]
    fn test_scale_rounds() {
        // 3 * 700 / 512 = 4.1
        assert_eq!(to_canvas_scale(700.0, 3.0), 4.0);
        assert_eq!(to_default_scale(700.0, 4.0), 3.0);
    }

    #[test]
    fn test_rectangle_scaling() {
        let rect = Rectangle::new(10.0, 20.0, 30.0, 40.0).unwrap();
        let scaled = map_rectangle_to_canvas_scale(256.0, &rect);
        assert_eq!(scaled.to_array(), [5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_click_mapping_accounts_for_display_scale() {
        // Canvas buffer is 512 px, shown at 256 px starting at (100, 50)
        let bounds = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(256.0, 256.0));
        let point = map_click_to_canvas(bounds, egui::vec2(512.0, 512.0), egui::pos2(110.0, 60.0));
        assert_eq!(point, Point::new(20.0, 20.0));

        let corner = map_click_to_canvas(bounds, egui::vec2(512.0, 512.0), egui::pos2(100.0, 50.0));
        assert_eq!(corner, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_fit_centered() {
        let available = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 400.0));
        let fitted = fit_centered(available, 1.0);
        assert_eq!(fitted.size(), egui::vec2(400.0, 400.0));
        assert_eq!(fitted.min, egui::pos2(200.0, 0.0));
    }
}
