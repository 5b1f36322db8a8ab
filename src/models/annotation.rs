// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines points, bounding boxes and the annotation file that
//! pairs a scan's ground-truth box with the AI's predicted box. All stored
//! coordinates live in the canonical 512x512 image space.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Side length of the canonical coordinate space used by annotation files.
pub const DEFAULT_IMAGE_SIZE: f64 = 512.0;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box `[x1, y1, x2, y2]` with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 4]")]
pub struct Rectangle {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Rectangle {
    /// Create a rectangle, rejecting inverted corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if [x1, y1, x2, y2].iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidRectangle(format!(
                "coordinates must be finite, got [{}, {}, {}, {}]",
                x1, y1, x2, y2
            )));
        }
        if x1 > x2 || y1 > y2 {
            return Err(Error::InvalidRectangle(format!(
                "corners out of order: [{}, {}, {}, {}]",
                x1, y1, x2, y2
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Create a rectangle from a slice that must hold exactly four values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [x1, y1, x2, y2] => Self::new(*x1, *y1, *x2, *y2),
            _ => Err(Error::InvalidRectangle(format!(
                "expected 4 coordinates, got {}",
                values.len()
            ))),
        }
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Point-in-rectangle test, boundary included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    /// Apply `f` to every coordinate. Used for rescaling between spaces.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            x1: f(self.x1),
            y1: f(self.y1),
            x2: f(self.x2),
            y2: f(self.y2),
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl TryFrom<Vec<f64>> for Rectangle {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl From<Rectangle> for [f64; 4] {
    fn from(rect: Rectangle) -> Self {
        rect.to_array()
    }
}

/// Contents of an annotation file: the ground truth and the AI prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub truth: Rectangle,
    pub predicted: Rectangle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_rejects_wrong_length() {
        assert!(Rectangle::from_slice(&[1.0, 2.0, 3.0]).is_err());
        assert!(Rectangle::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
        assert!(Rectangle::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_ok());
    }

    #[test]
    fn test_rectangle_rejects_inverted_corners() {
        assert!(Rectangle::new(20.0, 10.0, 10.0, 20.0).is_err());
        assert!(Rectangle::new(10.0, 20.0, 20.0, 10.0).is_err());
        assert!(Rectangle::new(10.0, 10.0, 10.0, 10.0).is_ok());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let rect = Rectangle::new(10.0, 10.0, 20.0, 20.0).unwrap();
        assert!(rect.contains(Point::new(15.0, 15.0)));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(20.0, 20.0)));
        assert!(!rect.contains(Point::new(0.0, 0.0)));
        assert!(!rect.contains(Point::new(20.5, 15.0)));
    }

    #[test]
    fn test_annotation_json() {
        let json = r#"{ "truth": [10, 10, 20, 20], "predicted": [15, 15, 25, 25] }"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.truth.to_array(), [10.0, 10.0, 20.0, 20.0]);
        assert_eq!(annotation.predicted.center(), Point::new(20.0, 20.0));

        let bad = r#"{ "truth": [10, 10, 20], "predicted": [15, 15, 25, 25] }"#;
        assert!(serde_json::from_str::<Annotation>(bad).is_err());
    }
}
