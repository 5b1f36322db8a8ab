// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Number and range helpers.

use crate::error::{Error, Result};
use rand::Rng;

/// Modulo with the sign of the divisor, unlike `%` for negative dividends.
/// `None` for a zero divisor.
pub fn modulo(x: i64, y: i64) -> Option<i64> {
    if y == 0 {
        return None;
    }
    Some(((x % y) + y) % y)
}

/// Random value in `[x - |range|, x + |range|)`.
pub fn random_around<R: Rng + ?Sized>(rng: &mut R, x: f64, range: f64) -> f64 {
    let range = range.abs();
    if range == 0.0 {
        return x;
    }
    x + rng.random_range(0.0..range * 2.0).floor() - range
}

/// Values from `start` (inclusive) to `stop` (exclusive) in steps of `step`.
pub fn range(start: i64, stop: i64, step: i64) -> Result<Vec<i64>> {
    if step <= 0 {
        return Err(Error::InvalidStep(step));
    }
    Ok((start..stop).step_by(step as usize).collect())
}

/// A random permutation of [`range`], built with an inside-out shuffle.
pub fn shuffled_range<R: Rng + ?Sized>(rng: &mut R, start: i64, stop: i64, step: i64) -> Result<Vec<i64>> {
    let values = range(start, stop, step)?;
    let mut nums: Vec<i64> = Vec::with_capacity(values.len());

    for (i, value) in values.into_iter().enumerate() {
        let j = rng.random_range(0..=i);
        if j == i {
            nums.push(value);
        } else {
            nums.push(nums[j]);
            nums[j] = value;
        }
    }

    Ok(nums)
}

/// Split `xs` into the elements matching `predicate` and the rest, keeping order.
pub fn partition<T, F>(xs: impl IntoIterator<Item = T>, predicate: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> bool,
{
    xs.into_iter().partition(|x| predicate(x))
}
