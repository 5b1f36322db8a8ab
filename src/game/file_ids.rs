// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scan id generators.
//!
//! Random play draws ids from a shuffled range so that no scan repeats within
//! one pass; challenge links replay a fixed list of ids in order.

use crate::models::scan::Difficulty;
use crate::util::numbers::modulo;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Unique random ids from `[min, max)`.
///
/// Each call swaps the element at the cursor with a random element at or
/// before it, returns it, and moves the cursor down. When the cursor passes
/// the bottom it wraps to the top of the same array without rebuilding it.
pub struct UniqueRandomGenerator {
    nums: Vec<u32>,
    ix: usize,
    rng: StdRng,
}

impl UniqueRandomGenerator {
    pub fn new(min: u32, max: u32, rng: StdRng) -> Self {
        let nums: Vec<u32> = (min..max).collect();
        let ix = nums.len().saturating_sub(1);
        Self { nums, ix, rng }
    }

    pub fn next_id(&mut self) -> Option<u32> {
        if self.nums.is_empty() {
            return None;
        }

        let random_ix = self.rng.random_range(0..=self.ix);
        self.nums.swap(random_ix, self.ix);
        let id = self.nums[self.ix];

        self.ix = modulo(self.ix as i64 - 1, self.nums.len() as i64)? as usize;

        Some(id)
    }
}

/// Cycles through a fixed list of ids.
pub struct ArrayGenerator {
    ids: Vec<u32>,
    ix: usize,
}

impl ArrayGenerator {
    pub fn new(ids: Vec<u32>) -> Self {
        Self { ids, ix: 0 }
    }

    pub fn next_id(&mut self) -> Option<u32> {
        let id = *self.ids.get(self.ix)?;
        self.ix = (self.ix + 1) % self.ids.len();
        Some(id)
    }
}

/// Source of scan ids for a game.
pub enum FileIdSequence {
    Random(UniqueRandomGenerator),
    Challenge(ArrayGenerator),
}

impl FileIdSequence {
    /// Challenge ids win over random play when present.
    pub fn for_game(difficulty: Difficulty, challenge_ids: Option<Vec<u32>>) -> Self {
        match challenge_ids {
            Some(ids) => FileIdSequence::Challenge(ArrayGenerator::new(ids)),
            None => FileIdSequence::Random(UniqueRandomGenerator::new(
                0,
                difficulty.files_number(),
                StdRng::from_os_rng(),
            )),
        }
    }

    pub fn next_id(&mut self) -> Option<u32> {
        match self {
            FileIdSequence::Random(generator) => generator.next_id(),
            FileIdSequence::Challenge(generator) => generator.next_id(),
        }
    }

    pub fn is_challenge(&self) -> bool {
        matches!(self, FileIdSequence::Challenge(_))
    }
}
