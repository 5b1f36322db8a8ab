// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Game rules: rounds, scoring, timers, scan ids, links and achievements.

pub mod achievements;
pub mod file_ids;
pub mod link;
pub mod round;
pub mod scoring;
pub mod timer;
