// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: scan assets, images, scores, persisted flags, settings files and uploads.

pub mod assets;
pub mod background;
pub mod leaderboard;
pub mod media;
pub mod serialization;
pub mod storage;
pub mod upload;
