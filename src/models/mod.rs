// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the game, the stores and the UI.

pub mod annotation;
pub mod scan;
pub mod score;
pub mod settings;
