// Copyright 2026 The Solace Project
// SPDX-License-Identifier: Apache-2.0

pub mod capability;
pub mod config;
pub mod engine;
pub mod eval;
pub mod matching;
pub mod mood;
pub mod normalize;
pub mod profile;
pub mod recommend;
pub mod signal;
