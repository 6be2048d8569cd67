// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod animal;
pub mod id;
pub mod training;
pub mod user;

pub use animal::Animal;
pub use training::TrainingRecord;
pub use user::{User, UserSummary};
