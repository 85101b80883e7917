// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Services module - business logic layer.
//!
//! Every operation on trainer-owned data takes the caller's
//! [`TrainerScope`](crate::middleware::TrainerScope).

pub mod assessments;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod measurements;
pub mod packages;
pub mod photos;
pub mod sessions;
pub mod storage;

pub use storage::ObjectStore;
