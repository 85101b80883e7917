// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! PT Mate: practice management backend for personal trainers.
//!
//! This crate provides the HTTP API for managing clients, training sessions
//! and their package accounting, body measurements, fitness assessments and
//! progress photos.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::ObjectStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub storage: ObjectStore,
}
