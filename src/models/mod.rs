// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Data models for the application.

pub mod assessment;
pub mod client;
pub mod measurement;
pub mod package;
pub mod patch;
pub mod photo;
pub mod session;
pub mod trainer;

pub use assessment::{Assessment, AssessmentAnswers, AssessmentView, ScoreLevel};
pub use client::{Client, ClientSummary, ClientView};
pub use measurement::Measurement;
pub use package::{PackageStats, PackageSummary};
pub use patch::Patch;
pub use photo::{Photo, PhotoGroup, PhotoGroupView, PhotoUploadResponse, UploadOutcome};
pub use session::{Session, SessionStatus, SessionView};
pub use trainer::{Trainer, TrainerEmail, TrainerResponse};
