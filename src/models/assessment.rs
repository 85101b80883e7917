// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Fitness assessment: PAR-Q screening plus posture and movement scores.
//!
//! Scores use 1 = poor, 2 = fair, 3 = good.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::time_utils::rfc3339;

/// Questionnaire answers. Doubles as the create request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AssessmentAnswers {
    // ─── PAR-Q (true = yes) ──────────────────────────────────────
    #[serde(default)]
    pub parq_heart_problem: bool,
    #[serde(default)]
    pub parq_chest_pain: bool,
    #[serde(default)]
    pub parq_dizziness: bool,
    #[serde(default)]
    pub parq_chronic_condition: bool,
    #[serde(default)]
    pub parq_medication: bool,
    #[serde(default)]
    pub parq_bone_joint: bool,
    #[serde(default)]
    pub parq_supervision: bool,

    // ─── Posture ─────────────────────────────────────────────────
    #[validate(range(min = 1, max = 3))]
    pub posture_head_neck: u8,
    #[validate(range(min = 1, max = 3))]
    pub posture_shoulders: u8,
    #[validate(range(min = 1, max = 3))]
    pub posture_lphc: u8,
    #[validate(range(min = 1, max = 3))]
    pub posture_knee: u8,
    #[validate(range(min = 1, max = 3))]
    pub posture_foot: u8,

    // ─── Push-up ─────────────────────────────────────────────────
    #[validate(range(min = 1, max = 3))]
    pub pushup_form: u8,
    #[validate(range(min = 1, max = 3))]
    pub pushup_scapular: u8,
    #[validate(range(min = 1, max = 3))]
    pub pushup_lordosis: u8,
    #[validate(range(min = 1, max = 3))]
    pub pushup_head_pos: u8,

    // ─── Overhead squat ──────────────────────────────────────────
    #[validate(range(min = 1, max = 3))]
    pub squat_feet_out: u8,
    #[validate(range(min = 1, max = 3))]
    pub squat_knees_in: u8,
    #[validate(range(min = 1, max = 3))]
    pub squat_lower_back: u8,
    #[validate(range(min = 1, max = 3))]
    pub squat_arms_forward: u8,
    #[validate(range(min = 1, max = 3))]
    pub squat_lean_forward: u8,

    // ─── Single-leg balance ──────────────────────────────────────
    #[validate(range(min = 1, max = 3))]
    pub balance_correct: u8,
    #[validate(range(min = 1, max = 3))]
    pub balance_knee_in: u8,
    #[validate(range(min = 1, max = 3))]
    pub balance_hip_rise: u8,

    // ─── Shoulder mobility ───────────────────────────────────────
    #[validate(range(min = 1, max = 3))]
    pub shoulder_retraction: u8,
    #[validate(range(min = 1, max = 3))]
    pub shoulder_protraction: u8,
    #[validate(range(min = 1, max = 3))]
    pub shoulder_elevation: u8,
    #[validate(range(min = 1, max = 3))]
    pub shoulder_depression: u8,

    #[serde(default)]
    pub notes: String,
}

impl AssessmentAnswers {
    /// Sum of the five posture scores (5..=15).
    pub fn total_score(&self) -> u32 {
        [
            self.posture_head_neck,
            self.posture_shoulders,
            self.posture_lphc,
            self.posture_knee,
            self.posture_foot,
        ]
        .iter()
        .map(|&s| u32::from(s))
        .sum()
    }

    pub fn score_level(&self) -> ScoreLevel {
        ScoreLevel::from_total(self.total_score())
    }
}

/// Banding of the posture total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Poor,
    Fair,
    Good,
}

impl ScoreLevel {
    pub fn from_total(total: u32) -> Self {
        match total {
            0..=6 => ScoreLevel::Poor,
            7..=12 => ScoreLevel::Fair,
            _ => ScoreLevel::Good,
        }
    }
}

/// Assessment stored in the `assessments` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(flatten)]
    pub answers: AssessmentAnswers,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub updated_at: DateTime<Utc>,
}

/// Assessment with its computed score fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentView {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub total_score: u32,
    pub score_level: ScoreLevel,
}

impl From<Assessment> for AssessmentView {
    fn from(assessment: Assessment) -> Self {
        Self {
            total_score: assessment.answers.total_score(),
            score_level: assessment.answers.score_level(),
            assessment,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Answers with every score set to `score`.
    pub(crate) fn uniform_answers(score: u8) -> AssessmentAnswers {
        AssessmentAnswers {
            parq_heart_problem: false,
            parq_chest_pain: false,
            parq_dizziness: false,
            parq_chronic_condition: false,
            parq_medication: false,
            parq_bone_joint: false,
            parq_supervision: false,
            posture_head_neck: score,
            posture_shoulders: score,
            posture_lphc: score,
            posture_knee: score,
            posture_foot: score,
            pushup_form: score,
            pushup_scapular: score,
            pushup_lordosis: score,
            pushup_head_pos: score,
            squat_feet_out: score,
            squat_knees_in: score,
            squat_lower_back: score,
            squat_arms_forward: score,
            squat_lean_forward: score,
            balance_correct: score,
            balance_knee_in: score,
            balance_hip_rise: score,
            shoulder_retraction: score,
            shoulder_protraction: score,
            shoulder_elevation: score,
            shoulder_depression: score,
            notes: String::new(),
        }
    }

    #[test]
    fn test_total_score_sums_posture_only() {
        let mut answers = uniform_answers(1);
        answers.pushup_form = 3;
        answers.squat_knees_in = 3;
        assert_eq!(answers.total_score(), 5);

        answers.posture_knee = 3;
        assert_eq!(answers.total_score(), 7);
    }

    #[test]
    fn test_score_level_bands() {
        assert_eq!(ScoreLevel::from_total(5), ScoreLevel::Poor);
        assert_eq!(ScoreLevel::from_total(6), ScoreLevel::Poor);
        assert_eq!(ScoreLevel::from_total(7), ScoreLevel::Fair);
        assert_eq!(ScoreLevel::from_total(12), ScoreLevel::Fair);
        assert_eq!(ScoreLevel::from_total(13), ScoreLevel::Good);
        assert_eq!(uniform_answers(3).score_level(), ScoreLevel::Good);
    }

    #[test]
    fn test_scores_outside_range_fail_validation() {
        assert!(uniform_answers(2).validate().is_ok());
        assert!(uniform_answers(0).validate().is_err());
        assert!(uniform_answers(4).validate().is_err());
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = AssessmentView::from(Assessment {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            answers: uniform_answers(2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["posture_knee"], 2);
        assert_eq!(json["total_score"], 10);
        assert_eq!(json["score_level"], "fair");
    }
}
