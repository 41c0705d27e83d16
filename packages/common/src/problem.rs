use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type ProblemId = String;

/// Problem catalog keyed by problem id.
pub type ProblemMap = HashMap<ProblemId, Problem>;

/// Difficulty models keyed by problem id.
pub type ProblemModelMap = HashMap<ProblemId, ProblemModel>;

/// A problem from the catalog resource. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub contest_id: String,
    pub title: String,
}

impl Problem {
    pub fn new(
        id: impl Into<String>,
        contest_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            contest_id: contest_id.into(),
            title: title.into(),
        }
    }
}

/// Estimated difficulty metadata for a single problem.
///
/// Every field is optional: problems too old or too new for the estimator
/// come back with only a subset filled in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemModel {
    #[serde(default)]
    pub difficulty: Option<f64>,
    /// True when the difficulty was estimated from too few contestants.
    #[serde(default)]
    pub is_experimental: Option<bool>,
    #[serde(default)]
    pub slope: Option<f64>,
    #[serde(default)]
    pub intercept: Option<f64>,
    #[serde(default)]
    pub variance: Option<f64>,
    #[serde(default)]
    pub discrimination: Option<f64>,
}

impl ProblemModel {
    pub fn with_difficulty(difficulty: f64) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    pub fn is_experimental(&self) -> bool {
        self.is_experimental.unwrap_or(false)
    }

    /// Difficulty as displayed: values below 400 are squashed onto (0, 400)
    /// so beginner problems never show a negative rating.
    pub fn clipped_difficulty(&self) -> Option<f64> {
        self.difficulty.map(clip_difficulty)
    }
}

pub fn clip_difficulty(difficulty: f64) -> f64 {
    if difficulty >= 400.0 {
        difficulty.round()
    } else {
        (400.0 / (1.0 - difficulty / 400.0).exp()).round()
    }
}

/// Index a problem list by id. Later duplicates overwrite earlier ones.
pub fn index_problems(problems: Vec<Problem>) -> ProblemMap {
    problems.into_iter().map(|p| (p.id.clone(), p)).collect()
}
