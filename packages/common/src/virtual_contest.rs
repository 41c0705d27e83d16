use serde::{Deserialize, Serialize};

use crate::mode::VirtualContestMode;
use crate::problem::ProblemId;

/// A problem selected into a virtual contest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualContestItem {
    pub id: ProblemId,
    /// Point override. `None` means default scoring.
    pub point: Option<i64>,
    /// Display order assigned by the server; not computed client-side.
    pub order: Option<i64>,
}

impl VirtualContestItem {
    pub fn new(id: impl Into<ProblemId>) -> Self {
        Self {
            id: id.into(),
            point: None,
            order: None,
        }
    }
}

/// A finalized contest configuration handed to the submit callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestDraft {
    pub title: String,
    pub memo: String,
    pub start_second: i64,
    pub end_second: i64,
    pub mode: VirtualContestMode,
    pub problems: Vec<VirtualContestItem>,
}

impl ContestDraft {
    pub fn duration_second(&self) -> i64 {
        self.end_second - self.start_second
    }
}

/// Contest record as returned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualContestInfo {
    pub id: String,
    pub title: String,
    pub memo: String,
    pub owner_user_id: String,
    pub start_epoch_second: i64,
    pub duration_second: i64,
    #[serde(default)]
    pub mode: VirtualContestMode,
}

impl VirtualContestInfo {
    pub fn end_epoch_second(&self) -> i64 {
        self.start_epoch_second + self.duration_second
    }
}

/// A contest together with its problem list and participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualContestDetails {
    pub info: VirtualContestInfo,
    pub problems: Vec<VirtualContestItem>,
    #[serde(default)]
    pub participants: Vec<String>,
}

// ---------------------------------------------------------------------------
// Request / response bodies of the contest endpoints
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContestRequest {
    pub title: String,
    pub memo: String,
    pub start_epoch_second: i64,
    pub duration_second: i64,
    pub mode: VirtualContestMode,
}

impl From<&ContestDraft> for CreateContestRequest {
    fn from(draft: &ContestDraft) -> Self {
        Self {
            title: draft.title.clone(),
            memo: draft.memo.clone(),
            start_epoch_second: draft.start_second,
            duration_second: draft.duration_second(),
            mode: draft.mode,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContestResponse {
    pub contest_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateContestRequest {
    pub id: String,
    pub title: String,
    pub memo: String,
    pub start_epoch_second: i64,
    pub duration_second: i64,
    pub mode: VirtualContestMode,
}

impl UpdateContestRequest {
    pub fn from_draft(id: impl Into<String>, draft: &ContestDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title.clone(),
            memo: draft.memo.clone(),
            start_epoch_second: draft.start_second,
            duration_second: draft.duration_second(),
            mode: draft.mode,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemsRequest {
    pub contest_id: String,
    pub problems: Vec<VirtualContestItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinContestRequest {
    pub contest_id: String,
}
