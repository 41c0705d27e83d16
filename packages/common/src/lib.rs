pub mod config;
pub mod mode;
pub mod problem;
pub mod virtual_contest;

pub use mode::VirtualContestMode;
pub use problem::{Problem, ProblemId, ProblemMap, ProblemModel, ProblemModelMap, index_problems};
pub use virtual_contest::{
    ContestDraft, VirtualContestDetails, VirtualContestInfo, VirtualContestItem,
};
