use common::{ContestDraft, Problem, VirtualContestDetails, VirtualContestItem, VirtualContestMode};

use crate::error::FormError;
use crate::item_list::ContestItemList;
use crate::supplier::ProblemSupplier;
use crate::time::{DateTimeFields, Endpoint};

/// Initial field values the page mounts the form with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestConfigInit {
    pub title: String,
    pub memo: String,
    pub start: DateTimeFields,
    pub end: DateTimeFields,
    pub mode: VirtualContestMode,
    pub problems: Vec<VirtualContestItem>,
}

impl Default for ContestConfigInit {
    /// Blank contest starting and ending at midnight today (JST).
    fn default() -> Self {
        let today = DateTimeFields::today();
        Self {
            title: String::new(),
            memo: String::new(),
            start: today.clone(),
            end: today,
            mode: VirtualContestMode::Default,
            problems: Vec::new(),
        }
    }
}

impl ContestConfigInit {
    /// Seed from a stored contest for editing.
    pub fn from_details(details: &VirtualContestDetails) -> Self {
        let info = &details.info;
        let start = DateTimeFields::from_unix_second(info.start_epoch_second)
            .unwrap_or_else(DateTimeFields::today);
        let end = DateTimeFields::from_unix_second(info.end_epoch_second())
            .unwrap_or_else(|| start.clone());
        Self {
            title: info.title.clone(),
            memo: info.memo.clone(),
            start,
            end,
            mode: info.mode,
            problems: details.problems.clone(),
        }
    }
}

/// Values derived from the current fields. Recomputed on every call to
/// [`ContestConfigForm::evaluate`], never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormState {
    pub start_second: Option<i64>,
    pub end_second: Option<i64>,
    pub submittable: bool,
}

/// Editor state for creating or updating a virtual contest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestConfigForm {
    page_title: String,
    button_title: String,
    title: String,
    memo: String,
    start: DateTimeFields,
    end: DateTimeFields,
    mode: VirtualContestMode,
    problems: ContestItemList,
}

impl ContestConfigForm {
    pub fn new(
        page_title: impl Into<String>,
        button_title: impl Into<String>,
        init: ContestConfigInit,
    ) -> Self {
        Self {
            page_title: page_title.into(),
            button_title: button_title.into(),
            title: init.title,
            memo: init.memo,
            start: init.start,
            end: init.end,
            mode: init.mode,
            problems: ContestItemList::from_items(init.problems),
        }
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn button_title(&self) -> &str {
        &self.button_title
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn start(&self) -> &DateTimeFields {
        &self.start
    }

    pub fn end(&self) -> &DateTimeFields {
        &self.end
    }

    pub fn mode(&self) -> VirtualContestMode {
        self.mode
    }

    pub fn problems(&self) -> &ContestItemList {
        &self.problems
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.memo = memo.into();
    }

    pub fn set_mode(&mut self, mode: VirtualContestMode) {
        self.mode = mode;
    }

    pub fn set_start_date(&mut self, date: impl Into<String>) {
        self.start.date = date.into();
    }

    pub fn set_start_hour(&mut self, hour: u32) {
        self.start.hour = hour;
    }

    pub fn set_start_minute(&mut self, minute: u32) {
        self.start.minute = minute;
    }

    pub fn set_end_date(&mut self, date: impl Into<String>) {
        self.end.date = date.into();
    }

    pub fn set_end_hour(&mut self, hour: u32) {
        self.end.hour = hour;
    }

    pub fn set_end_minute(&mut self, minute: u32) {
        self.end.minute = minute;
    }

    pub fn add_problems<'a>(&mut self, problems: impl IntoIterator<Item = &'a Problem>) -> usize {
        self.problems.add(problems)
    }

    /// Add whatever a search box or generator currently offers.
    pub fn add_from(&mut self, supplier: &dyn ProblemSupplier) -> usize {
        let supplied = supplier.supply();
        self.problems.add(&supplied)
    }

    pub fn remove_problem(&mut self, problem_id: &str) -> bool {
        self.problems.remove(problem_id)
    }

    pub fn set_point(&mut self, index: usize, point: i64) {
        self.problems.set_point(index, point);
    }

    pub fn set_point_input(&mut self, index: usize, input: &str) {
        self.problems.set_point_input(index, input);
    }

    pub fn unset_point(&mut self, index: usize) {
        self.problems.unset_point(index);
    }

    pub fn evaluate(&self) -> FormState {
        FormState {
            start_second: self.start.unix_second(),
            end_second: self.end.unix_second(),
            submittable: self.validate().is_ok(),
        }
    }

    /// Check the submit rules in order: title, start time, end time, window.
    pub fn validate(&self) -> Result<(i64, i64), FormError> {
        if self.title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        let start = self.start.unix_second().ok_or_else(|| FormError::InvalidTime {
            endpoint: Endpoint::Start,
            timestamp: self.start.timestamp(),
        })?;
        let end = self.end.unix_second().ok_or_else(|| FormError::InvalidTime {
            endpoint: Endpoint::End,
            timestamp: self.end.timestamp(),
        })?;
        if start > end {
            return Err(FormError::EndBeforeStart { start, end });
        }
        Ok((start, end))
    }

    /// Snapshot the current fields as a draft.
    pub fn draft(&self) -> Result<ContestDraft, FormError> {
        let (start_second, end_second) = self.validate()?;
        Ok(ContestDraft {
            title: self.title.clone(),
            memo: self.memo.clone(),
            start_second,
            end_second,
            mode: self.mode,
            problems: self.problems.items().to_vec(),
        })
    }

    /// Hand a draft to `push`. Nothing is called unless the form is
    /// submittable; the form itself is left as it was.
    pub fn submit<F>(&self, push: F) -> Result<(), FormError>
    where
        F: FnOnce(ContestDraft),
    {
        let draft = self.draft()?;
        push(draft);
        Ok(())
    }
}
