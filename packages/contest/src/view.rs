use std::fmt::Display;
use std::sync::Arc;

use common::{ProblemMap, ProblemModelMap, VirtualContestMode};
use serde::Serialize;

use crate::form::ContestConfigForm;
use crate::time::{DateTimeFields, HOUR_OPTIONS, minute_options};

/// Where the landing page lives; a rejected session is sent here.
pub const REDIRECT_ON_REJECTED: &str = "/";

/// Resolution state of an asynchronous input.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> FetchState<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fulfilled(value),
            Err(e) => Self::Rejected(e.to_string()),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Everything the form waits on before it can render.
#[derive(Debug, Clone)]
pub struct Gates {
    pub login: FetchState<()>,
    pub problems: FetchState<Arc<ProblemMap>>,
    pub problem_models: FetchState<Arc<ProblemModelMap>>,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            login: FetchState::Pending,
            problems: FetchState::Pending,
            problem_models: FetchState::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Navigate away instead of showing anything.
    Redirect { to: String },
    /// Render nothing yet.
    Empty,
    Form(FormView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub page_title: String,
    pub title: String,
    pub memo: String,
    pub mode: VirtualContestMode,
    pub mode_label: &'static str,
    pub mode_options: Vec<&'static str>,
    pub start: DateTimeFields,
    pub end: DateTimeFields,
    pub hour_options: Vec<u32>,
    pub minute_options: Vec<u32>,
    pub rows: Vec<ItemRow>,
    pub submit: SubmitButton,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    pub index: usize,
    pub problem_id: String,
    /// `None` when the id is missing from the catalog; show the bare id.
    pub link: Option<ProblemLink>,
    pub point: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemLink {
    pub contest_id: String,
    pub title: String,
    pub url: String,
}

impl ProblemLink {
    pub fn task_url(contest_id: &str, problem_id: &str) -> String {
        format!("https://atcoder.jp/contests/{contest_id}/tasks/{problem_id}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitButton {
    pub label: String,
    pub enabled: bool,
}

impl ContestConfigForm {
    /// Build the view for the current state.
    ///
    /// A rejected session wins over everything else. Until both reference
    /// collections have loaded nothing is rendered, whatever the fields hold.
    pub fn render(&self, gates: &Gates) -> View {
        if gates.login.is_rejected() {
            return View::Redirect {
                to: REDIRECT_ON_REJECTED.to_string(),
            };
        }
        let (Some(problems), Some(_models)) = (gates.problems.value(), gates.problem_models.value())
        else {
            return View::Empty;
        };

        let rows = self
            .problems()
            .iter()
            .enumerate()
            .map(|(index, item)| ItemRow {
                index,
                problem_id: item.id.clone(),
                link: problems.get(&item.id).map(|p| ProblemLink {
                    contest_id: p.contest_id.clone(),
                    title: p.title.clone(),
                    url: ProblemLink::task_url(&p.contest_id, &p.id),
                }),
                point: item.point,
            })
            .collect();

        let state = self.evaluate();
        View::Form(FormView {
            page_title: self.page_title().to_string(),
            title: self.title().to_string(),
            memo: self.memo().to_string(),
            mode: self.mode(),
            mode_label: self.mode().label(),
            mode_options: VirtualContestMode::ALL.iter().map(|m| m.label()).collect(),
            start: self.start().clone(),
            end: self.end().clone(),
            hour_options: HOUR_OPTIONS.collect(),
            minute_options: minute_options(),
            rows,
            submit: SubmitButton {
                label: self.button_title().to_string(),
                enabled: state.submittable,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ContestConfigInit;
    use common::{Problem, ProblemModel, index_problems};

    fn form() -> ContestConfigForm {
        let init = ContestConfigInit {
            title: "Practice".into(),
            start: DateTimeFields::new("2024-01-01", 21, 0),
            end: DateTimeFields::new("2024-01-01", 22, 40),
            ..ContestConfigInit::default()
        };
        let mut form = ContestConfigForm::new("Create Contest", "Create Contest", init);
        form.add_problems([
            &Problem::new("abc001_a", "abc001", "Task A"),
            &Problem::new("zzz999_z", "zzz999", "Unlisted"),
        ]);
        form.set_point(1, 250);
        form
    }

    fn loaded() -> Gates {
        let mut models = ProblemModelMap::new();
        models.insert("abc001_a".into(), ProblemModel::with_difficulty(100.0));
        Gates {
            login: FetchState::Fulfilled(()),
            problems: FetchState::Fulfilled(Arc::new(index_problems(vec![Problem::new(
                "abc001_a", "abc001", "Task A",
            )]))),
            problem_models: FetchState::Fulfilled(Arc::new(models)),
        }
    }

    #[test]
    fn test_rejected_login_redirects_before_anything_else() {
        let gates = Gates {
            login: FetchState::Rejected("401".into()),
            ..Gates::default()
        };
        assert_eq!(form().render(&gates), View::Redirect { to: "/".into() });

        let gates = Gates {
            login: FetchState::Rejected("401".into()),
            ..loaded()
        };
        assert!(matches!(form().render(&gates), View::Redirect { .. }));
    }

    #[test]
    fn test_empty_until_both_reference_fetches_resolve() {
        let full = loaded();
        let cases = [
            Gates {
                problems: FetchState::Pending,
                ..full.clone()
            },
            Gates {
                problem_models: FetchState::Pending,
                ..full.clone()
            },
            Gates {
                problems: FetchState::Rejected("timeout".into()),
                ..full.clone()
            },
            Gates {
                login: FetchState::Fulfilled(()),
                ..Gates::default()
            },
        ];
        for gates in &cases {
            assert_eq!(form().render(gates), View::Empty);
        }

        let mut invalid = form();
        invalid.set_title("");
        assert_eq!(invalid.render(&cases[0]), View::Empty);
    }

    #[test]
    fn test_pending_login_does_not_gate() {
        let gates = Gates {
            login: FetchState::Pending,
            ..loaded()
        };
        assert!(matches!(form().render(&gates), View::Form(_)));
    }

    #[test]
    fn test_form_view_contents() {
        let View::Form(view) = form().render(&loaded()) else {
            panic!("expected form view");
        };
        assert_eq!(view.page_title, "Create Contest");
        assert_eq!(view.mode_label, "Normal");
        assert_eq!(view.mode_options, vec!["Normal", "Lockout"]);
        assert_eq!(view.hour_options.len(), 24);
        assert_eq!(view.minute_options.len(), 12);
        assert!(view.submit.enabled);
        assert_eq!(view.submit.label, "Create Contest");

        assert_eq!(view.rows.len(), 2);
        let link = view.rows[0].link.as_ref().unwrap();
        assert_eq!(link.title, "Task A");
        assert_eq!(link.url, "https://atcoder.jp/contests/abc001/tasks/abc001_a");
        assert_eq!(view.rows[1].link, None);
        assert_eq!(view.rows[1].problem_id, "zzz999_z");
        assert_eq!(view.rows[1].point, Some(250));
    }

    #[test]
    fn test_button_disabled_when_not_submittable() {
        let mut form = form();
        form.set_end_hour(20);
        let View::Form(view) = form.render(&loaded()) else {
            panic!("expected form view");
        };
        assert!(!view.submit.enabled);
    }

    #[test]
    fn test_view_serializes_with_kind_tag() {
        let json = serde_json::to_value(View::Redirect { to: "/".into() }).unwrap();
        assert_eq!(json["kind"], "redirect");
        assert_eq!(json["to"], "/");
    }
}
