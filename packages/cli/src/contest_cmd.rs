use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use client::{ApiClient, ClientError, ReferenceCache, ReferenceSource, UserInfo};
use common::{ProblemMap, ProblemModelMap, VirtualContestMode};
use contest::supplier::DifficultyRange;
use contest::{
    ContestConfigForm, ContestConfigInit, FetchState, Gates, ProblemSetGenerator, Route, View,
};
use dialoguer::Confirm;
use tracing::{info, warn};

use crate::config::CliAppConfig;
use crate::render;

#[derive(Args, Debug, Default)]
pub struct ContestArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub memo: Option<String>,
    /// Start date, YYYY-MM-DD (JST)
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub start_hour: Option<u32>,
    #[arg(long)]
    pub start_minute: Option<u32>,
    /// End date, YYYY-MM-DD (JST)
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub end_hour: Option<u32>,
    #[arg(long)]
    pub end_minute: Option<u32>,
    /// normal or lockout
    #[arg(long)]
    pub mode: Option<VirtualContestMode>,
    /// Problem id to add (repeatable)
    #[arg(long = "problem")]
    pub problems: Vec<String>,
    /// Problem id to remove (repeatable)
    #[arg(long = "remove")]
    pub removals: Vec<String>,
    /// Point override as ID=VALUE (repeatable)
    #[arg(long = "point")]
    pub points: Vec<String>,
    /// Reset a problem to default scoring (repeatable)
    #[arg(long = "unset-point")]
    pub unset_points: Vec<String>,
    /// Number of random problems to draw
    #[arg(long, default_value_t = 0)]
    pub gacha: usize,
    #[arg(long)]
    pub min_difficulty: Option<f64>,
    #[arg(long)]
    pub max_difficulty: Option<f64>,
    #[arg(long)]
    pub exclude_experimental: bool,
    /// Seed for the random draw
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print the draft instead of saving it
    #[arg(long)]
    pub dry_run: bool,
    /// Save without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

pub enum Target {
    Create,
    Update(String),
}

impl ContestArgs {
    /// Apply the scalar field edits.
    fn apply_fields(&self, form: &mut ContestConfigForm) {
        if let Some(title) = &self.title {
            form.set_title(title);
        }
        if let Some(memo) = &self.memo {
            form.set_memo(memo);
        }
        if let Some(mode) = self.mode {
            form.set_mode(mode);
        }
        if let Some(date) = &self.start_date {
            form.set_start_date(date);
        }
        if let Some(hour) = self.start_hour {
            form.set_start_hour(hour);
        }
        if let Some(minute) = self.start_minute {
            form.set_start_minute(minute);
        }
        if let Some(date) = &self.end_date {
            form.set_end_date(date);
        }
        if let Some(hour) = self.end_hour {
            form.set_end_hour(hour);
        }
        if let Some(minute) = self.end_minute {
            form.set_end_minute(minute);
        }
    }

    /// Apply problem list edits. Needs the loaded reference data.
    fn apply_problems(
        &self,
        form: &mut ContestConfigForm,
        problems: &ProblemMap,
        models: &Arc<ProblemModelMap>,
    ) -> Result<()> {
        for id in &self.removals {
            if !form.remove_problem(id) {
                warn!(problem_id = %id, "Problem not in contest, nothing removed");
            }
        }

        let mut selected = Vec::new();
        for id in &self.problems {
            match problems.get(id) {
                Some(problem) => selected.push(problem),
                None => warn!(problem_id = %id, "Unknown problem id, skipped"),
            }
        }
        form.add_problems(selected);

        if self.gacha > 0 {
            let range = DifficultyRange::new(
                self.min_difficulty.unwrap_or(f64::NEG_INFINITY),
                self.max_difficulty.unwrap_or(f64::INFINITY),
            );
            let mut generator =
                ProblemSetGenerator::new(problems.values().cloned(), Arc::clone(models))
                    .count(self.gacha)
                    .difficulty(range)
                    .exclude_experimental(self.exclude_experimental);
            if let Some(seed) = self.seed {
                generator = generator.seed(seed);
            }
            let added = form.add_from(&generator);
            info!(requested = self.gacha, added, "Drew random problems");
        }

        for entry in &self.points {
            let (id, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid --point '{entry}', expected ID=VALUE"))?;
            let index = form
                .problems()
                .position(id)
                .ok_or_else(|| anyhow!("Cannot set point: '{id}' is not in the contest"))?;
            form.set_point_input(index, value);
        }
        for id in &self.unset_points {
            match form.problems().position(id) {
                Some(index) => form.unset_point(index),
                None => warn!(problem_id = %id, "Problem not in contest, point left as is"),
            }
        }
        Ok(())
    }
}

/// Map the session check onto the login gate. Any failure to confirm the
/// session counts as rejected; the reason is kept for the error message.
fn login_gate(result: Result<Option<UserInfo>, ClientError>) -> FetchState<()> {
    match result {
        Ok(Some(user)) => {
            info!(user_id = %user.internal_user_id, "Signed in");
            FetchState::Fulfilled(())
        }
        Ok(None) => FetchState::Rejected("session rejected by the server".into()),
        Err(e) => FetchState::Rejected(format!("session check failed: {e}")),
    }
}

fn redirect_error(to: &str, login: &FetchState<()>) -> anyhow::Error {
    let reason = match login {
        FetchState::Rejected(reason) => reason.as_str(),
        _ => "not signed in",
    };
    anyhow!(
        "Cannot continue without a session: {reason} (redirect to {to}). \
         If no session is configured, set auth.token or BACHA__AUTH__TOKEN"
    )
}

pub async fn run(
    config: &CliAppConfig,
    target: Target,
    args: &ContestArgs,
    json: bool,
) -> Result<()> {
    let api = ApiClient::new(&config.api, &config.auth).context("Failed to build API client")?;
    let api = Arc::new(api);
    let cache = ReferenceCache::new(Arc::clone(&api) as Arc<dyn ReferenceSource>);

    let (init, page_title, button_title) = match &target {
        Target::Create => (
            ContestConfigInit::default(),
            "Create Contest",
            "Create Contest",
        ),
        Target::Update(contest_id) => {
            let details = api
                .get_contest(contest_id)
                .await
                .with_context(|| format!("Failed to load contest {contest_id}"))?;
            (
                ContestConfigInit::from_details(&details),
                "Update Contest",
                "Update",
            )
        }
    };
    let mut form = ContestConfigForm::new(page_title, button_title, init);
    args.apply_fields(&mut form);

    // Saving needs a session; a dry run only needs the reference data.
    let login = if args.dry_run {
        FetchState::Fulfilled(())
    } else {
        login_gate(api.login_state().await)
    };
    let (problems, problem_models) = tokio::join!(cache.problems(), cache.problem_models());
    let gates = Gates {
        login,
        problems: FetchState::from_result(problems),
        problem_models: FetchState::from_result(problem_models),
    };

    if let (Some(problems), Some(models)) = (gates.problems.value(), gates.problem_models.value()) {
        args.apply_problems(&mut form, problems, models)?;
    }

    let view = form.render(&gates);
    render::print_view(&view, json)?;
    match view {
        View::Redirect { to } => return Err(redirect_error(&to, &gates.login)),
        View::Empty => {
            fn rejection<T>(state: &FetchState<T>) -> Option<&String> {
                match state {
                    FetchState::Rejected(e) => Some(e),
                    _ => None,
                }
            }
            let reasons: Vec<String> = [
                ("problems", rejection(&gates.problems)),
                ("problem models", rejection(&gates.problem_models)),
            ]
            .into_iter()
            .filter_map(|(name, e)| e.map(|e| format!("{name}: {e}")))
            .collect();
            bail!("Reference data unavailable ({})", reasons.join("; "));
        }
        View::Form(_) => {}
    }

    let mut submitted = None;
    form.submit(|draft| submitted = Some(draft))
        .context("Contest cannot be submitted")?;
    let Some(draft) = submitted else {
        bail!("Contest cannot be submitted");
    };

    if args.dry_run {
        return render::print_draft(&draft);
    }

    if !args.yes
        && !Confirm::new()
            .with_prompt(format!("{} '{}'?", form.button_title(), draft.title))
            .default(true)
            .interact()?
    {
        info!("Aborted");
        return Ok(());
    }

    let existing = match &target {
        Target::Create => None,
        Target::Update(id) => Some(id.as_str()),
    };
    let contest_id = api
        .save_draft(&draft, existing)
        .await
        .context("Failed to save contest")?;

    let path = Route::ShowContest { contest_id }.path();
    println!("{}", api.url(&format!("#{path}")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Problem, ProblemModel, index_problems};

    fn reference() -> (ProblemMap, Arc<ProblemModelMap>) {
        let problems = index_problems(vec![
            Problem::new("abc001_a", "abc001", "A"),
            Problem::new("abc001_b", "abc001", "B"),
        ]);
        let mut models = ProblemModelMap::new();
        models.insert("abc001_a".into(), ProblemModel::with_difficulty(100.0));
        models.insert("abc001_b".into(), ProblemModel::with_difficulty(900.0));
        (problems, Arc::new(models))
    }

    fn form() -> ContestConfigForm {
        ContestConfigForm::new("Create Contest", "Create", ContestConfigInit::default())
    }

    #[test]
    fn test_apply_fields() {
        let args = ContestArgs {
            title: Some("Night Bacha".into()),
            start_date: Some("2024-05-01".into()),
            start_hour: Some(21),
            end_date: Some("2024-05-01".into()),
            end_hour: Some(22),
            end_minute: Some(40),
            mode: Some(VirtualContestMode::Lockout),
            ..ContestArgs::default()
        };
        let mut form = form();
        args.apply_fields(&mut form);
        let draft = form.draft().unwrap();
        assert_eq!(draft.title, "Night Bacha");
        assert_eq!(draft.mode, VirtualContestMode::Lockout);
        assert_eq!(draft.duration_second(), 100 * 60);
    }

    #[test]
    fn test_apply_problems_and_points() {
        let (problems, models) = reference();
        let args = ContestArgs {
            problems: vec!["abc001_b".into(), "missing".into(), "abc001_a".into()],
            points: vec!["abc001_a=oops".into(), "abc001_b=400".into()],
            ..ContestArgs::default()
        };
        let mut form = form();
        args.apply_problems(&mut form, &problems, &models).unwrap();

        let items = form.problems().items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "abc001_b");
        assert_eq!(items[0].point, Some(400));
        assert_eq!(items[1].point, Some(0));
    }

    #[test]
    fn test_point_for_missing_problem_is_an_error() {
        let (problems, models) = reference();
        let args = ContestArgs {
            points: vec!["abc001_a=100".into()],
            ..ContestArgs::default()
        };
        assert!(args.apply_problems(&mut form(), &problems, &models).is_err());
    }

    #[test]
    fn test_gacha_draws_within_range() {
        let (problems, models) = reference();
        let args = ContestArgs {
            gacha: 5,
            min_difficulty: Some(800.0),
            seed: Some(1),
            ..ContestArgs::default()
        };
        let mut form = form();
        args.apply_problems(&mut form, &problems, &models).unwrap();
        let ids: Vec<_> = form.problems().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["abc001_b"]);
    }

    #[test]
    fn test_login_gate_states() {
        let user = UserInfo {
            internal_user_id: "u1".into(),
            atcoder_user_id: None,
        };
        assert_eq!(login_gate(Ok(Some(user))), FetchState::Fulfilled(()));
        assert!(login_gate(Ok(None)).is_rejected());
    }

    #[test]
    fn test_redirect_error_names_the_transport_failure() {
        let failure = ClientError::Status {
            status: 502,
            url: "https://example.com/internal-api/user/get".into(),
        };
        let gate = login_gate(Err(failure));
        let FetchState::Rejected(reason) = &gate else {
            panic!("expected rejected gate");
        };
        assert!(reason.contains("session check failed"));
        assert!(reason.contains("502"));

        let message = redirect_error("/", &gate).to_string();
        assert!(message.contains("Unexpected status 502"));
        assert!(message.contains("redirect to /"));
    }

    #[test]
    fn test_redirect_error_for_rejected_session() {
        let message = redirect_error("/", &login_gate(Ok(None))).to_string();
        assert!(message.contains("session rejected by the server"));
        assert!(message.contains("BACHA__AUTH__TOKEN"));
    }
}
