use matchit::Router;
use serde::Serialize;
use tracing::debug;

use crate::error::RouteError;

/// Where unknown paths land.
pub const FALLBACK_PATH: &str = "/table/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteTag {
    AcRanking,
    FastestRanking,
    ShortRanking,
    FirstRanking,
    SumRanking,
    StreakRanking,
    LanguageOwners,
    User,
    TableRoot,
    Table,
    ListRoot,
    List,
    ShowContest,
    CreateContest,
    UpdateContest,
    RecentContests,
    UserConfig,
    ProblemList,
}

const ROUTES: &[(&str, RouteTag)] = &[
    ("/ac", RouteTag::AcRanking),
    ("/fast", RouteTag::FastestRanking),
    ("/short", RouteTag::ShortRanking),
    ("/first", RouteTag::FirstRanking),
    ("/sum", RouteTag::SumRanking),
    ("/streak", RouteTag::StreakRanking),
    ("/lang", RouteTag::LanguageOwners),
    ("/user/{*ids}", RouteTag::User),
    ("/table", RouteTag::TableRoot),
    ("/table/{*ids}", RouteTag::Table),
    ("/list", RouteTag::ListRoot),
    ("/list/{*ids}", RouteTag::List),
    ("/contest/show/{contest_id}", RouteTag::ShowContest),
    ("/contest/create", RouteTag::CreateContest),
    ("/contest/update/{contest_id}", RouteTag::UpdateContest),
    ("/contest/recent", RouteTag::RecentContests),
    ("/login/user", RouteTag::UserConfig),
    ("/problemlist/{list_id}", RouteTag::ProblemList),
];

/// A page of the site, with the ids its path carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    AcRanking,
    FastestRanking,
    ShortRanking,
    FirstRanking,
    SumRanking,
    StreakRanking,
    LanguageOwners,
    User { user_ids: Vec<String> },
    Table { user_ids: Vec<String> },
    List { user_ids: Vec<String> },
    ShowContest { contest_id: String },
    CreateContest,
    UpdateContest { contest_id: String },
    RecentContests,
    UserConfig,
    ProblemList { list_id: String },
    Redirect { to: String },
}

impl Route {
    /// Canonical path for this page.
    pub fn path(&self) -> String {
        match self {
            Self::AcRanking => "/ac".into(),
            Self::FastestRanking => "/fast".into(),
            Self::ShortRanking => "/short".into(),
            Self::FirstRanking => "/first".into(),
            Self::SumRanking => "/sum".into(),
            Self::StreakRanking => "/streak".into(),
            Self::LanguageOwners => "/lang".into(),
            Self::User { user_ids } => format!("/user/{}", user_ids.join("/")),
            Self::Table { user_ids } => format!("/table/{}", user_ids.join("/")),
            Self::List { user_ids } => format!("/list/{}", user_ids.join("/")),
            Self::ShowContest { contest_id } => format!("/contest/show/{contest_id}"),
            Self::CreateContest => "/contest/create".into(),
            Self::UpdateContest { contest_id } => format!("/contest/update/{contest_id}"),
            Self::RecentContests => "/contest/recent".into(),
            Self::UserConfig => "/login/user".into(),
            Self::ProblemList { list_id } => format!("/problemlist/{list_id}"),
            Self::Redirect { to } => to.clone(),
        }
    }

    fn fallback() -> Self {
        Self::Redirect {
            to: FALLBACK_PATH.to_string(),
        }
    }
}

/// The active page together with the cross-page state it consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub route: Route,
    pub user_id: Option<String>,
    pub rivals: Vec<String>,
}

/// Top-level page dispatch. Holds the user id and rival ids entered in the
/// navigation bar and hands them to whichever page is active.
pub struct Navigator {
    router: Router<RouteTag>,
    user_id: String,
    rivals: Vec<String>,
}

impl Navigator {
    pub fn new() -> Result<Self, RouteError> {
        let mut router = Router::new();
        for (path, tag) in ROUTES {
            router.insert(*path, *tag)?;
        }
        Ok(Self {
            router,
            user_id: String::new(),
            rivals: Vec::new(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn rivals(&self) -> &[String] {
        &self.rivals
    }

    pub fn update_user_ids(&mut self, user_id: impl Into<String>, rivals: Vec<String>) {
        self.user_id = user_id.into();
        self.rivals = rivals;
    }

    /// Resolve a path (with or without the leading `#`) to a page.
    pub fn dispatch(&self, path: &str) -> Page {
        let route = self.resolve(path);
        debug!(path, route = ?route, "Dispatched");
        let user_id = Some(self.user_id.clone()).filter(|id| !id.is_empty());
        match route {
            Route::User { .. } => Page {
                route,
                user_id,
                rivals: Vec::new(),
            },
            Route::Table { .. } | Route::List { .. } => Page {
                route,
                user_id,
                rivals: self.rivals.clone(),
            },
            route => Page {
                route,
                user_id: None,
                rivals: Vec::new(),
            },
        }
    }

    pub fn resolve(&self, path: &str) -> Route {
        let path = normalize(path);
        let Ok(matched) = self.router.at(&path) else {
            return Route::fallback();
        };
        let params = &matched.params;
        let resolved = match *matched.value {
            RouteTag::AcRanking => Some(Route::AcRanking),
            RouteTag::FastestRanking => Some(Route::FastestRanking),
            RouteTag::ShortRanking => Some(Route::ShortRanking),
            RouteTag::FirstRanking => Some(Route::FirstRanking),
            RouteTag::SumRanking => Some(Route::SumRanking),
            RouteTag::StreakRanking => Some(Route::StreakRanking),
            RouteTag::LanguageOwners => Some(Route::LanguageOwners),
            RouteTag::User => user_ids(params.get("ids"))
                .filter(|ids| !ids.is_empty())
                .map(|user_ids| Route::User { user_ids }),
            RouteTag::TableRoot => Some(Route::Table {
                user_ids: Vec::new(),
            }),
            RouteTag::Table => {
                user_ids(params.get("ids")).map(|user_ids| Route::Table { user_ids })
            }
            RouteTag::ListRoot => Some(Route::List {
                user_ids: Vec::new(),
            }),
            RouteTag::List => user_ids(params.get("ids")).map(|user_ids| Route::List { user_ids }),
            RouteTag::ShowContest => slug(params.get("contest_id"))
                .map(|contest_id| Route::ShowContest { contest_id }),
            RouteTag::CreateContest => Some(Route::CreateContest),
            RouteTag::UpdateContest => slug(params.get("contest_id"))
                .map(|contest_id| Route::UpdateContest { contest_id }),
            RouteTag::RecentContests => Some(Route::RecentContests),
            RouteTag::UserConfig => Some(Route::UserConfig),
            RouteTag::ProblemList => {
                slug(params.get("list_id")).map(|list_id| Route::ProblemList { list_id })
            }
        };
        resolved.unwrap_or_else(Route::fallback)
    }
}

/// Strip a leading `#`, ensure a leading `/`, drop trailing slashes.
fn normalize(path: &str) -> String {
    let path = path.trim().trim_start_matches('#');
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

fn is_user_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// `/`-separated user ids; `None` if any segment is not a valid id.
fn user_ids(raw: Option<&str>) -> Option<Vec<String>> {
    raw.unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| is_user_id(s).then(|| s.to_string()))
        .collect()
}

fn slug(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| is_slug(s)).map(String::from)
}
