use std::time::Duration;

use async_trait::async_trait;
use common::config::{ApiConfig, AuthConfig};
use common::virtual_contest::{
    CreateContestRequest, CreateContestResponse, JoinContestRequest, UpdateContestRequest,
    UpdateItemsRequest,
};
use common::{
    ContestDraft, Problem, ProblemMap, ProblemModelMap, VirtualContestDetails,
    VirtualContestInfo, VirtualContestItem, index_problems,
};
use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::source::ReferenceSource;

const PROBLEMS_PATH: &str = "resources/problems.json";
const PROBLEM_MODELS_PATH: &str = "resources/problem-models.json";
const USER_GET_PATH: &str = "internal-api/user/get";
const CONTEST_CREATE_PATH: &str = "internal-api/contest/create";
const CONTEST_UPDATE_PATH: &str = "internal-api/contest/update";
const CONTEST_ITEM_UPDATE_PATH: &str = "internal-api/contest/item/update";
const CONTEST_GET_PATH: &str = "internal-api/contest/get";
const CONTEST_RECENT_PATH: &str = "internal-api/contest/recent";
const CONTEST_MY_PATH: &str = "internal-api/contest/my";
const CONTEST_JOINED_PATH: &str = "internal-api/contest/joined";
const CONTEST_JOIN_PATH: &str = "internal-api/contest/join";

/// Signed-in user as reported by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub internal_user_id: String,
    #[serde(default)]
    pub atcoder_user_id: Option<String>,
}

/// Thin JSON client over the site's public resources and internal API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(api: &ApiConfig, auth: &AuthConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: auth.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Join a relative API path onto the configured base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(COOKIE, format!("token={token}")),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: String,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self.with_session(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.send(self.http.get(&url), url).await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.send(self.http.post(&url).json(body), url).await?;
        Self::decode(response).await
    }

    /// POST whose response body carries nothing of interest.
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        self.send(self.http.post(&url).json(body), url).await?;
        Ok(())
    }

    /// Check the session. `Ok(None)` means the server rejected it.
    pub async fn login_state(&self) -> Result<Option<UserInfo>, ClientError> {
        match self.get_json::<UserInfo>(USER_GET_PATH).await {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_contest(
        &self,
        contest_id: &str,
    ) -> Result<VirtualContestDetails, ClientError> {
        self.get_json(&format!("{CONTEST_GET_PATH}/{contest_id}")).await
    }

    /// Public contests, most recent first.
    pub async fn recent_contests(&self) -> Result<Vec<VirtualContestInfo>, ClientError> {
        self.get_json(CONTEST_RECENT_PATH).await
    }

    /// Contests owned by the signed-in user.
    pub async fn my_contests(&self) -> Result<Vec<VirtualContestInfo>, ClientError> {
        self.get_json(CONTEST_MY_PATH).await
    }

    /// Contests the signed-in user has joined.
    pub async fn participated_contests(&self) -> Result<Vec<VirtualContestInfo>, ClientError> {
        self.get_json(CONTEST_JOINED_PATH).await
    }

    pub async fn join_contest(&self, contest_id: &str) -> Result<(), ClientError> {
        let body = JoinContestRequest {
            contest_id: contest_id.to_string(),
        };
        self.post(CONTEST_JOIN_PATH, &body).await?;
        info!(contest_id, "Joined contest");
        Ok(())
    }

    /// Create a contest and return its id. Items are stored separately.
    pub async fn create_contest(&self, draft: &ContestDraft) -> Result<String, ClientError> {
        let body = CreateContestRequest::from(draft);
        let response: CreateContestResponse = self.post_json(CONTEST_CREATE_PATH, &body).await?;
        info!(contest_id = %response.contest_id, "Contest created");
        Ok(response.contest_id)
    }

    pub async fn update_contest(
        &self,
        contest_id: &str,
        draft: &ContestDraft,
    ) -> Result<(), ClientError> {
        let body = UpdateContestRequest::from_draft(contest_id, draft);
        self.post(CONTEST_UPDATE_PATH, &body).await?;
        info!(contest_id, "Contest updated");
        Ok(())
    }

    pub async fn update_items(
        &self,
        contest_id: &str,
        problems: &[VirtualContestItem],
    ) -> Result<(), ClientError> {
        let body = UpdateItemsRequest {
            contest_id: contest_id.to_string(),
            problems: problems.to_vec(),
        };
        self.post(CONTEST_ITEM_UPDATE_PATH, &body).await?;
        info!(contest_id, items = problems.len(), "Contest items updated");
        Ok(())
    }

    /// Persist a draft: create (or update `existing`) then store its items.
    pub async fn save_draft(
        &self,
        draft: &ContestDraft,
        existing: Option<&str>,
    ) -> Result<String, ClientError> {
        let contest_id = match existing {
            Some(id) => {
                self.update_contest(id, draft).await?;
                id.to_string()
            }
            None => self.create_contest(draft).await?,
        };
        self.update_items(&contest_id, &draft.problems).await?;
        Ok(contest_id)
    }
}

#[async_trait]
impl ReferenceSource for ApiClient {
    async fn fetch_problems(&self) -> Result<ProblemMap, ClientError> {
        let problems: Vec<Problem> = self.get_json(PROBLEMS_PATH).await?;
        Ok(index_problems(problems))
    }

    async fn fetch_problem_models(&self) -> Result<ProblemModelMap, ClientError> {
        self.get_json(PROBLEM_MODELS_PATH).await
    }
}
