use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use client::{ApiClient, ClientError};
use common::config::{ApiConfig, AuthConfig};
use common::{ContestDraft, VirtualContestItem, VirtualContestMode};
use serde_json::{Value, json};

const PREFIX: &str = "/atcoder";

#[derive(Debug, Clone)]
struct Call {
    method: Method,
    path: String,
    cookie: Option<String>,
    body: Value,
}

/// Canned-response server that records every request it sees.
#[derive(Clone, Default)]
struct MockApi {
    responses: Arc<HashMap<String, (u16, String)>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockApi {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

async fn handle(
    State(api): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().trim_start_matches(PREFIX).to_string();
    api.calls.lock().unwrap().push(Call {
        method,
        path: path.clone(),
        cookie: headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    match api.responses.get(&path) {
        Some((status, body)) => (StatusCode::from_u16(*status).unwrap(), body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// Start a server answering `routes` and a client pointed at it.
async fn serve(routes: &[(&str, u16, &str)]) -> (ApiClient, MockApi) {
    let api = MockApi {
        responses: Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        ),
        ..MockApi::default()
    };
    let app = Router::new().fallback(handle).with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}{PREFIX}/"),
        ..ApiConfig::default()
    };
    let auth = AuthConfig {
        token: Some("secret".into()),
    };
    (ApiClient::new(&config, &auth).unwrap(), api)
}

fn draft() -> ContestDraft {
    let mut pointed = VirtualContestItem::new("abc001_b");
    pointed.point = Some(300);
    ContestDraft {
        title: "Weekly".into(),
        memo: "".into(),
        start_second: 1_704_069_000,
        end_second: 1_704_074_400,
        mode: VirtualContestMode::Default,
        problems: vec![VirtualContestItem::new("abc001_a"), pointed],
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn signed_in_session_returns_user() {
        let (client, api) = serve(&[(
            "/internal-api/user/get",
            200,
            r#"{"internal_user_id":"u1","atcoder_user_id":"alice"}"#,
        )])
        .await;

        let user = client.login_state().await.unwrap().unwrap();
        assert_eq!(user.internal_user_id, "u1");
        assert_eq!(user.atcoder_user_id.as_deref(), Some("alice"));
        assert_eq!(api.calls()[0].cookie.as_deref(), Some("token=secret"));
    }

    #[tokio::test]
    async fn unauthorized_and_forbidden_mean_signed_out() {
        for status in [401, 403] {
            let (client, _) = serve(&[("/internal-api/user/get", status, "")]).await;
            assert_eq!(client.login_state().await.unwrap(), None, "status {status}");
        }
    }

    #[tokio::test]
    async fn server_error_is_reported_not_treated_as_signed_out() {
        let (client, _) = serve(&[("/internal-api/user/get", 500, "")]).await;
        match client.login_state().await {
            Err(ClientError::Status { status, url }) => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/atcoder/internal-api/user/get"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}

mod save {
    use super::*;

    #[tokio::test]
    async fn new_contest_is_created_then_items_stored() {
        let (client, api) = serve(&[
            ("/internal-api/contest/create", 200, r#"{"contest_id":"c1"}"#),
            ("/internal-api/contest/item/update", 200, "{}"),
        ])
        .await;

        let id = client.save_draft(&draft(), None).await.unwrap();
        assert_eq!(id, "c1");

        let calls = api.calls();
        assert_eq!(
            api.paths(),
            vec!["/internal-api/contest/create", "/internal-api/contest/item/update"]
        );
        assert!(calls.iter().all(|c| c.method == Method::POST));
        assert_eq!(
            calls[0].body,
            json!({
                "title": "Weekly",
                "memo": "",
                "start_epoch_second": 1_704_069_000i64,
                "duration_second": 5_400,
                "mode": null,
            })
        );
        assert_eq!(calls[1].body["contest_id"], "c1");
        assert_eq!(calls[1].body["problems"][1]["point"], 300);
    }

    #[tokio::test]
    async fn existing_contest_is_updated_then_items_stored() {
        let (client, api) = serve(&[
            ("/internal-api/contest/update", 200, ""),
            ("/internal-api/contest/item/update", 200, ""),
        ])
        .await;

        let id = client.save_draft(&draft(), Some("c9")).await.unwrap();
        assert_eq!(id, "c9");

        let calls = api.calls();
        assert_eq!(
            api.paths(),
            vec!["/internal-api/contest/update", "/internal-api/contest/item/update"]
        );
        assert_eq!(calls[0].body["id"], "c9");
        assert_eq!(calls[0].body["duration_second"], 5_400);
        assert_eq!(calls[1].body["contest_id"], "c9");
    }

    #[tokio::test]
    async fn failed_create_stores_no_items() {
        let (client, api) = serve(&[("/internal-api/contest/create", 500, "")]).await;

        assert!(client.save_draft(&draft(), None).await.is_err());
        assert_eq!(api.paths(), vec!["/internal-api/contest/create"]);
    }
}

mod contests {
    use super::*;

    const LISTING: &str = r#"[{
        "id": "c1",
        "title": "Lockout night",
        "memo": "",
        "owner_user_id": "alice",
        "start_epoch_second": 1704069000,
        "duration_second": 3600,
        "mode": "lockout"
    }]"#;

    #[tokio::test]
    async fn listings_decode_contest_info() {
        let (client, api) = serve(&[
            ("/internal-api/contest/recent", 200, LISTING),
            ("/internal-api/contest/my", 200, "[]"),
            ("/internal-api/contest/joined", 200, LISTING),
        ])
        .await;

        let recent = client.recent_contests().await.unwrap();
        assert_eq!(recent[0].id, "c1");
        assert_eq!(recent[0].mode, VirtualContestMode::Lockout);
        assert!(client.my_contests().await.unwrap().is_empty());
        assert_eq!(client.participated_contests().await.unwrap().len(), 1);
        assert!(api.calls().iter().all(|c| c.method == Method::GET));
    }

    #[tokio::test]
    async fn join_posts_the_contest_id() {
        let (client, api) = serve(&[("/internal-api/contest/join", 200, "{}")]).await;

        client.join_contest("c1").await.unwrap();
        let calls = api.calls();
        assert_eq!(calls[0].path, "/internal-api/contest/join");
        assert_eq!(calls[0].body, json!({"contest_id": "c1"}));
        assert_eq!(calls[0].cookie.as_deref(), Some("token=secret"));
    }
}
