use blogapi_auth::{TokenClaims, TokenSettings, TokenType};
use blogapi_core::UserId;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

const SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = blogapi_api::app::build_app(TokenSettings::new(SECRET)).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn register(&self, username: &str, password: &str) -> Value {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> Value {
        let res = self
            .client
            .post(self.url("/auth/token"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn access_token(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        let tokens = self.login(username, password).await;
        tokens["access_token"].as_str().unwrap().to_string()
    }

    async fn create_post(&self, token: &str, title: &str) -> Value {
        let res = self
            .client
            .post(self.url("/posts"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "body": "B" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn anonymous_titles(&self) -> Vec<String> {
        let res = self.client.get(self.url("/posts")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, user_id: i64, token_type: TokenType, lifetime: ChronoDuration) -> String {
    let iat = Utc::now() - ChronoDuration::hours(1);
    let claims = TokenClaims {
        user_id: UserId::new(user_id),
        username: "alice".to_string(),
        token_type,
        iat,
        exp: iat + lifetime,
        jti: uuid::Uuid::now_v7(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn error_kind(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_open() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whoami_requires_authentication() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(res).await, "authentication_required");

    let token = srv.access_token("alice", "pw1").await;
    let res = srv
        .client
        .get(srv.url("/whoami"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn token_response_carries_identity() {
    let srv = TestServer::spawn().await;
    let user = srv.register("alice", "pw1").await;
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let tokens = srv.login("alice", "pw1").await;
    assert_eq!(tokens["user_id"], user["id"]);
    assert_eq!(tokens["username"], "alice");
    assert!(tokens["access_token"].is_string());
    assert!(tokens["refresh_token"].is_string());
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    srv.register("alice", "pw1").await;

    let wrong_password = srv
        .client
        .post(srv.url("/auth/token"))
        .json(&json!({ "username": "alice", "password": "nope" }))
        .send()
        .await
        .unwrap();
    let unknown_user = srv
        .client
        .post(srv.url("/auth/token"))
        .json(&json!({ "username": "mallory", "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_user.json().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a["error"], "invalid_credentials");
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let srv = TestServer::spawn().await;
    srv.register("alice", "pw1").await;

    let res = srv
        .client
        .post(srv.url("/users"))
        .json(&json!({ "username": "alice", "password": "other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_kind(res).await, "duplicate_username");
}

#[tokio::test]
async fn publish_flow_and_ownership() {
    let srv = TestServer::spawn().await;
    let alice = srv.access_token("alice", "pw1").await;
    let bob = srv.access_token("bob", "pw2").await;

    // Client-supplied author is ignored.
    let res = srv
        .client
        .post(srv.url("/posts"))
        .bearer_auth(&alice)
        .json(&json!({ "title": "T", "body": "B", "author": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let post: Value = res.json().await.unwrap();
    assert_eq!(post["author"]["username"], "alice");
    assert_eq!(post["is_published"], false);
    let id = post["id"].as_i64().unwrap();

    assert!(srv.anonymous_titles().await.is_empty());

    // Drafts are hidden from anonymous readers, without revealing they exist.
    let hidden = srv.client.get(srv.url(&format!("/posts/{id}"))).send().await.unwrap();
    let missing = srv.client.get(srv.url("/posts/9999")).send().await.unwrap();
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let hidden: Value = hidden.json().await.unwrap();
    let missing: Value = missing.json().await.unwrap();
    assert_eq!(hidden, missing);

    // Any authenticated actor sees drafts in the listing.
    let res = srv
        .client
        .get(srv.url("/posts"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let res = srv
        .client
        .patch(srv.url(&format!("/posts/{id}")))
        .bearer_auth(&alice)
        .json(&json!({ "is_published": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(srv.anonymous_titles().await, vec!["T".to_string()]);

    let res = srv
        .client
        .patch(srv.url(&format!("/posts/{id}")))
        .bearer_auth(&bob)
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_kind(res).await, "ownership_violation");

    let res = srv
        .client
        .patch(srv.url(&format!("/posts/{id}")))
        .json(&json!({ "title": "anon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(res).await, "authentication_required");

    let res = srv
        .client
        .patch(srv.url(&format!("/posts/{id}")))
        .bearer_auth(&alice)
        .json(&json!({ "title": "T2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["title"], "T2");
}

#[tokio::test]
async fn comment_belongs_to_its_author_not_the_post_author() {
    let srv = TestServer::spawn().await;
    let alice = srv.access_token("alice", "pw1").await;
    let bob = srv.access_token("bob", "pw2").await;
    let post = srv.create_post(&alice, "T").await;
    let post_id = post["id"].as_i64().unwrap();

    let res = srv
        .client
        .post(srv.url(&format!("/posts/{post_id}/comments")))
        .json(&json!({ "body": "anon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url(&format!("/posts/{post_id}/comments")))
        .bearer_auth(&bob)
        .json(&json!({ "body": "nice post", "is_approved": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let comment: Value = res.json().await.unwrap();
    assert_eq!(comment["is_approved"], false);
    let comment_id = comment["id"].as_i64().unwrap();

    let res = srv
        .client
        .delete(srv.url(&format!("/comments/{comment_id}")))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .delete(srv.url(&format!("/comments/{comment_id}")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .get(srv.url(&format!("/comments/{comment_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_on_missing_posts_are_not_found() {
    let srv = TestServer::spawn().await;
    let bob = srv.access_token("bob", "pw2").await;

    let res = srv
        .client
        .post(srv.url("/posts/9999/comments"))
        .bearer_auth(&bob)
        .json(&json!({ "body": "hello?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn presented_bad_tokens_are_rejected_even_on_open_endpoints() {
    let srv = TestServer::spawn().await;
    srv.register("alice", "pw1").await;

    let cases = [
        (mint_jwt(SECRET, 1, TokenType::Access, ChronoDuration::minutes(5)), "token_expired"),
        (mint_jwt("other-secret", 1, TokenType::Access, ChronoDuration::hours(2)), "token_bad_signature"),
        (mint_jwt(SECRET, 1, TokenType::Refresh, ChronoDuration::hours(2)), "token_wrong_type"),
        (mint_jwt(SECRET, 42, TokenType::Access, ChronoDuration::hours(2)), "unknown_user"),
        ("not-a-jwt".to_string(), "token_malformed"),
    ];

    for (token, kind) in cases {
        let res = srv
            .client
            .get(srv.url("/posts"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{kind}");
        assert_eq!(error_kind(res).await, kind);
    }

    let valid = mint_jwt(SECRET, 1, TokenType::Access, ChronoDuration::hours(2));
    let res = srv
        .client
        .get(srv.url("/whoami"))
        .bearer_auth(&valid)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_exchanges_only_refresh_tokens() {
    let srv = TestServer::spawn().await;
    srv.register("alice", "pw1").await;
    let tokens = srv.login("alice", "pw1").await;

    let res = srv
        .client
        .post(srv.url("/auth/token/refresh"))
        .json(&json!({ "refresh": tokens["refresh_token"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let access = body["access_token"].as_str().unwrap();

    let res = srv
        .client
        .get(srv.url("/whoami"))
        .bearer_auth(access)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .post(srv.url("/auth/token/refresh"))
        .json(&json!({ "refresh_token": tokens["access_token"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(res).await, "token_wrong_type");
}

#[tokio::test]
async fn deleting_a_user_invalidates_their_tokens_and_content() {
    let srv = TestServer::spawn().await;
    let alice_user = srv.register("alice", "pw1").await;
    let alice = srv.login("alice", "pw1").await["access_token"].as_str().unwrap().to_string();
    let bob = srv.access_token("bob", "pw2").await;

    let post = srv.create_post(&alice, "T").await;
    let post_id = post["id"].as_i64().unwrap();

    let res = srv
        .client
        .delete(srv.url(&format!("/users/{}", alice_user["id"])))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .get(srv.url("/whoami"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(res).await, "unknown_user");

    let res = srv
        .client
        .get(srv.url(&format!("/posts/{post_id}")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Listings keep working for everyone else.
    srv.create_post(&bob, "still here").await;
    let res = srv
        .client
        .get(srv.url("/posts"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["author"]["username"], "bob");
}

#[tokio::test]
async fn malformed_input_is_a_client_error() {
    let srv = TestServer::spawn().await;
    let alice = srv.access_token("alice", "pw1").await;

    let res = srv
        .client
        .post(srv.url("/posts"))
        .bearer_auth(&alice)
        .json(&json!({ "title": "   ", "body": "B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(res).await, "validation_error");

    let res = srv
        .client
        .get(srv.url("/posts/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(res).await, "invalid_id");
}
