//! JSON HTTP API served with axum.
//!
//! Every route except `/health` and `/api/auth/login` requires a session cookie. Role
//! and section checks happen in the handlers through [`auth::CurrentUser`].

pub mod attendees;
pub mod auth;
pub mod contributions;
pub mod error;
pub mod finance;
pub mod summary;
pub mod users;

use crate::{
    auth::{PasswordService, SessionStore},
    config::AppConfig,
    repository::Repository,
};
use axum::{
    Json, Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub sessions: SessionStore,
    pub passwords: PasswordService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>, config: AppConfig) -> Self {
        Self {
            repo,
            sessions: SessionStore::new(chrono::Duration::hours(config.session.ttl_hours)),
            passwords: PasswordService::new(),
            config: Arc::new(config),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/attendees",
            get(attendees::list_attendees).post(attendees::create_attendee),
        )
        .route("/attendees/import", post(attendees::import_attendees))
        .route(
            "/attendees/{id}",
            get(attendees::get_attendee)
                .put(attendees::update_attendee)
                .delete(attendees::delete_attendee),
        )
        .route(
            "/contributions",
            get(contributions::list_contributions).post(contributions::create_contribution),
        )
        .route(
            "/contributions/reconcile",
            post(contributions::reconcile_contributions),
        )
        .route(
            "/contributions/{id}",
            get(contributions::get_contribution)
                .put(contributions::update_contribution)
                .delete(contributions::delete_contribution),
        )
        .route(
            "/expenses",
            get(finance::list_expenses).post(finance::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(finance::get_expense)
                .put(finance::update_expense)
                .delete(finance::delete_expense),
        )
        .route(
            "/budget-items",
            get(finance::list_budget_items).post(finance::create_budget_item),
        )
        .route(
            "/budget-items/{id}",
            get(finance::get_budget_item)
                .put(finance::update_budget_item)
                .delete(finance::delete_budget_item),
        )
        .route(
            "/categories",
            get(finance::list_categories).post(finance::create_category),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(finance::update_category).delete(finance::delete_category),
        )
        .route("/dashboard/summary", get(summary::dashboard_summary))
        .route("/budget/summary", get(summary::budget_summary))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", axum::routing::delete(users::delete_user));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        auth::seed_superadmin,
        entities::Role,
        models::NewUser,
        repository::MemoryRepository,
    };
    use axum::{
        body::Body,
        http::{
            Request, StatusCode,
            header::{COOKIE, SET_COOKIE},
        },
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
    }

    impl TestApp {
        async fn new() -> Self {
            let state = AppState::new(Arc::new(MemoryRepository::new()), AppConfig::default());
            seed_superadmin(
                state.repo.as_ref(),
                &state.passwords,
                "admin",
                Some("s3cret"),
            )
            .await
            .unwrap();
            Self {
                router: router(state.clone()),
                state,
            }
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            cookie: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value, Option<String>) {
            let mut request = Request::builder()
                .method(method)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json");
            if let Some(cookie) = cookie {
                request = request.header(COOKIE, cookie);
            }
            let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));

            let response = self
                .router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();

            let status = response.status();
            let set_cookie = response
                .headers()
                .get(SET_COOKIE)
                .map(|v| v.to_str().unwrap().to_string());
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json, set_cookie)
        }

        /// Logs in and returns the `name=value` cookie pair.
        async fn login(&self, username: &str, password: &str) -> String {
            let (status, _, set_cookie) = self
                .send(
                    "POST",
                    "/api/auth/login",
                    None,
                    Some(json!({ "username": username, "password": password })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            let set_cookie = set_cookie.unwrap();
            assert!(set_cookie.contains("HttpOnly"));
            assert!(set_cookie.contains("SameSite=Lax"));
            set_cookie.split(';').next().unwrap().to_string()
        }

        async fn section_admin(&self, username: &str, section: &str) -> String {
            self.state
                .repo
                .create_user(NewUser {
                    username: username.to_string(),
                    password_hash: self.state.passwords.hash_password("pw").unwrap(),
                    role: Role::SectionAdmin,
                    section: Some(section.to_string()),
                    attendee_id: None,
                })
                .await
                .unwrap();
            self.login(username, "pw").await
        }
    }

    fn attendee_body(first_name: &str, section: &str, mobile: &str) -> Value {
        json!({
            "firstName": first_name,
            "lastName": "Tester",
            "section": section,
            "mobile": mobile,
        })
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new().await;
        let (status, body, _) = app.send("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_requests_without_session_are_unauthorized() {
        let app = TestApp::new().await;
        let (status, _, _) = app.send("GET", "/api/attendees", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = app
            .send("GET", "/api/auth/me", Some("reunion_session=bogus"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = app
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "admin", "password": "wrong" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_contribution_flow_updates_attendee_and_dashboard() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;

        let (status, ana, _) = app
            .send(
                "POST",
                "/api/attendees",
                Some(&admin),
                Some(attendee_body("Ana", "A", "0917000001")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(ana["paidStatus"], "not_paid");
        let ana_id = ana["id"].as_i64().unwrap();

        let (status, contribution, _) = app
            .send(
                "POST",
                "/api/contributions",
                Some(&admin),
                Some(json!({ "attendeeId": ana_id, "amount": 500, "date": "2026-01-05" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(contribution["amount"], 500);

        let (_, ana, _) = app
            .send("GET", &format!("/api/attendees/{ana_id}"), Some(&admin), None)
            .await;
        assert_eq!(ana["contributionAmount"], 500);
        assert_eq!(ana["paidStatus"], "paid");

        let (status, _, _) = app
            .send(
                "POST",
                "/api/contributions",
                Some(&admin),
                Some(json!({ "attendeeId": ana_id, "amount": 0 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, dashboard, _) = app
            .send("GET", "/api/dashboard/summary", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["totalContributions"], 500);
        assert_eq!(dashboard["total"], 1);
        assert_eq!(dashboard["paid"], 1);
    }

    #[tokio::test]
    async fn test_section_admin_is_scoped_to_own_section() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;
        let section_a = app.section_admin("lead-a", "A").await;

        app.send(
            "POST",
            "/api/attendees",
            Some(&admin),
            Some(attendee_body("Ben", "B", "0917000002")),
        )
        .await;

        let (status, _, _) = app
            .send(
                "POST",
                "/api/attendees",
                Some(&section_a),
                Some(attendee_body("Carl", "B", "0917000003")),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = app
            .send(
                "POST",
                "/api/attendees",
                Some(&section_a),
                Some(attendee_body("Dan", "Z", "0917000004")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, listed, _) = app
            .send("GET", "/api/attendees", Some(&section_a), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(listed.as_array().unwrap().is_empty());

        let (status, _, _) = app
            .send("POST", "/api/contributions/reconcile", Some(&section_a), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_student_sees_only_own_records() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;

        let (_, ana, _) = app
            .send(
                "POST",
                "/api/attendees",
                Some(&admin),
                Some(attendee_body("Ana", "A", "0917000001")),
            )
            .await;
        let (_, ben, _) = app
            .send(
                "POST",
                "/api/attendees",
                Some(&admin),
                Some(attendee_body("Ben", "A", "0917000002")),
            )
            .await;
        for attendee in [&ana, &ben] {
            app.send(
                "POST",
                "/api/contributions",
                Some(&admin),
                Some(json!({ "attendeeId": attendee["id"], "amount": 100 })),
            )
            .await;
        }

        let student = app.login("0917000001", "0917000001").await;

        let (status, own, _) = app
            .send("GET", "/api/contributions", Some(&student), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let own = own.as_array().unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0]["attendeeId"], ana["id"]);

        let (status, _, _) = app
            .send("GET", &format!("/api/attendees/{}", ben["id"]), Some(&student), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = app
            .send(
                "POST",
                "/api/contributions",
                Some(&student),
                Some(json!({ "attendeeId": ana["id"], "amount": 100 })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_student_login_follows_mobile_change_and_delete() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;

        let (_, ana, _) = app
            .send(
                "POST",
                "/api/attendees",
                Some(&admin),
                Some(attendee_body("Ana", "A", "0917000001")),
            )
            .await;
        let ana_uri = format!("/api/attendees/{}", ana["id"]);

        let (status, updated, _) = app
            .send(
                "PUT",
                &ana_uri,
                Some(&admin),
                Some(json!({ "mobile": "0917000099" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["mobile"], "0917000099");

        let (status, _, _) = app
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "0917000001", "password": "0917000001" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let student = app.login("0917000099", "0917000099").await;
        let (status, _, _) = app.send("GET", &ana_uri, Some(&student), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = app.send("DELETE", &ana_uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _, _) = app.send("GET", "/api/auth/me", Some(&student), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;

        let (status, me, _) = app.send("GET", "/api/auth/me", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["role"], "superadmin");

        let (status, _, set_cookie) = app
            .send("POST", "/api/auth/logout", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(set_cookie.unwrap().contains("Max-Age=0"));

        let (status, _, _) = app.send("GET", "/api/auth/me", Some(&admin), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_import_reports_unknown_sections_at_input_position() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;

        let (status, report, _) = app
            .send(
                "POST",
                "/api/attendees/import",
                Some(&admin),
                Some(json!([
                    attendee_body("Ana", "A", "0917000001"),
                    attendee_body("Ben", "Z", "0917000002"),
                    attendee_body("", "B", "0917000003"),
                    attendee_body("Dan", "B", "0917000004"),
                ])),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["created"], 2);
        let failed: Vec<i64> = report["failures"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["index"].as_i64().unwrap())
            .collect();
        assert_eq!(failed, vec![1, 2]);

        // Created attendees can log in straight away
        app.login("0917000004", "0917000004").await;
    }

    #[tokio::test]
    async fn test_finance_writes_need_superadmin() {
        let app = TestApp::new().await;
        let admin = app.login("admin", "s3cret").await;
        let section_a = app.section_admin("lead-a", "A").await;
        let expense = json!({
            "title": "Hall deposit",
            "category": "venue",
            "amount": 1000,
            "date": "2026-02-01",
        });

        let (status, _, _) = app
            .send("POST", "/api/expenses", Some(&section_a), Some(expense.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, created, _) = app
            .send("POST", "/api/expenses", Some(&admin), Some(expense))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, listed, _) = app
            .send("GET", "/api/expenses?category=venue", Some(&section_a), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["id"], created["id"]);

        let (status, budget, _) = app
            .send("GET", "/api/budget/summary", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(budget["totalExpenses"], 1000);
        assert_eq!(budget["balance"], -1000);

        let (status, _, _) = app
            .send("DELETE", "/api/expenses/999", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
