#![allow(dead_code, unused_macros)]

use std::sync::Arc;
use userlist_server::{AppState, MemoryStore, Settings};

pub fn test_state() -> AppState {
    let mut settings = Settings::from_defaults().expect("Failed to load test config");
    settings.auth.jwt_secret = "test_secret".to_string();
    AppState::with_store(settings, Arc::new(MemoryStore::new()))
}

/// Build a test service with every route wired to `$state`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(userlist_server::configure),
        )
        .await
    };
}

/// Register a user and log in, evaluating to the bearer token.
macro_rules! register_and_login {
    ($app:expr, $username:expr, $password:expr) => {{
        let resp = actix_web::test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(serde_json::json!({
                "username": $username,
                "password": $password,
                "email": format!("{}@example.com", $username),
            }))
            .send_request($app)
            .await;
        assert_eq!(resp.status(), 200);

        let resp = actix_web::test::TestRequest::post()
            .uri("/api/user/login")
            .set_json(serde_json::json!({ "username": $username, "password": $password }))
            .send_request($app)
            .await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        body["token"].as_str().expect("token in login response").to_string()
    }};
}
