//! End-to-end auth flows against a mocked backend.

use secrecy::ExposeSecret;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unibazaar_client::auth::{AuthError, OtpIdentifier};
use unibazaar_client::config::ClientConfig;
use unibazaar_client::storage::SessionStore;
use unibazaar_client::{Market, api::ApiError};
use unibazaar_core::{Email, LoginForm, UserId};

fn market_config(server: &MockServer, state_dir: &TempDir) -> ClientConfig {
    let mut config = ClientConfig::for_api_url(&server.uri()).expect("valid mock uri");
    config.state_dir = state_dir.path().to_path_buf();
    config
}

fn user_json(id: i32, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Ade Okon",
        "email": email,
        "role": "user"
    })
}

fn auth_ok(id: i32, email: &str, token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "user": user_json(id, email),
        "token": token
    }))
}

#[tokio::test]
async fn login_replaces_user_and_persists_both_entries() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(auth_ok(1, "ade@campus.edu", "tok-123"))
        .expect(1)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    assert!(!market.auth().is_logged_in());

    let user = market
        .auth()
        .login(LoginForm::with_email("ade@campus.edu", "hunter2!"))
        .await
        .expect("login succeeds");

    assert_eq!(user.id, UserId::new(1));
    assert!(market.auth().is_logged_in());

    // Both durable entries were written together.
    let store = SessionStore::new(state_dir.path().to_path_buf());
    assert_eq!(store.load_user().expect("user persisted").id, UserId::new(1));
    assert_eq!(
        store.load_token().expect("token persisted").expose_secret(),
        "tok-123"
    );
}

#[tokio::test]
async fn session_token_is_attached_after_login() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(auth_ok(1, "ade@campus.edu", "tok-123"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    market
        .auth()
        .login(LoginForm::with_email("ade@campus.edu", "hunter2!"))
        .await
        .expect("login succeeds");

    // The bearer-token matcher above is the assertion.
    market.cart().items().await.expect("cart fetch succeeds");
}

#[tokio::test]
async fn rejected_login_mutates_nothing() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    let err = market
        .auth()
        .login(LoginForm::with_email("ade@campus.edu", "wrong"))
        .await
        .expect_err("login rejected");

    match err {
        AuthError::Api(api) => assert!(api.is_unauthorized()),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(!market.auth().is_logged_in());
    let store = SessionStore::new(state_dir.path().to_path_buf());
    assert!(store.load_user().is_none());
    assert!(store.load_token().is_none());
}

#[tokio::test]
async fn malformed_combination_never_issues_a_request() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(auth_ok(1, "ade@campus.edu", "tok-123"))
        .expect(0)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));

    // Two identifiers at once.
    let form = LoginForm {
        email: Some("ade@campus.edu".to_owned()),
        username: Some("ade".to_owned()),
        password: Some("hunter2!".to_owned()),
        ..LoginForm::default()
    };
    let err = market.auth().login(form).await.expect_err("shape rejected");
    assert!(matches!(err, AuthError::Credential(_)));
    assert!(!market.auth().is_logged_in());
}

#[tokio::test]
async fn corrupt_persisted_user_starts_logged_out_and_is_removed() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    let user_path = state_dir.path().join("user.json");
    std::fs::write(&user_path, "{not valid json").expect("write corrupt entry");

    let market = Market::new(market_config(&server, &state_dir));

    assert!(!market.auth().is_logged_in());
    assert!(!user_path.exists(), "corrupt entry must be removed");
}

#[tokio::test]
async fn restart_restores_persisted_session() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(auth_ok(1, "ade@campus.edu", "tok-123"))
        .mount(&server)
        .await;

    let config = market_config(&server, &state_dir);
    let market = Market::new(config.clone());
    market
        .auth()
        .login(LoginForm::with_email("ade@campus.edu", "hunter2!"))
        .await
        .expect("login succeeds");
    drop(market);

    // A fresh process picks the session back up, optimistically.
    let market = Market::new(config);
    let user = market.auth().current_user().expect("session restored");
    assert_eq!(user.id, UserId::new(1));
}

#[tokio::test]
async fn logout_clears_memory_storage_and_cache() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(auth_ok(1, "ade@campus.edu", "tok-123"))
        .mount(&server)
        .await;

    // Two fetches expected: one before logout, one after the second
    // login. A surviving cache entry would make the second a cache hit
    // and fail the expectation.
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(query_param("userId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    market
        .auth()
        .login(LoginForm::with_email("ade@campus.edu", "hunter2!"))
        .await
        .expect("login succeeds");
    market.cart().items().await.expect("first fetch");

    market.auth().logout().await.expect("logout succeeds");

    assert!(!market.auth().is_logged_in());
    let store = SessionStore::new(state_dir.path().to_path_buf());
    assert!(store.load_user().is_none());
    assert!(store.load_token().is_none());

    market
        .auth()
        .login(LoginForm::with_email("ade@campus.edu", "hunter2!"))
        .await
        .expect("second login succeeds");
    market.cart().items().await.expect("refetch after logout");
}

#[tokio::test]
async fn send_otp_never_mutates_auth_state() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/send-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "code sent"})))
        .expect(1)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    let email = Email::parse("ade@campus.edu").expect("valid email");

    market
        .auth()
        .send_otp(OtpIdentifier::Email(email))
        .await
        .expect("otp requested");

    assert!(!market.auth().is_logged_in());
    assert!(!market.auth().is_loading());
}

#[tokio::test]
async fn password_reset_round_trip() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("GET"))
        .and(path("/api/auth/verify-reset-token"))
        .and(query_param("token", "reset-abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"valid": true, "message": "ok"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "password updated"})),
        )
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));

    let check = market
        .auth()
        .verify_reset_token("reset-abc")
        .await
        .expect("verification succeeds");
    assert!(check.valid);

    let message = market
        .auth()
        .reset_password("reset-abc", "new password")
        .await
        .expect("reset succeeds");
    assert_eq!(message, "password updated");
}

#[tokio::test]
async fn short_reset_password_rejected_client_side() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(0)
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    let err = market
        .auth()
        .reset_password("reset-abc", "short")
        .await
        .expect_err("rejected before any request");
    assert!(matches!(err, AuthError::WeakPassword(_)));
}

#[tokio::test]
async fn detected_dial_code_formats_the_otp_phone_number() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("GET"))
        .and(path("/geo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"country_code": "ID", "country_calling_code": "+62"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The national number must go out as +62 E.164.
    Mock::given(method("POST"))
        .and(path("/api/auth/send-otp"))
        .and(wiremock::matchers::body_partial_json(json!({
            "phoneNumber": "+628123456789"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "code sent"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = market_config(&server, &state_dir);
    config.geo_url = format!("{}/geo", server.uri());
    let market = Market::new(config);

    market.auth().detect_dial_code().await;
    assert_eq!(market.auth().dial_code(), "+62");

    let phone = unibazaar_core::PhoneNumber::parse("0812 345 6789").expect("valid phone");
    market
        .auth()
        .send_otp(OtpIdentifier::Phone(phone))
        .await
        .expect("otp requested");
}

#[tokio::test]
async fn failed_dial_code_lookup_keeps_the_default() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("GET"))
        .and(path("/geo"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = market_config(&server, &state_dir);
    config.geo_url = format!("{}/geo", server.uri());
    let default_code = config.default_dial_code.clone();
    let market = Market::new(config);

    market.auth().detect_dial_code().await;
    assert_eq!(market.auth().dial_code(), default_code);
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let server = MockServer::start().await;
    let state_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "email already in use"})),
        )
        .mount(&server)
        .await;

    let market = Market::new(market_config(&server, &state_dir));
    let form = unibazaar_client::auth::RegistrationForm {
        name: Some("Ade".to_owned()),
        email: Some("ade@campus.edu".to_owned()),
        password: Some("hunter2!!".to_owned()),
        password_confirm: Some("hunter2!!".to_owned()),
        phone_number: None,
    };

    let err = market.auth().register(form).await.expect_err("conflict");
    match err {
        AuthError::Api(ApiError::Status { message, .. }) => {
            assert_eq!(message, "email already in use");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
