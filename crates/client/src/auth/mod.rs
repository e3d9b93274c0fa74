//! Authentication state.
//!
//! Single source of truth for "who is logged in", and the only place
//! allowed to create or destroy a session. Login and registration persist
//! the user and token together; logout clears memory, storage, and the
//! entire query cache in one motion.

mod error;

pub use error::AuthError;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use unibazaar_core::{Email, LoginCredentials, LoginForm, PhoneNumber};

use crate::api::ApiClient;
use crate::api::types::{AuthResponse, MessageResponse, ResetPasswordRequest, TokenCheck};
use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::geo;
use crate::models::User;
use crate::session::Session;
use crate::storage::SessionStore;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Loose registration form with optional fields.
///
/// The backend performs the authoritative checks; this side rejects only
/// what can never succeed (blank required fields, short password, mismatch
/// with the confirmation) before a request is issued.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    pub phone_number: Option<String>,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirm", &"[REDACTED]")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Admin registration payload for the invitation flow.
///
/// Stricter than [`RegistrationForm`]: every field is required. Whether an
/// invitation exists for the email is the backend's decision.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegistration {
    pub email: String,
    pub password: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for AdminRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRegistration")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Where a one-time code should be delivered.
#[derive(Debug, Clone)]
pub enum OtpIdentifier {
    /// Deliver by email.
    Email(Email),
    /// Deliver by WhatsApp to a phone number.
    Phone(PhoneNumber),
}

/// Wire body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    name: String,
    email: Email,
    password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<PhoneNumber>,
}

/// Wire body for `POST /api/auth/send-otp`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
enum SendOtpRequest {
    Email { email: Email },
    Phone { phone_number: String },
}

/// In-flight request counters, one per operation.
#[derive(Default)]
struct Pending {
    login: AtomicUsize,
    register: AtomicUsize,
    register_admin: AtomicUsize,
    send_otp: AtomicUsize,
}

/// RAII guard bumping one pending counter for the lifetime of a request.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Authentication state.
///
/// Cheaply cloneable; clones share the same session, storage, and cache.
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<AuthStateInner>,
}

struct AuthStateInner {
    api: ApiClient,
    cache: QueryCache,
    store: SessionStore,
    session: Session,
    pending: Pending,
    dial_code: RwLock<String>,
    dial_code_detected: AtomicBool,
    geo_url: String,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("logged_in", &self.inner.session.is_logged_in())
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl AuthState {
    /// Create the auth state over shared handles.
    pub(crate) fn new(
        api: ApiClient,
        cache: QueryCache,
        store: SessionStore,
        session: Session,
        config: &ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AuthStateInner {
                api,
                cache,
                store,
                session,
                pending: Pending::default(),
                dial_code: RwLock::new(config.default_dial_code.clone()),
                dial_code_detected: AtomicBool::new(false),
                geo_url: config.geo_url.clone(),
            }),
        }
    }

    /// Restore a previously persisted session, if one parses.
    ///
    /// Optimistic: the restored user is not revalidated against the
    /// backend until the next authenticated request fails. A corrupt
    /// entry has already been discarded by the store.
    pub(crate) fn restore(&self) {
        if let Some(user) = self.inner.store.load_user() {
            info!(user_id = %user.id, "restored persisted session");
            self.inner.session.set(user);
        }
        if let Some(token) = self.inner.store.load_token() {
            self.inner.api.set_token(token);
        }
    }

    /// Snapshot of the current user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.session.user()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.session.is_logged_in()
    }

    /// True while any auth operation (except logout) has a request in
    /// flight: the logical OR over each operation's pending counter.
    ///
    /// Concurrent calls to *different* operations overlap correctly.
    /// Concurrent calls to the *same* operation are the caller's to
    /// serialize - there is no internal de-duplication.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        let pending = &self.inner.pending;
        pending.login.load(Ordering::SeqCst) > 0
            || pending.register.load(Ordering::SeqCst) > 0
            || pending.register_admin.load(Ordering::SeqCst) > 0
            || pending.send_otp.load(Ordering::SeqCst) > 0
    }

    /// Log in with exactly one credential combination.
    ///
    /// On success the in-memory user is replaced and the user and token
    /// are persisted together. On failure nothing is mutated.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request when the form is not
    /// a well-formed combination; otherwise propagates backend rejections.
    pub async fn login(&self, form: LoginForm) -> Result<User, AuthError> {
        let credentials = self.canonicalize_phone(form.into_credentials()?);

        let _pending = PendingGuard::enter(&self.inner.pending.login);
        let response: AuthResponse = self.inner.api.post("/api/auth/login", &credentials).await?;
        self.establish_session(response)
    }

    /// Register a new account.
    ///
    /// Same success/failure contract as [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request when a required field
    /// is blank, the password is shorter than [`MIN_PASSWORD_LENGTH`], or
    /// the confirmation does not match.
    pub async fn register(&self, form: RegistrationForm) -> Result<User, AuthError> {
        let request = validate_registration(form)?;

        let _pending = PendingGuard::enter(&self.inner.pending.register);
        let response: AuthResponse = self.inner.api.post("/api/auth/register", &request).await?;
        self.establish_session(response)
    }

    /// Register an invited admin account.
    ///
    /// Same success/failure contract as [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request when a field is blank
    /// or the password is too short; the invitation itself is checked by
    /// the backend.
    pub async fn register_admin(
        &self,
        registration: AdminRegistration,
    ) -> Result<User, AuthError> {
        validate_admin_registration(&registration)?;

        let _pending = PendingGuard::enter(&self.inner.pending.register_admin);
        let response: AuthResponse = self
            .inner
            .api
            .post("/api/auth/admin/register", &registration)
            .await?;
        self.establish_session(response)
    }

    /// Ask the backend to deliver a one-time code.
    ///
    /// Fire-and-forget: auth state is never mutated; a failure is only
    /// surfaced to the caller.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn send_otp(&self, identifier: OtpIdentifier) -> Result<(), AuthError> {
        let request = match identifier {
            OtpIdentifier::Email(email) => SendOtpRequest::Email { email },
            OtpIdentifier::Phone(phone) => SendOtpRequest::Phone {
                phone_number: self.format_phone(&phone),
            },
        };

        let _pending = PendingGuard::enter(&self.inner.pending.send_otp);
        let response: MessageResponse =
            self.inner.api.post("/api/auth/send-otp", &request).await?;
        debug!(message = %response.message, "one-time code requested");
        Ok(())
    }

    /// Destroy the session: clear the in-memory user, both durable
    /// entries, the attached token, and the entire query cache.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the durable entries cannot be
    /// removed; memory, token, and cache are cleared regardless.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.inner.session.clear();
        self.inner.api.clear_token();
        self.inner.cache.invalidate_all().await;
        self.inner.store.clear()?;
        info!("logged out");
        Ok(())
    }

    /// Check a password-reset token with the backend.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn verify_reset_token(&self, token: &str) -> Result<TokenCheck, AuthError> {
        let check: TokenCheck = self
            .inner
            .api
            .get("/api/auth/verify-reset-token", &[("token", token.to_owned())])
            .await?;
        Ok(check)
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` before any request when the new
    /// password is shorter than [`MIN_PASSWORD_LENGTH`].
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        validate_password(new_password)?;

        let request = ResetPasswordRequest {
            token: token.to_owned(),
            new_password: new_password.to_owned(),
        };
        let response: MessageResponse = self
            .inner
            .api
            .post("/api/auth/reset-password", &request)
            .await?;
        Ok(response.message)
    }

    /// One-shot, best-effort detection of the phone dialing code from the
    /// machine's public IP. Failure keeps the configured default.
    pub async fn detect_dial_code(&self) {
        if self.inner.dial_code_detected.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(code) =
            geo::lookup_dial_code(self.inner.api.http(), &self.inner.geo_url).await
        {
            debug!(dial_code = %code, "detected dialing code");
            *self
                .inner
                .dial_code
                .write()
                .unwrap_or_else(PoisonError::into_inner) = code;
        }
    }

    /// The dialing code currently used for national phone numbers.
    #[must_use]
    pub fn dial_code(&self) -> String {
        self.inner
            .dial_code
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Format a phone number for the backend using the current dialing
    /// code.
    #[must_use]
    pub fn format_phone(&self, phone: &PhoneNumber) -> String {
        phone.to_e164(&self.dial_code())
    }

    /// Rewrite a phone credential into E.164 so login and OTP delivery
    /// agree on the canonical number.
    fn canonicalize_phone(&self, credentials: LoginCredentials) -> LoginCredentials {
        match credentials {
            LoginCredentials::PhoneOtp {
                phone_number,
                otp_code,
            } => {
                let formatted = self.format_phone(&phone_number);
                let phone_number = PhoneNumber::parse(&formatted).unwrap_or(phone_number);
                LoginCredentials::PhoneOtp {
                    phone_number,
                    otp_code,
                }
            }
            other => other,
        }
    }

    /// Commit a successful `{ user, token }` response.
    ///
    /// Storage is written first so the stored copy and the in-memory
    /// mirror never diverge: a failed write leaves the session untouched.
    fn establish_session(&self, response: AuthResponse) -> Result<User, AuthError> {
        let AuthResponse { user, token } = response;
        let token = SecretString::from(token);

        self.inner.store.save(&user, &token)?;
        self.inner.api.set_token(token);
        self.inner.session.set(user.clone());

        info!(user_id = %user.id, "session established");
        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Check the loose registration form and build the wire request.
fn validate_registration(form: RegistrationForm) -> Result<RegisterRequest, AuthError> {
    let name = required(form.name, "name")?;
    let email = Email::parse(&required(form.email, "email")?)?;
    let password = required(form.password, "password")?;
    validate_password(&password)?;

    if let Some(confirm) = form.password_confirm
        && confirm != password
    {
        return Err(AuthError::PasswordMismatch);
    }

    let phone_number = form
        .phone_number
        .as_deref()
        .map(PhoneNumber::parse)
        .transpose()?;

    Ok(RegisterRequest {
        name,
        email,
        password,
        phone_number,
    })
}

/// Check the admin registration payload.
fn validate_admin_registration(registration: &AdminRegistration) -> Result<(), AuthError> {
    Email::parse(&registration.email)?;
    validate_password(&registration.password)?;

    for (field, value) in [
        ("username", &registration.username),
        ("first name", &registration.first_name),
        ("last name", &registration.last_name),
    ] {
        if value.trim().is_empty() {
            return Err(AuthError::MissingField(field));
        }
    }

    Ok(())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AuthError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(AuthError::MissingField(field))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: Some("Ade".to_owned()),
            email: Some("ade@campus.edu".to_owned()),
            password: Some("correct horse".to_owned()),
            password_confirm: Some("correct horse".to_owned()),
            phone_number: None,
        }
    }

    #[test]
    fn test_validate_registration_ok() {
        let request = validate_registration(valid_form()).unwrap();
        assert_eq!(request.name, "Ade");
        assert_eq!(request.email.as_str(), "ade@campus.edu");
    }

    #[test]
    fn test_validate_registration_missing_name() {
        let form = RegistrationForm {
            name: Some("   ".to_owned()),
            ..valid_form()
        };
        assert!(matches!(
            validate_registration(form),
            Err(AuthError::MissingField("name"))
        ));
    }

    #[test]
    fn test_validate_registration_short_password() {
        let form = RegistrationForm {
            password: Some("short".to_owned()),
            password_confirm: Some("short".to_owned()),
            ..valid_form()
        };
        assert!(matches!(
            validate_registration(form),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_registration_mismatched_confirmation() {
        let form = RegistrationForm {
            password_confirm: Some("different horse".to_owned()),
            ..valid_form()
        };
        assert!(matches!(
            validate_registration(form),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_validate_registration_bad_email() {
        let form = RegistrationForm {
            email: Some("not-an-email".to_owned()),
            ..valid_form()
        };
        assert!(matches!(
            validate_registration(form),
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_admin_registration_blank_username() {
        let registration = AdminRegistration {
            email: "admin@campus.edu".to_owned(),
            password: "correct horse".to_owned(),
            username: String::new(),
            first_name: "Ade".to_owned(),
            last_name: "Okon".to_owned(),
        };
        assert!(matches!(
            validate_admin_registration(&registration),
            Err(AuthError::MissingField("username"))
        ));
    }

    #[test]
    fn test_registration_form_rejects_unknown_fields() {
        let result: Result<RegistrationForm, _> =
            serde_json::from_str(r#"{"name":"Ade","isAdmin":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_registration_form_debug_redacts_password() {
        let debug = format!("{:?}", valid_form());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("correct horse"));
    }

    #[test]
    fn test_send_otp_request_wire_shape() {
        let request = SendOtpRequest::Phone {
            phone_number: "+15551234567".to_owned(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["phoneNumber"], "+15551234567");
    }
}
