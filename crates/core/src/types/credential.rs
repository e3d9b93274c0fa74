//! Login credential types.
//!
//! The backend accepts exactly one of three credential combinations:
//! email+password, username+password, or phone+OTP. [`LoginForm`] is the
//! loose shape a UI collects; [`LoginForm::into_credentials`] checks that
//! exactly one combination was supplied. Whether the combination is
//! *valid* is the backend's decision, not the client's.

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};
use super::phone::{PhoneError, PhoneNumber};

/// Errors that can occur when assembling [`LoginCredentials`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CredentialError {
    /// No identifier (email, username, or phone) was supplied.
    #[error("no login identifier supplied")]
    Missing,
    /// More than one identifier was supplied.
    #[error("more than one login identifier supplied")]
    Ambiguous,
    /// An email or username login is missing its password.
    #[error("password is required for this login")]
    MissingPassword,
    /// A phone login is missing its one-time code.
    #[error("one-time code is required for phone login")]
    MissingOtpCode,
    /// The supplied email does not parse.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    /// The supplied phone number does not parse.
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),
}

/// A well-formed login credential combination.
///
/// Serializes to the flat JSON shape the backend expects for each
/// combination (`{"email": …, "password": …}` and so on).
#[derive(Clone, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum LoginCredentials {
    /// Email address and password.
    EmailPassword {
        email: Email,
        password: String,
    },
    /// Username and password.
    UsernamePassword {
        username: String,
        password: String,
    },
    /// Phone number and one-time code.
    PhoneOtp {
        phone_number: PhoneNumber,
        otp_code: String,
    },
}

// Manual Debug so passwords and codes never end up in logs.
impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailPassword { email, .. } => f
                .debug_struct("EmailPassword")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::PhoneOtp { phone_number, .. } => f
                .debug_struct("PhoneOtp")
                .field("phone_number", phone_number)
                .field("otp_code", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Raw login form with every field optional.
///
/// UI layers fill in whatever the user typed; the shape check lives in
/// [`LoginForm::into_credentials`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub otp_code: Option<String>,
}

impl LoginForm {
    /// Convert the loose form into a well-formed credential combination.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when zero or more than one identifier
    /// is present, when the matching secret (password or OTP code) is
    /// missing, or when the email/phone fails to parse.
    pub fn into_credentials(self) -> Result<LoginCredentials, CredentialError> {
        let identifiers = usize::from(self.email.is_some())
            + usize::from(self.username.is_some())
            + usize::from(self.phone_number.is_some());

        match identifiers {
            0 => return Err(CredentialError::Missing),
            1 => {}
            _ => return Err(CredentialError::Ambiguous),
        }

        if let Some(email) = self.email {
            let email = Email::parse(&email)?;
            let password = self.password.ok_or(CredentialError::MissingPassword)?;
            return Ok(LoginCredentials::EmailPassword { email, password });
        }

        if let Some(username) = self.username {
            let password = self.password.ok_or(CredentialError::MissingPassword)?;
            return Ok(LoginCredentials::UsernamePassword { username, password });
        }

        // Only the phone identifier remains.
        let phone = self.phone_number.ok_or(CredentialError::Missing)?;
        let phone_number = PhoneNumber::parse(&phone)?;
        let otp_code = self.otp_code.ok_or(CredentialError::MissingOtpCode)?;
        Ok(LoginCredentials::PhoneOtp {
            phone_number,
            otp_code,
        })
    }

    /// Login form for an email + password combination.
    #[must_use]
    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Login form for a username + password combination.
    #[must_use]
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Login form for a phone + one-time code combination.
    #[must_use]
    pub fn with_phone(phone_number: impl Into<String>, otp_code: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            otp_code: Some(otp_code.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_password_combination() {
        let creds = LoginForm::with_email("student@campus.edu", "hunter2!")
            .into_credentials()
            .unwrap();
        assert!(matches!(creds, LoginCredentials::EmailPassword { .. }));
    }

    #[test]
    fn test_username_password_combination() {
        let creds = LoginForm::with_username("jdoe", "hunter2!")
            .into_credentials()
            .unwrap();
        assert!(matches!(creds, LoginCredentials::UsernamePassword { .. }));
    }

    #[test]
    fn test_phone_otp_combination() {
        let creds = LoginForm::with_phone("+15551234567", "123456")
            .into_credentials()
            .unwrap();
        assert!(matches!(creds, LoginCredentials::PhoneOtp { .. }));
    }

    #[test]
    fn test_no_identifier() {
        let err = LoginForm::default().into_credentials().unwrap_err();
        assert!(matches!(err, CredentialError::Missing));
    }

    #[test]
    fn test_two_identifiers() {
        let form = LoginForm {
            email: Some("a@b.c".to_owned()),
            username: Some("jdoe".to_owned()),
            password: Some("hunter2!".to_owned()),
            ..LoginForm::default()
        };
        assert!(matches!(
            form.into_credentials(),
            Err(CredentialError::Ambiguous)
        ));
    }

    #[test]
    fn test_email_without_password() {
        let form = LoginForm {
            email: Some("a@b.c".to_owned()),
            ..LoginForm::default()
        };
        assert!(matches!(
            form.into_credentials(),
            Err(CredentialError::MissingPassword)
        ));
    }

    #[test]
    fn test_phone_without_code() {
        let form = LoginForm {
            phone_number: Some("+15551234567".to_owned()),
            ..LoginForm::default()
        };
        assert!(matches!(
            form.into_credentials(),
            Err(CredentialError::MissingOtpCode)
        ));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let form = LoginForm::with_email("not-an-email", "hunter2!");
        assert!(matches!(
            form.into_credentials(),
            Err(CredentialError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_wire_shape() {
        let creds = LoginForm::with_phone("+15551234567", "123456")
            .into_credentials()
            .unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["phoneNumber"], "+15551234567");
        assert_eq!(json["otpCode"], "123456");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = LoginForm::with_email("a@b.c", "hunter2!")
            .into_credentials()
            .unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2!"));
    }
}
