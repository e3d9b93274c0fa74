//! Authentication commands.

use unibazaar_core::{Email, LoginForm, PhoneNumber};

use unibazaar_client::Market;
use unibazaar_client::auth::{AdminRegistration, AuthError, OtpIdentifier, RegistrationForm};

/// Log in with whatever combination of flags was supplied.
///
/// The client checks the shape (exactly one combination); the backend
/// checks validity.
#[allow(clippy::print_stdout)]
pub async fn login(
    market: &Market,
    email: Option<String>,
    username: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    otp: Option<String>,
) -> Result<(), AuthError> {
    let form = LoginForm {
        email,
        username,
        phone_number: phone,
        password,
        otp_code: otp,
    };

    // Phone logins format against the detected dialing code.
    if form.phone_number.is_some() {
        market.auth().detect_dial_code().await;
    }

    let user = market.auth().login(form).await?;
    println!("Logged in as {} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}

/// Register a new account and log in.
#[allow(clippy::print_stdout)]
pub async fn register(
    market: &Market,
    name: String,
    email: String,
    password: String,
    confirm: Option<String>,
    phone: Option<String>,
) -> Result<(), AuthError> {
    let form = RegistrationForm {
        name: Some(name),
        email: Some(email),
        password_confirm: Some(confirm.unwrap_or_else(|| password.clone())),
        password: Some(password),
        phone_number: phone,
    };

    let user = market.auth().register(form).await?;
    println!("Registered and logged in as {} <{}>", user.name, user.email);
    Ok(())
}

/// Register an invited admin account and log in.
#[allow(clippy::print_stdout)]
pub async fn register_admin(
    market: &Market,
    email: String,
    password: String,
    username: String,
    first_name: String,
    last_name: String,
) -> Result<(), AuthError> {
    let registration = AdminRegistration {
        email,
        password,
        username,
        first_name,
        last_name,
    };

    let user = market.auth().register_admin(registration).await?;
    println!("Admin account created for {} <{}>", user.name, user.email);
    Ok(())
}

/// Request delivery of a one-time code to an email or phone.
#[allow(clippy::print_stdout)]
pub async fn send_otp(
    market: &Market,
    email: Option<String>,
    phone: Option<String>,
) -> Result<(), AuthError> {
    let identifier = match (email, phone) {
        (Some(email), None) => OtpIdentifier::Email(Email::parse(&email)?),
        (None, Some(phone)) => {
            market.auth().detect_dial_code().await;
            OtpIdentifier::Phone(PhoneNumber::parse(&phone)?)
        }
        _ => {
            return Err(AuthError::MissingField(
                "exactly one of --email or --phone",
            ));
        }
    };

    market.auth().send_otp(identifier).await?;
    println!("One-time code requested.");
    Ok(())
}

/// Check a password-reset token.
#[allow(clippy::print_stdout)]
pub async fn verify_reset_token(market: &Market, token: &str) -> Result<(), AuthError> {
    let check = market.auth().verify_reset_token(token).await?;
    if check.valid {
        println!("Token is valid. {}", check.message);
    } else {
        println!("Token is not valid. {}", check.message);
    }
    Ok(())
}

/// Set a new password using a reset token.
#[allow(clippy::print_stdout)]
pub async fn reset_password(
    market: &Market,
    token: &str,
    password: &str,
) -> Result<(), AuthError> {
    let message = market.auth().reset_password(token, password).await?;
    println!("{message}");
    Ok(())
}

/// Destroy the current session.
#[allow(clippy::print_stdout)]
pub async fn logout(market: &Market) -> Result<(), AuthError> {
    market.auth().logout().await?;
    println!("Logged out.");
    Ok(())
}

/// Show the current user, if any.
#[allow(clippy::print_stdout)]
pub fn whoami(market: &Market) {
    match market.auth().current_user() {
        Some(user) => println!(
            "{} <{}> ({}), user id {}",
            user.name, user.email, user.role, user.id
        ),
        None => println!("Not logged in."),
    }
}
