//! Input validation for the auth, channel and message forms

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Longest message body the composer accepts
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Validates an email address shape (something@domain.tld)
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Please enter your email".to_string());
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

/// Validates the login form
pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Please enter your email and password".to_string());
    }
    validate_email(email)
}

/// Validates the registration form
pub fn validate_registration(
    email: &str,
    name: &str,
    password: &str,
    confirm: &str,
) -> Result<(), String> {
    if email.trim().is_empty() || name.trim().is_empty() || password.is_empty() {
        return Err("Please enter your email, name and password".to_string());
    }
    validate_email(email)?;
    if password != confirm {
        return Err("Password does not match".to_string());
    }
    Ok(())
}

/// Validates a channel name for create/edit
pub fn validate_channel_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Channel name cannot be empty".to_string());
    }
    if name.chars().any(|c| c.is_control()) {
        return Err("Channel name contains invalid characters".to_string());
    }
    Ok(())
}

/// Validates a message body before sending or editing
pub fn validate_message(msg: &str) -> Result<(), String> {
    if msg.trim().is_empty() {
        return Err("Message cannot be empty".to_string());
    }
    if msg.chars().count() > MAX_MESSAGE_LEN {
        return Err(format!("Message too long (max {} characters)", MAX_MESSAGE_LEN));
    }
    Ok(())
}

/// Strips surrounding whitespace and NUL characters from a message body
pub fn sanitize_message(msg: &str) -> String {
    msg.trim().chars().filter(|&c| c != '\0').collect()
}
