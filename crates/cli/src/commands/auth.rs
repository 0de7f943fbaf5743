//! Sign-in commands.
//!
//! The session is stored next to the cart, so a later `checkout place` sees
//! it. Passwords are only checked for presence.

use secrecy::SecretString;

use cybrd_storefront::stores::User;

use super::{CliError, Outcome, Session};

fn signed_in(user: &User) -> Result<Outcome, CliError> {
    let text = match &user.name {
        Some(name) => format!("Signed in as {name} <{}>.\n", user.email),
        None => format!("Signed in as {}.\n", user.email),
    };
    Outcome::new(text, user)
}

/// `auth login`
///
/// # Errors
///
/// Returns `CliError::Auth` if the email or password is empty.
pub fn login(session: &mut Session, email: &str, password: &SecretString) -> Result<Outcome, CliError> {
    let user = session.stores.auth.login(email, password)?;
    signed_in(user)
}

/// `auth signup`
///
/// # Errors
///
/// Returns `CliError::Auth` if the email or password is empty.
pub fn signup(
    session: &mut Session,
    email: &str,
    password: &SecretString,
    name: Option<&str>,
) -> Result<Outcome, CliError> {
    let user = session.stores.auth.signup(email, password, name)?;
    signed_in(user)
}

/// `auth logout`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn logout(session: &mut Session) -> Result<Outcome, CliError> {
    session.stores.auth.logout();
    Outcome::new("Signed out.\n".to_string(), &serde_json::Value::Null)
}

/// `auth whoami`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn whoami(session: &Session) -> Result<Outcome, CliError> {
    match session.stores.auth.user() {
        Some(user) => signed_in(user),
        None => Outcome::new("Not signed in.\n".to_string(), &serde_json::Value::Null),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::session;

    fn password(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_login_then_whoami() {
        let mut session = session();
        login(&mut session, " shopper@example.com ", &password("hunter2")).unwrap();

        let outcome = whoami(&session).unwrap();
        assert_eq!(outcome.text, "Signed in as shopper@example.com.\n");
        assert_eq!(outcome.json["email"], "shopper@example.com");
        assert!(outcome.json.get("password").is_none());
    }

    #[test]
    fn test_signup_with_name() {
        let mut session = session();
        let outcome = signup(&mut session, "a@b.co", &password("x"), Some("Nour")).unwrap();
        assert_eq!(outcome.text, "Signed in as Nour <a@b.co>.\n");
    }

    #[test]
    fn test_login_requires_credentials() {
        let mut session = session();
        let err = login(&mut session, "a@b.co", &password("")).unwrap_err();
        assert_eq!(err.to_string(), "Enter email and password");
        assert!(session.stores.auth.user().is_none());
    }

    #[test]
    fn test_logout() {
        let mut session = session();
        login(&mut session, "a@b.co", &password("x")).unwrap();
        logout(&mut session).unwrap();
        assert_eq!(whoami(&session).unwrap().json, serde_json::Value::Null);
    }
}
