//! Mail account credentials, sourced from the environment only.

use crate::error::{ConfigError, ConfigResult};

/// Environment variable holding the mail server address.
pub const SERVER_VAR: &str = "IMAP_SERVER";
/// Environment variable holding the account identifier.
pub const ACCOUNT_VAR: &str = "EMAIL_ACCOUNT";
/// Environment variable holding the account secret.
pub const PASSWORD_VAR: &str = "EMAIL_PASSWORD";

/// Login for the mailbox being monitored.
#[derive(Clone)]
pub struct MailCredentials {
    pub account: String,
    pub password: String,
}

impl MailCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account = lookup(ACCOUNT_VAR).filter(|v| !v.trim().is_empty());
        let password = lookup(PASSWORD_VAR).filter(|v| !v.is_empty());

        match (account, password) {
            (Some(account), Some(password)) => Ok(Self { account, password }),
            (account, password) => {
                let mut missing = Vec::new();
                if account.is_none() {
                    missing.push(ACCOUNT_VAR);
                }
                if password.is_none() {
                    missing.push(PASSWORD_VAR);
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("account", &self.account)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_credentials_present() {
        let creds = MailCredentials::from_lookup(lookup_in(&[
            (ACCOUNT_VAR, "posters@example.com"),
            (PASSWORD_VAR, "hunter2"),
        ]))
        .unwrap();

        assert_eq!(creds.account, "posters@example.com");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_missing_password_is_reported() {
        let err = MailCredentials::from_lookup(lookup_in(&[(ACCOUNT_VAR, "posters@example.com")]))
            .unwrap_err();

        match err {
            ConfigError::MissingCredentials(missing) => assert_eq!(missing, vec![PASSWORD_VAR]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_account_counts_as_missing() {
        let err = MailCredentials::from_lookup(lookup_in(&[(ACCOUNT_VAR, "  ")])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(ACCOUNT_VAR));
        assert!(message.contains(PASSWORD_VAR));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = MailCredentials {
            account: "posters@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
