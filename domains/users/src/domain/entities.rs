//! User entity and its validation rules

use chrono::{DateTime, Utc};
use lingodesk_common::{Error, Result, UserRole};
use serde::Serialize;
use uuid::Uuid;

/// A marketplace user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Language codes a translator works in; empty for other roles
    pub languages: Vec<String>,
    /// Argon2id PHC hash; `None` for accounts that cannot log in with a password
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a validated customer
    pub fn new_customer(name: &str, email: &str) -> Result<Self> {
        Self::build(name, email, UserRole::Customer, Vec::new())
    }

    /// Build a validated translator working in `languages`
    pub fn new_translator(name: &str, email: &str, languages: &[String]) -> Result<Self> {
        let languages = normalize_languages(languages)?;
        Self::build(name, email, UserRole::Translator, languages)
    }

    /// Build a validated administrator; only reachable from provisioning code
    pub fn new_administrator(name: &str, email: &str) -> Result<Self> {
        Self::build(name, email, UserRole::Administrator, Vec::new())
    }

    fn build(name: &str, email: &str, role: UserRole, languages: Vec<String>) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: validate_name(name)?,
            email: normalize_email(email)?,
            role,
            languages,
            password_hash: None,
            created_at: Utc::now(),
        })
    }

    /// Attach the password hash used by login
    pub fn with_password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    /// True when this user is a translator working in `language`
    pub fn translates(&self, language: &str) -> bool {
        self.role == UserRole::Translator && self.languages.iter().any(|l| l == language)
    }
}

pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Name must not be empty".to_string()));
    }
    if name.chars().count() > 255 {
        return Err(Error::Validation(
            "Name must be at most 255 characters".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Trim and lowercase; the address must have text on both sides of one `@`
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(Error::Validation(format!("Invalid email address: {}", email))),
    }
}

/// Trim, lowercase and de-duplicate language codes, keeping first-seen order
pub fn normalize_languages(languages: &[String]) -> Result<Vec<String>> {
    if languages.is_empty() {
        return Err(Error::Validation(
            "Translators must list at least one language".to_string(),
        ));
    }
    let mut out: Vec<String> = Vec::with_capacity(languages.len());
    for raw in languages {
        let code = raw.trim().to_lowercase();
        if code.is_empty() {
            return Err(Error::Validation(
                "Language codes must not be empty".to_string(),
            ));
        }
        if !out.contains(&code) {
            out.push(code);
        }
    }
    Ok(out)
}
