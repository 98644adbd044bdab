//! Submitter input validation
//!
//! Raw form input arrives as a [`Submission`]; the only way to obtain a
//! [`NewRequest`] is through [`NewRequest::new`], so anything handed to a
//! store has already been trimmed and checked.

use serde::Deserialize;
use thiserror::Error;

/// Rejected submitter input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more mandatory fields were empty after trimming
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Email does not have a plausible address shape
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Raw submission as entered in the question form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    /// Submitter name
    #[serde(default)]
    pub name: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Optional phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Question category (e.g. "Fasting")
    #[serde(default)]
    pub category: String,

    /// The question itself
    #[serde(default)]
    pub question: String,
}

/// A validated, trimmed submission ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    name: String,
    email: String,
    phone: Option<String>,
    category: String,
    question: String,
}

impl NewRequest {
    /// Trim and validate a raw submission
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] naming every mandatory field
    /// that is empty after trimming, or [`ValidationError::InvalidEmail`] when
    /// the email fails the address-shape check.
    ///
    /// # Examples
    ///
    /// ```
    /// use ifta_domain::{NewRequest, Submission};
    ///
    /// let request = NewRequest::new(Submission {
    ///     name: " Ali ".to_string(),
    ///     email: "a@b.com".to_string(),
    ///     phone: None,
    ///     category: "Fasting".to_string(),
    ///     question: "Is travel fasting exempt?".to_string(),
    /// })
    /// .unwrap();
    /// assert_eq!(request.name(), "Ali");
    /// ```
    pub fn new(submission: Submission) -> Result<Self, ValidationError> {
        let name = submission.name.trim().to_string();
        let email = submission.email.trim().to_string();
        let category = submission.category.trim().to_string();
        let question = submission.question.trim().to_string();
        let phone = submission
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let missing: Vec<&'static str> = [
            ("name", &name),
            ("email", &email),
            ("category", &category),
            ("question", &question),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if !is_plausible_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        Ok(Self {
            name,
            email,
            phone,
            category,
            question,
        })
    }

    /// Submitter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number, if one was given
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Question category
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Question text
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Minimal address-shape check: `local@domain.tld`
///
/// Requires a non-empty part before the `@`, and a part after it that is
/// non-empty and contains a `.`.
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && domain.contains('.'),
        None => false,
    }
}
