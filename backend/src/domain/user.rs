//! User account model: creation payload, stored record, public projection.
//!
//! The inbound adapter decodes JSON into a [`NewUserDraft`] whose fields are
//! all optional so that absent values surface as validation failures rather
//! than decode failures. [`NewUser::try_from`] applies the field rules in
//! declaration order and reports the first violation.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Fields of the user creation payload, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    FirstName,
    LastName,
    Email,
    PasswordHash,
    Subscribed,
    BirthMonth,
    BirthYear,
}

impl UserField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::PasswordHash => "passwordhash",
            Self::Subscribed => "subscribed",
            Self::BirthMonth => "birth_month",
            Self::BirthYear => "birth_year",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule violated by a rejected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// The field was absent, null, or blank.
    Required,
    /// The field was present but malformed.
    Format,
}

impl ValidationRule {
    /// Machine-readable rule name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Format => "format",
        }
    }
}

/// First failing field of a creation payload and the rule it broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserValidationError {
    field: UserField,
    rule: ValidationRule,
}

impl UserValidationError {
    /// The field was absent or blank.
    pub fn required(field: UserField) -> Self {
        Self {
            field,
            rule: ValidationRule::Required,
        }
    }

    /// The field was present but malformed.
    pub fn format(field: UserField) -> Self {
        Self {
            field,
            rule: ValidationRule::Format,
        }
    }

    pub fn field(&self) -> UserField {
        self.field
    }

    pub fn rule(&self) -> ValidationRule {
        self.rule
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            ValidationRule::Required => write!(f, "{} is required", self.field),
            ValidationRule::Format => write!(f, "{} has an invalid format", self.field),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-generated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an identifier produced by the store.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier. Test doubles use this in place of the
    /// store default.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, no whitespace, and a dotted domain part.
        let pattern = r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address, trimmed of surrounding whitespace.
///
/// # Examples
/// ```
/// use booksyde::domain::EmailAddress;
///
/// let email = EmailAddress::new(" ann@example.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "ann@example.com");
/// assert!(EmailAddress::new("ann.example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::required(UserField::Email));
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::format(UserField::Email));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Opaque password hash supplied by the caller.
///
/// The value is kept verbatim, wiped from memory on drop, and never rendered
/// by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(Zeroizing<String>);

impl PasswordHash {
    /// Construct a hash, rejecting blank input.
    pub fn new(hash: impl Into<String>) -> Result<Self, UserValidationError> {
        let hash = Zeroizing::new(hash.into());
        if hash.trim().is_empty() {
            return Err(UserValidationError::required(UserField::PasswordHash));
        }
        Ok(Self(hash))
    }

    /// Raw hash for persistence adapters.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Unvalidated creation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUserDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub subscribed: Option<bool>,
    pub birth_month: Option<String>,
    pub birth_year: Option<i32>,
}

/// Validated user creation request.
///
/// ## Invariants
/// - names and birth month are trimmed and non-empty.
/// - `email` matches email syntax.
/// - `password_hash` is non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    first_name: String,
    last_name: String,
    email: EmailAddress,
    password_hash: PasswordHash,
    subscribed: bool,
    birth_month: String,
    birth_year: i32,
}

fn required_text(value: Option<String>, field: UserField) -> Result<String, UserValidationError> {
    let value = value.ok_or_else(|| UserValidationError::required(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::required(field));
    }
    Ok(trimmed.to_owned())
}

impl TryFrom<NewUserDraft> for NewUser {
    type Error = UserValidationError;

    fn try_from(draft: NewUserDraft) -> Result<Self, Self::Error> {
        let NewUserDraft {
            first_name,
            last_name,
            email,
            password_hash,
            subscribed,
            birth_month,
            birth_year,
        } = draft;

        let first_name = required_text(first_name, UserField::FirstName)?;
        let last_name = required_text(last_name, UserField::LastName)?;
        let email = email.ok_or_else(|| UserValidationError::required(UserField::Email))?;
        let email = EmailAddress::new(email)?;
        let password_hash = password_hash
            .ok_or_else(|| UserValidationError::required(UserField::PasswordHash))?;
        let password_hash = PasswordHash::new(password_hash)?;
        let subscribed =
            subscribed.ok_or_else(|| UserValidationError::required(UserField::Subscribed))?;
        let birth_month = required_text(birth_month, UserField::BirthMonth)?;
        let birth_year =
            birth_year.ok_or_else(|| UserValidationError::required(UserField::BirthYear))?;

        Ok(Self {
            first_name,
            last_name,
            email,
            password_hash,
            subscribed,
            birth_month,
            birth_year,
        })
    }
}

impl NewUser {
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn birth_month(&self) -> &str {
        self.birth_month.as_str()
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }
}

/// Durable user row as written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    id: UserId,
    user: NewUser,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Pair validated fields with the store-generated identity.
    pub fn new(id: UserId, user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    /// Fields supplied at creation time.
    pub fn fields(&self) -> &NewUser {
        &self.user
    }

    pub fn email(&self) -> &EmailAddress {
        self.user.email()
    }

    pub fn subscribed(&self) -> bool {
        self.user.subscribed()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Client-safe projection of this record.
    pub fn summary(&self) -> PublicUserSummary {
        PublicUserSummary::from(self)
    }
}

/// Client-safe projection of a [`UserRecord`].
///
/// Names, password hash, and birth fields are never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUserSummary {
    id: UserId,
    email: EmailAddress,
    subscribed: bool,
}

impl PublicUserSummary {
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }
}

impl From<&UserRecord> for PublicUserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id(),
            email: record.email().clone(),
            subscribed: record.subscribed(),
        }
    }
}
