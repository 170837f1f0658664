//! Account primitives shared by the create and edit workflows.
//!
//! The remote backend owns the account schema. Drafts are typed on the way
//! out; records coming back are kept as JSON objects so unknown fields survive
//! a read-modify-write cycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Literal default that OpenAPI tooling writes into string fields.
///
/// Values equal to this marker are treated as blank at the boundary so they
/// are neither sent nor shown as real data.
pub const SCHEMA_PLACEHOLDER: &str = "string";

/// Primary image field on the remote account record.
pub const PROFILE_IMAGE_FIELD: &str = "profileImageUrl";
/// Legacy alias of [`PROFILE_IMAGE_FIELD`] still read by older clients.
pub const PROFILE_PIC_FIELD: &str = "profilePic";

const ID_FIELD: &str = "id";
const EMAIL_FIELD: &str = "email";
const USER_ROLE_FIELD: &str = "userRole";
const RESULT_FIELD: &str = "result";

/// Whether a user-supplied value carries no information.
///
/// # Examples
/// ```
/// use account_console::domain::is_blank;
///
/// assert!(is_blank("   "));
/// assert!(is_blank("string"));
/// assert!(!is_blank("Ada"));
/// ```
pub fn is_blank(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == SCHEMA_PLACEHOLDER
}

/// Validation failures raised while building account primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    /// Identifier was empty after trimming.
    #[error("account id must not be empty")]
    EmptyId,
    /// Email was empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacks a local part, an `@`, or a domain.
    #[error("email must look like local@domain")]
    MalformedEmail,
    /// User role was empty after trimming.
    #[error("user role must not be empty")]
    EmptyUserRole,
    /// Staged image had no file name.
    #[error("staged image must have a file name")]
    EmptyFileName,
}

impl AccountValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => ID_FIELD,
            Self::EmptyEmail | Self::MalformedEmail => EMAIL_FIELD,
            Self::EmptyUserRole => USER_ROLE_FIELD,
            Self::EmptyFileName => "file",
        }
    }
}

/// Backend-assigned account identifier.
///
/// The client never invents one; it is read from a create response or a
/// listed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Validate and wrap an identifier.
    ///
    /// # Examples
    /// ```
    /// use account_console::domain::AccountId;
    ///
    /// let id = AccountId::new(" 42 ").expect("valid id");
    /// assert_eq!(id.as_str(), "42");
    /// assert!(AccountId::new("").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Account email, trimmed. Comparisons are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and wrap an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(AccountValidationError::MalformedEmail),
        }
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional profile sections of an external account form.
///
/// Field names serialise to the backend's wire names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub job_role: Option<String>,
    pub wav_external_user_id: Option<String>,
    pub region_allocated: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub map_link: Option<String>,
    pub divisional_group: Option<String>,
    pub division: Option<String>,
    pub subdivision: Option<String>,
    pub sector: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub fax_number: Option<String>,
    #[serde(rename = "linkedinID")]
    pub linkedin_id: Option<String>,
    #[serde(rename = "facebookID")]
    pub facebook_id: Option<String>,
    #[serde(rename = "instagramID")]
    pub instagram_id: Option<String>,
    #[serde(rename = "twitterID")]
    pub twitter_id: Option<String>,
    pub company_type: Option<String>,
    pub company_id: Option<String>,
}

impl AccountProfile {
    /// Every field that carries a value, keyed by wire name.
    ///
    /// `None` is skipped; empty strings are kept so callers can decide
    /// whether an explicit clear matters to them.
    pub fn present_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields
                .into_iter()
                .filter(|(_, value)| value.is_string())
                .collect(),
            _ => Map::new(),
        }
    }
}

/// Image file staged in the form, uploaded only after the account exists.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedImage {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl StagedImage {
    /// Stage an image for upload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AccountValidationError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyFileName);
        }
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// MIME type reported by the client, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw file contents.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

impl fmt::Debug for StagedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Validated, client-held state for one create-account submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    email: Email,
    user_role: String,
    profile: AccountProfile,
    staged_image: Option<StagedImage>,
}

impl AccountDraft {
    /// Build a draft; email and user role are required.
    ///
    /// # Examples
    /// ```
    /// use account_console::domain::{AccountDraft, AccountProfile};
    ///
    /// let draft = AccountDraft::new("ada@example.com", "External User", AccountProfile::default())
    ///     .expect("valid draft");
    /// assert_eq!(draft.email().as_str(), "ada@example.com");
    /// ```
    pub fn new(
        email: impl AsRef<str>,
        user_role: impl AsRef<str>,
        profile: AccountProfile,
    ) -> Result<Self, AccountValidationError> {
        let email = Email::new(email)?;
        let user_role = user_role.as_ref().trim();
        if user_role.is_empty() {
            return Err(AccountValidationError::EmptyUserRole);
        }
        Ok(Self {
            email,
            user_role: user_role.to_owned(),
            profile,
            staged_image: None,
        })
    }

    /// Attach an image to upload once the account exists.
    #[must_use]
    pub fn with_staged_image(mut self, image: StagedImage) -> Self {
        self.staged_image = Some(image);
        self
    }

    /// Submitted email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Submitted user role.
    pub fn user_role(&self) -> &str {
        self.user_role.as_str()
    }

    /// Optional profile sections.
    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }

    /// Image staged for deferred upload.
    pub fn staged_image(&self) -> Option<&StagedImage> {
        self.staged_image.as_ref()
    }

    /// Split off the staged image, leaving the rest of the draft.
    pub fn take_staged_image(&mut self) -> Option<StagedImage> {
        self.staged_image.take()
    }

    /// Body for the create request.
    ///
    /// Blank values are omitted rather than sent, so the backend never stores
    /// placeholder text. The staged file and image URL are never included.
    pub fn create_body(&self) -> RemoteAccount {
        let mut fields = Map::new();
        fields.insert(EMAIL_FIELD.to_owned(), Value::from(self.email.as_str()));
        fields.insert(USER_ROLE_FIELD.to_owned(), Value::from(self.user_role.as_str()));
        for (key, value) in self.profile.present_fields() {
            if value.as_str().is_some_and(|text| !is_blank(text)) {
                fields.insert(key, value);
            }
        }
        RemoteAccount::from_map(fields)
    }
}

/// Backend representation of an account as an untyped JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteAccount(Map<String, Value>);

impl RemoteAccount {
    /// Wrap a JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Interpret an arbitrary JSON response as an account record.
    ///
    /// Objects wrapped in a `result` envelope are unwrapped when the outer
    /// object carries no identifier. Anything that is not an object becomes
    /// an empty record.
    pub fn from_response(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        if !fields.contains_key(ID_FIELD) {
            if let Some(Value::Object(inner)) = fields.remove(RESULT_FIELD) {
                return Self(inner);
            }
        }
        Self(fields)
    }

    /// Borrow the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the record has a field named `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Identifier, accepting string or numeric encodings.
    pub fn id(&self) -> Option<AccountId> {
        match self.0.get(ID_FIELD)? {
            Value::String(raw) => AccountId::new(raw).ok(),
            Value::Number(raw) => AccountId::new(raw.to_string()).ok(),
            _ => None,
        }
    }

    /// Email exactly as stored.
    pub fn email(&self) -> Option<&str> {
        self.get_str(EMAIL_FIELD)
    }

    /// Effective image URL, preferring [`PROFILE_IMAGE_FIELD`].
    pub fn image_url(&self) -> Option<&str> {
        [PROFILE_IMAGE_FIELD, PROFILE_PIC_FIELD]
            .into_iter()
            .filter_map(|key| self.get_str(key))
            .find(|value| !is_blank(value))
    }

    /// Copy with placeholder strings replaced by `""`.
    #[must_use]
    pub fn without_placeholders(&self) -> Self {
        let fields = self
            .0
            .iter()
            .map(|(key, value)| {
                let cleaned = match value.as_str() {
                    Some(SCHEMA_PLACEHOLDER) => Value::from(""),
                    _ => value.clone(),
                };
                (key.clone(), cleaned)
            })
            .collect();
        Self(fields)
    }

    /// Copy of `self` with every field of `other` written over it.
    #[must_use]
    pub fn overlaid_with(&self, other: &Self) -> Self {
        let mut fields = self.0.clone();
        for (key, value) in &other.0 {
            fields.insert(key.clone(), value.clone());
        }
        Self(fields)
    }

    /// Set the identifier field.
    #[must_use]
    pub fn with_id(mut self, id: &AccountId) -> Self {
        self.set(ID_FIELD, id.as_str());
        self
    }

    /// Point both image fields at `url`.
    #[must_use]
    pub fn with_image_url(mut self, url: &str) -> Self {
        self.set(PROFILE_IMAGE_FIELD, url);
        self.set(PROFILE_PIC_FIELD, url);
        self
    }
}
