//! Generic persisted-record envelope and the per-kind schema contract.
//!
//! Every entity kind is stored as one document holding its validated fields
//! plus `created_at` and `updated_at`. Timestamps use fixed-width RFC 3339
//! with microsecond precision so lexicographic order equals chronological
//! order in any store.

use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::validation::Violations;

/// Opaque store-assigned record identifier.
///
/// ## Invariants
/// - Non-empty once trimmed.
///
/// # Examples
/// ```
/// use backend::domain::DocumentId;
///
/// let id = DocumentId::new("65f1c0ffee0000000000beef").expect("valid id");
/// assert_eq!(id.as_str(), "65f1c0ffee0000000000beef");
/// assert!(DocumentId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

/// Raised when an identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("document identifier must not be empty")]
pub struct EmptyDocumentId;

impl DocumentId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyDocumentId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyDocumentId);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate a clock reading to the stored precision.
pub fn stored_precision(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(6)
}

/// Fixed-width serde representation for entity timestamps.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Serialise a timestamp in the stored format.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    /// Parse any RFC 3339 timestamp into UTC.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// A persisted record of some kind.
///
/// Serialises with the fields flattened next to `id` and the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity<T> {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Validated kind-specific fields.
    #[serde(flatten)]
    pub fields: T,
    /// Creation instant; never changes.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last modification instant; monotonically non-decreasing.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Contract implemented once per entity kind.
///
/// A schema names the backing collection, declares the unvalidated draft
/// shape received from clients and the validated field set that is stored,
/// and knows how to convert between them.
pub trait EntitySchema: Send + Sync + 'static {
    /// Collection the records are stored in.
    const COLLECTION: &'static str;
    /// Human-facing singular noun used in messages.
    const LABEL: &'static str;

    /// Client-supplied shape; every field optional.
    type Draft: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static;
    /// Validated, normalised field set.
    type Fields: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Validate and normalise a draft, reporting every offending field.
    fn validate(draft: Self::Draft) -> Result<Self::Fields, Violations>;

    /// Lift validated fields back into a draft for merging.
    fn to_draft(fields: &Self::Fields) -> Self::Draft;

    /// Overlay `patch` onto `base`; fields present in the patch win.
    fn merge(base: Self::Draft, patch: Self::Draft) -> Self::Draft;
}
