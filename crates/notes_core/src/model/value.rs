//! Value objects shared by entities, commands and events.
//!
//! # Responsibility
//! - Wrap primitive values (`Id`, `Str`, `Bool`, `Time`, `Permission`) in
//!   frozen, typed records.
//! - Offer trusting `of` constructors and validating `create` constructors.
//!
//! # Invariants
//! - An `Id` built through `create` is always a canonical UUID v4. Input
//!   casing is not kept: ids render as lowercase hyphenated text, so two
//!   spellings of one UUID are the same `Id`.
//! - Validation failures are typed values, never panics.
//! - `Id::create` reports the first violated check in the order
//!   `NotString` -> `NotUUID` -> `NotUUIDv4`.

use crate::record::TaggedRecord;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::{Uuid, Variant};

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid uuid regex")
});

/// Canonical default id (`e9da09d4-8b50-4ac6-ace3-c01b95a27599`).
const DEFAULT_ID: Uuid = Uuid::from_u128(0xe9da09d4_8b50_4ac6_ace3_c01b95a27599);

pub type IdResult<T> = Result<T, IdFailure>;

/// Reasons an input cannot become an `Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdFailure {
    /// Input is not UTF-8 text.
    NotString,
    /// Text is not a hyphenated UUID of any version.
    #[serde(rename = "NotUUID")]
    NotUuid,
    /// Text is a UUID, but not an RFC 4122 version 4 one.
    #[serde(rename = "NotUUIDv4")]
    NotUuidV4,
}

impl IdFailure {
    pub fn tag(self) -> &'static str {
        match self {
            Self::NotString => "NotString",
            Self::NotUuid => "NotUUID",
            Self::NotUuidV4 => "NotUUIDv4",
        }
    }
}

impl Display for IdFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotString => write!(f, "id must be a string"),
            Self::NotUuid => write!(f, "id must be a UUID"),
            Self::NotUuidV4 => write!(f, "id must be a version 4 UUID"),
        }
    }
}

impl Error for IdFailure {}

/// Identifier of any entity, command or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Id(Uuid);

impl Id {
    /// Trusting constructor; the caller vouches for the UUID version.
    pub fn of(value: Uuid) -> Self {
        Self(value)
    }

    /// Validates raw input and wraps it when it is a UUID v4 string.
    ///
    /// Hex digits are accepted in any case and rendered lowercase.
    pub fn create(input: impl AsRef<[u8]>) -> IdResult<Self> {
        let text = std::str::from_utf8(input.as_ref()).map_err(|_| IdFailure::NotString)?;
        if !UUID_RE.is_match(text) {
            return Err(IdFailure::NotUuid);
        }
        let uuid = Uuid::parse_str(text).map_err(|_| IdFailure::NotUuid)?;
        if uuid.get_version_num() != 4 || uuid.get_variant() != Variant::RFC4122 {
            return Err(IdFailure::NotUuidV4);
        }
        Ok(Self(uuid))
    }

    /// Generates a fresh random v4 id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self(DEFAULT_ID)
    }
}

impl TaggedRecord for Id {
    const TAG: &'static str = "IdValue";
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for Id {
    type Err = IdFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for Id {
    type Error = IdFailure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<Id> for String {
    fn from(value: Id) -> Self {
        value.to_string()
    }
}

/// Failure for the validating `Str` constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrFailure {
    NotString,
}

impl Display for StrFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotString => write!(f, "value must be a string"),
        }
    }
}

impl Error for StrFailure {}

/// Arbitrary text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Str(String);

impl Str {
    pub fn of(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Accepts raw input only when it is valid UTF-8.
    pub fn create(input: impl AsRef<[u8]>) -> Result<Self, StrFailure> {
        std::str::from_utf8(input.as_ref())
            .map(Self::of)
            .map_err(|_| StrFailure::NotString)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TaggedRecord for Str {
    const TAG: &'static str = "StrValue";
}

impl Display for Str {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bool(bool);

impl Bool {
    pub fn of(value: bool) -> Self {
        Self(value)
    }

    pub fn value(self) -> bool {
        self.0
    }
}

impl TaggedRecord for Bool {
    const TAG: &'static str = "BoolValue";
}

/// Failure for the validating `Time` constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFailure {
    /// Epoch offset is outside the representable calendar range.
    NotDate(i64),
}

impl Display for TimeFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotDate(millis) => write!(f, "not a representable instant: {millis} ms"),
        }
    }
}

impl Error for TimeFailure {}

/// A UTC instant. Defaults to the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(DateTime<Utc>);

impl Time {
    pub fn of(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Builds an instant from Unix epoch milliseconds.
    pub fn create(epoch_millis: i64) -> Result<Self, TimeFailure> {
        Utc.timestamp_millis_opt(epoch_millis)
            .single()
            .map(Self)
            .ok_or(TimeFailure::NotDate(epoch_millis))
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl TaggedRecord for Time {
    const TAG: &'static str = "TimeValue";
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// What a grant allows on a resource. The set is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Create,
    #[default]
    Read,
    Update,
    Delete,
}

pub const PERMISSION_CREATE: &str = "create";
pub const PERMISSION_READ: &str = "read";
pub const PERMISSION_UPDATE: &str = "update";
pub const PERMISSION_DELETE: &str = "delete";

impl Permission {
    /// All permissions in declaration order.
    pub const ALL: [Permission; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => PERMISSION_CREATE,
            Self::Read => PERMISSION_READ,
            Self::Update => PERMISSION_UPDATE,
            Self::Delete => PERMISSION_DELETE,
        }
    }

    /// Parses the lowercase wire name of a permission.
    pub fn parse(value: &str) -> Result<Self, PermissionError> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(PermissionError::Empty);
        }

        match normalized {
            PERMISSION_CREATE => Ok(Self::Create),
            PERMISSION_READ => Ok(Self::Read),
            PERMISSION_UPDATE => Ok(Self::Update),
            PERMISSION_DELETE => Ok(Self::Delete),
            other => Err(PermissionError::Unsupported(other.to_string())),
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    Empty,
    Unsupported(String),
}

impl Display for PermissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "permission value must not be empty"),
            Self::Unsupported(value) => write!(f, "permission is unsupported: {value}"),
        }
    }
}

impl Error for PermissionError {}

#[cfg(test)]
mod tests {
    use super::{Id, IdFailure, Permission, PermissionError, Str, StrFailure, Time, TimeFailure};

    #[test]
    fn id_default_is_a_valid_v4() {
        let rendered = Id::default().to_string();
        assert_eq!(rendered, "e9da09d4-8b50-4ac6-ace3-c01b95a27599");
        assert_eq!(Id::create(&rendered), Ok(Id::default()));
    }

    #[test]
    fn id_checks_run_in_order() {
        assert_eq!(Id::create([0xff_u8, 0xfe]), Err(IdFailure::NotString));
        assert_eq!(Id::create("not-a-uuid"), Err(IdFailure::NotUuid));
        assert_eq!(
            Id::create("9cc15ab0-41e7-11ee-be56-0242ac120002"),
            Err(IdFailure::NotUuidV4)
        );
    }

    #[test]
    fn id_rejects_non_hyphenated_forms() {
        assert_eq!(
            Id::create("0a5455319d85413990fc468249696495"),
            Err(IdFailure::NotUuid)
        );
        assert_eq!(
            Id::create("{0a545531-9d85-4139-90fc-468249696495}"),
            Err(IdFailure::NotUuid)
        );
    }

    #[test]
    fn id_failure_tags_are_stable() {
        assert_eq!(IdFailure::NotString.tag(), "NotString");
        assert_eq!(IdFailure::NotUuid.tag(), "NotUUID");
        assert_eq!(IdFailure::NotUuidV4.tag(), "NotUUIDv4");
    }

    #[test]
    fn str_create_requires_utf8() {
        assert_eq!(Str::create("hello").expect("utf8 input").as_str(), "hello");
        assert_eq!(Str::create([0xc3_u8, 0x28]), Err(StrFailure::NotString));
    }

    #[test]
    fn time_create_rejects_out_of_range_offsets() {
        let time = Time::create(1_700_000_000_000).expect("in range");
        assert_eq!(time.epoch_millis(), 1_700_000_000_000);
        assert_eq!(Time::create(i64::MAX), Err(TimeFailure::NotDate(i64::MAX)));
        assert_eq!(Time::default().epoch_millis(), 0);
    }

    #[test]
    fn permission_parse_round_trips_wire_names() {
        for permission in Permission::ALL {
            assert_eq!(
                Permission::parse(permission.as_str()).expect("known permission"),
                permission
            );
        }
        assert_eq!(Permission::parse("  "), Err(PermissionError::Empty));
        assert_eq!(
            Permission::parse("Create"),
            Err(PermissionError::Unsupported("Create".to_string()))
        );
    }
}
