//! Newtype IDs for type-safe identifiers.
//!
//! Seed records and request bodies carry numeric identifiers, sometimes
//! quoted as strings, so every ID accepts both forms on input and always
//! serializes as a plain number.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Either spelling of a numeric identifier on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

/// Macro to generate numeric newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A numeric identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(n) => Ok(Self(n)),
                    RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(CartItemId);
define_id!(CommentId);
define_id!(PageId);
define_id!(UserId);

impl From<UserId> for vitrine_cache::Scope {
    fn from(user: UserId) -> Self {
        vitrine_cache::Scope::User(user.get())
    }
}

/// One greater than the largest ID in use, or 1 when there are none.
pub fn next_id(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().max().map_or(1, |max| max.saturating_add(1))
}

/// Deserialize an optional key that may be written as a number or a string.
pub(crate) fn deserialize_key<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(n)) => Some(n.to_string()),
        Some(RawId::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Either spelling of a whole number on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Deserialize an optional integer written as a number or a numeric string.
/// Fractional values are truncated.
pub fn deserialize_lenient_int<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    match Option::<RawInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawInt::Int(n)) => Ok(Some(n)),
        Some(RawInt::Float(f)) if f.is_finite() => Ok(Some(f.trunc() as i64)),
        Some(RawInt::Float(f)) => Err(serde::de::Error::custom(format!("not a whole number: {}", f))),
        Some(RawInt::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawInt::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Lowercase, hyphen-separated form of a title.
///
/// Letters and digits from any script are kept, so Arabic titles produce
/// Arabic slugs. Runs of anything else collapse to a single hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
