use std::{fmt, hash::{Hash, Hasher}, sync::Arc};

use serde::{Serialize, Serializer};

/// Canonical identifier of a county-level jurisdiction.
///
/// Built from a raw feature name by stripping a trailing "County" token and
/// surrounding whitespace. Equality, hashing and ordering use the lowercase
/// key, so "KINGS", "Kings County" and " kings " all name the same county.
/// The trimmed original spelling is kept for labels.
#[derive(Debug, Clone)]
pub struct CountyId {
    key: Arc<str>,
    name: Arc<str>,
}

impl CountyId {
    /// Derive a county identifier from a raw name. Returns `None` if nothing is left after normalization.
    pub fn new(raw: &str) -> Option<Self> {
        let name = strip_county_suffix(raw.trim()).trim();
        if name.is_empty() { return None }

        Some(Self {
            key: name.to_lowercase().into(),
            name: name.into(),
        })
    }

    /// Lowercase lookup key.
    #[inline] pub fn key(&self) -> &str { &self.key }

    /// Display name, as spelled in the boundary dataset.
    #[inline] pub fn name(&self) -> &str { &self.name }
}

/// Strip one trailing " County" token, ignoring case.
fn strip_county_suffix(name: &str) -> &str {
    const SUFFIX: &str = " county";
    let split = name.len().saturating_sub(SUFFIX.len());
    match name.get(split..) {
        Some(tail) if split > 0 && tail.eq_ignore_ascii_case(SUFFIX) => &name[..split],
        _ => name,
    }
}

impl PartialEq for CountyId {
    fn eq(&self, other: &Self) -> bool { self.key == other.key }
}

impl Eq for CountyId {}

impl Hash for CountyId {
    fn hash<H: Hasher>(&self, state: &mut H) { self.key.hash(state) }
}

impl PartialOrd for CountyId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}

impl Ord for CountyId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering { self.key.cmp(&other.key) }
}

impl fmt::Display for CountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for CountyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
