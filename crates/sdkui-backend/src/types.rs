use regex::Regex;
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::sync::LazyLock;

static THREE_PART_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("three-part version pattern should compile")
});

/// One version of a candidate as reported by a version manager.
///
/// `active` always implies `installed`; every constructor and mutator keeps
/// that true.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRecord {
    identifier: String,
    installed: bool,
    active: bool,
    custom: bool,
}

impl VersionRecord {
    #[must_use]
    pub fn new(identifier: impl Into<String>, installed: bool, active: bool) -> Self {
        Self {
            identifier: identifier.into(),
            installed: installed || active,
            active,
            custom: false,
        }
    }

    /// A catalog entry that is neither installed nor in use.
    #[must_use]
    pub fn available(identifier: impl Into<String>) -> Self {
        Self::new(identifier, false, false)
    }

    #[must_use]
    pub fn with_custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn installed(&self) -> bool {
        self.installed
    }

    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn custom(&self) -> bool {
        self.custom
    }

    pub fn mark_installed(&mut self, active: bool) {
        self.installed = true;
        self.active = active;
    }

    pub fn mark_uninstalled(&mut self) {
        self.installed = false;
        self.active = false;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn version_key(&self) -> Option<VersionKey> {
        VersionKey::find(&self.identifier)
    }
}

/// Numeric `major.minor.patch` triple found somewhere inside an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionKey {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionKey {
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first three-part number of `identifier`, unanchored, so
    /// vendor-qualified labels such as `17.0.2-tem` still carry a key.
    #[must_use]
    pub fn find(identifier: &str) -> Option<Self> {
        let captures = THREE_PART_VERSION.captures(identifier)?;
        Some(Self {
            major: captures[1].parse().ok()?,
            minor: captures[2].parse().ok()?,
            patch: captures[3].parse().ok()?,
        })
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// Variant order matters: versioned records always sort first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DisplayKey {
    Versioned(Reverse<VersionKey>),
    Other(Reverse<String>),
}

impl DisplayKey {
    fn of(record: &VersionRecord) -> Self {
        match record.version_key() {
            Some(key) => Self::Versioned(Reverse(key)),
            None => Self::Other(Reverse(record.identifier.clone())),
        }
    }
}

/// Display order: numbered versions newest first, then everything else in
/// descending string order.
#[must_use]
pub fn compare_records(a: &VersionRecord, b: &VersionRecord) -> Ordering {
    DisplayKey::of(a).cmp(&DisplayKey::of(b))
}

/// Stable in-place sort by [`compare_records`].
pub fn sort_records(records: &mut [VersionRecord]) {
    records.sort_by_cached_key(DisplayKey::of);
}
