use std::collections::HashSet;

use sdkui_backend::VersionRecord;

use crate::backend_kind::BackendKind;

/// Identifies one version entry across menu rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub backend: BackendKind,
    pub candidate: String,
    pub version: String,
}

impl EntryKey {
    pub fn new(
        backend: BackendKind,
        candidate: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            candidate: candidate.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.candidate, self.version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryAction {
    InstallAndUse,
    Uninstall,
    OpenHome,
}

impl EntryAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InstallAndUse => "install",
            Self::Uninstall => "uninstall",
            Self::OpenHome => "home",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "install" => Some(Self::InstallAndUse),
            "uninstall" => Some(Self::Uninstall),
            "home" => Some(Self::OpenHome),
            _ => None,
        }
    }
}

/// Sorted versions of one candidate, as shown in one submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyListing {
    pub backend: BackendKind,
    pub candidate: String,
    pub versions: Vec<VersionRecord>,
}

/// Menu state owned by the update loop: every family currently rendered and
/// the entries with an operation in flight.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    families: Vec<FamilyListing>,
    pending: HashSet<EntryKey>,
}

impl MenuRegistry {
    /// Swap in a freshly populated menu. In-flight operations stay tracked so
    /// their completions still land.
    pub fn replace(&mut self, families: Vec<FamilyListing>) {
        self.families = families;
    }

    pub fn families(&self) -> &[FamilyListing] {
        &self.families
    }

    pub fn record(&self, key: &EntryKey) -> Option<&VersionRecord> {
        self.family(key.backend, &key.candidate)?
            .versions
            .iter()
            .find(|record| record.identifier() == key.version)
    }

    fn family(&self, backend: BackendKind, candidate: &str) -> Option<&FamilyListing> {
        self.families
            .iter()
            .find(|family| family.backend == backend && family.candidate == candidate)
    }

    fn family_mut(&mut self, backend: BackendKind, candidate: &str) -> Option<&mut FamilyListing> {
        self.families
            .iter_mut()
            .find(|family| family.backend == backend && family.candidate == candidate)
    }

    /// Mark `key` busy. Returns `false` when an operation is already running.
    pub fn begin(&mut self, key: &EntryKey) -> bool {
        self.pending.insert(key.clone())
    }

    pub fn finish(&mut self, key: &EntryKey) {
        self.pending.remove(key);
    }

    pub fn is_pending(&self, key: &EntryKey) -> bool {
        self.pending.contains(key)
    }

    /// Record a successful install & use: `key` becomes the only active
    /// version of its family.
    pub fn mark_installed_active(&mut self, key: &EntryKey) -> bool {
        let Some(family) = self.family_mut(key.backend, &key.candidate) else {
            return false;
        };

        let mut found = false;
        for record in &mut family.versions {
            if record.identifier() == key.version {
                record.mark_installed(true);
                found = true;
            } else {
                record.deactivate();
            }
        }
        found
    }

    pub fn mark_uninstalled(&mut self, key: &EntryKey) -> bool {
        let Some(record) = self
            .family_mut(key.backend, &key.candidate)
            .and_then(|family| {
                family
                    .versions
                    .iter_mut()
                    .find(|record| record.identifier() == key.version)
            })
        else {
            return false;
        };
        record.mark_uninstalled();
        true
    }
}
