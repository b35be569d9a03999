use std::collections::{HashMap, HashSet};

use crate::types::VersionRecord;

/// Index records by identifier; a later record replaces an earlier one.
pub fn local_map<I>(records: I) -> HashMap<String, VersionRecord>
where
    I: IntoIterator<Item = VersionRecord>,
{
    records
        .into_iter()
        .map(|record| (record.identifier().to_string(), record))
        .collect()
}

/// Merge local state into a remote identifier listing.
///
/// One record per distinct remote identifier, in first-occurrence order.
/// Identifiers that only exist locally are not added.
#[must_use]
pub fn reconcile<S: AsRef<str>>(
    remote: &[S],
    local: &HashMap<String, VersionRecord>,
) -> Vec<VersionRecord> {
    let mut seen = HashSet::new();
    remote
        .iter()
        .map(AsRef::as_ref)
        .filter(|identifier| seen.insert(*identifier))
        .map(|identifier| {
            local
                .get(identifier)
                .cloned()
                .unwrap_or_else(|| VersionRecord::available(identifier))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_flags_are_carried_into_remote_listing() {
        let local = local_map([VersionRecord::new("v18.0.0", true, true)]);
        let merged = reconcile(&["v18.0.0", "v20.0.0"], &local);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].identifier(), "v18.0.0");
        assert!(merged[0].installed());
        assert!(merged[0].active());
        assert_eq!(merged[1].identifier(), "v20.0.0");
        assert!(!merged[1].installed());
        assert!(!merged[1].active());
    }

    #[test]
    fn duplicate_remote_identifiers_collapse() {
        let local = local_map([VersionRecord::new("3.9.6", true, false)]);
        let merged = reconcile(&["3.9.6", "3.8.8", "3.9.6"], &local);

        let ids: Vec<&str> = merged.iter().map(VersionRecord::identifier).collect();
        assert_eq!(ids, vec!["3.9.6", "3.8.8"]);
        assert!(merged[0].installed());
    }

    #[test]
    fn local_only_identifiers_are_not_added() {
        let local = local_map([VersionRecord::new("dev", true, false).with_custom(true)]);
        let merged = reconcile(&["1.0.0"], &local);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].identifier(), "1.0.0");
    }

    #[test]
    fn local_map_keeps_last_record() {
        let map = local_map([
            VersionRecord::new("1.0.0", true, false),
            VersionRecord::new("1.0.0", true, true),
        ]);
        assert_eq!(map.len(), 1);
        assert!(map["1.0.0"].active());
    }

    #[test]
    fn empty_remote_yields_nothing() {
        let local = local_map([VersionRecord::new("1.0.0", true, true)]);
        let remote: [&str; 0] = [];
        assert!(reconcile(&remote, &local).is_empty());
    }
}
