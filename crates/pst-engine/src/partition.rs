//! Partitioning of new entries into report categories.

use crate::table::TableSpec;
use crate::types::{GroupKey, NewEntry};

/// One report category: a group key and its member rows in
/// current-snapshot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: GroupKey,
    pub entries: Vec<NewEntry>,
}

/// The full partition of a run's new entries.
///
/// Group iteration order is first-occurrence order in the current
/// snapshot; downstream dispatch order follows it. No group is ever
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<Group>,
}

impl Partition {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Bucket entries by group key, preserving relative order within each
/// bucket.
///
/// Unknown or empty keys (malformed leading fields) form their own
/// group rather than being dropped — every new entry lands in exactly
/// one group.
pub fn partition(entries: Vec<NewEntry>, spec: &TableSpec) -> Partition {
    let mut groups: Vec<Group> = Vec::new();

    for entry in entries {
        let key = GroupKey::extract(entry.leading_key(spec), spec.prefix_len);
        // Linear scan: the number of distinct sale types is tiny.
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.entries.push(entry),
            None => groups.push(Group {
                key,
                entries: vec![entry],
            }),
        }
    }

    Partition { groups }
}
