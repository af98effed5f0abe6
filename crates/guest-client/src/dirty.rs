//! Pending upsert and delete ids.
//!
//! Each mark carries a sequence number. Settling a flush removes an id only
//! if it was not marked again after the flush snapshot, so edits made while
//! a request is in flight stay pending.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyKind {
    Upsert,
    Delete,
}

/// Ids captured for one flush, with the sequence they were captured at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySnapshot {
    pub upserts: Vec<(String, u64)>,
    pub deletes: Vec<(String, u64)>,
}

impl DirtySnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    pub fn upsert_ids(&self) -> impl Iterator<Item = &str> {
        self.upserts.iter().map(|(id, _)| id.as_str())
    }

    pub fn delete_ids(&self) -> impl Iterator<Item = &str> {
        self.deletes.iter().map(|(id, _)| id.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    upserts: BTreeMap<String, u64>,
    deletes: BTreeMap<String, u64>,
    seq: u64,
}

impl DirtySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an id. An upsert cancels a pending delete and vice versa.
    pub fn mark(&mut self, id: &str, kind: DirtyKind) {
        self.seq += 1;
        let (add, clear) = match kind {
            DirtyKind::Upsert => (&mut self.upserts, &mut self.deletes),
            DirtyKind::Delete => (&mut self.deletes, &mut self.upserts),
        };
        clear.remove(id);
        add.insert(id.to_string(), self.seq);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str, kind: DirtyKind) -> bool {
        match kind {
            DirtyKind::Upsert => self.upserts.contains_key(id),
            DirtyKind::Delete => self.deletes.contains_key(id),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.upserts.len() + self.deletes.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> DirtySnapshot {
        let entries = |map: &BTreeMap<String, u64>| {
            map.iter().map(|(id, seq)| (id.clone(), *seq)).collect()
        };
        DirtySnapshot {
            upserts: entries(&self.upserts),
            deletes: entries(&self.deletes),
        }
    }

    /// Clear the ids of a successful flush, except those in `failed` and
    /// those re-marked since the snapshot.
    pub fn settle(&mut self, snapshot: &DirtySnapshot, failed: &[String]) {
        let keep = |id: &str| failed.iter().any(|f| f == id);
        for (id, seq) in &snapshot.upserts {
            if !keep(id) && self.upserts.get(id) == Some(seq) {
                self.upserts.remove(id);
            }
        }
        for (id, seq) in &snapshot.deletes {
            if !keep(id) && self.deletes.get(id) == Some(seq) {
                self.deletes.remove(id);
            }
        }
    }
}
