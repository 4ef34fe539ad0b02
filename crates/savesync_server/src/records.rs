//! Stored saves.

use parking_lot::RwLock;
use std::collections::HashMap;

/// The last accepted save of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRecord {
    /// Sequence number of the save.
    pub sn: u64,
    /// Client version that produced it.
    pub version: String,
    /// Opaque encrypted document token.
    pub save_data: String,
}

/// Saves keyed by the opaque user token.
///
/// The server never decrypts anything: the token produced by a client's
/// codec is the identity.
#[derive(Debug, Default)]
pub struct SaveRecords {
    records: RwLock<HashMap<String, SaveRecord>>,
}

impl SaveRecords {
    /// Creates an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `user_token`.
    pub fn get(&self, user_token: &str) -> Option<SaveRecord> {
        self.records.read().get(user_token).cloned()
    }

    /// Stores `record` if `accept` approves the current one.
    ///
    /// The check and the write happen under one lock, so two concurrent
    /// saves cannot both pass a sequence check against the same record.
    pub fn put_if<E>(
        &self,
        user_token: &str,
        record: SaveRecord,
        accept: impl FnOnce(Option<&SaveRecord>) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut records = self.records.write();
        accept(records.get(user_token))?;
        records.insert(user_token.to_string(), record);
        Ok(())
    }

    /// Number of users with a save.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sn: u64) -> SaveRecord {
        SaveRecord {
            sn,
            version: "1.0".into(),
            save_data: "QUJD".into(),
        }
    }

    #[test]
    fn put_and_get() {
        let records = SaveRecords::new();
        assert!(records.is_empty());
        records.put_if::<()>("u", record(1), |_| Ok(())).unwrap();
        assert_eq!(records.get("u"), Some(record(1)));
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("other"), None);
    }

    #[test]
    fn refused_put_keeps_record() {
        let records = SaveRecords::new();
        records.put_if::<()>("u", record(2), |_| Ok(())).unwrap();
        let refused = records.put_if("u", record(1), |current| {
            if current.is_some_and(|c| c.sn >= 1) {
                Err("stale")
            } else {
                Ok(())
            }
        });
        assert_eq!(refused, Err("stale"));
        assert_eq!(records.get("u").unwrap().sn, 2);
    }
}
