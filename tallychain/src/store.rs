use crate::*;

/// An append-only ballot ledger with guaranteed insertion order.
///
/// `all` must return entries in the exact order they were appended and
/// `last` must return the most recent one: both the chain-link invariant
/// and tally correctness depend on that order, so backends without a
/// queryable insertion order (a monotonic sequence key or equivalent)
/// cannot implement this trait correctly. Fallible backends surface
/// failures as [`Error::Store`].
pub trait Store {
    /// Append one entry to the ledger.
    fn append(&mut self, entry: LedgerEntry) -> Result<(), Error>;

    /// Fetch an entry by its hash.
    fn get(&self, hash: &str) -> Result<Option<LedgerEntry>, Error>;

    /// The most recently appended entry, if any.
    fn last(&self) -> Result<Option<LedgerEntry>, Error>;

    /// Every entry, in insertion order.
    fn all(&self) -> Result<Vec<LedgerEntry>, Error>;
}

/// Validate a ballot and append it to the ledger, linked to the current
/// head entry.
///
/// Callers with more than one writer must serialize calls to this
/// function (and any concurrent tally) behind a single lock: two racing
/// submissions would otherwise read the same head and both claim it as
/// their predecessor.
pub fn submit_ballot<S: Store>(
    store: &mut S,
    ballot: Ballot,
) -> Result<LedgerEntry, ValidationError> {
    ballot.validate()?;

    let prev_hash = store.last()?.map(|entry| entry.hash).unwrap_or_default();
    let entry = LedgerEntry::new(ballot, prev_hash);
    store.append(entry.clone())?;

    Ok(entry)
}

/// A simple store that keeps the ledger in memory, in insertion order
#[derive(Default, Clone)]
pub struct MemStore {
    entries: Vec<LedgerEntry>,
}

impl Store for MemStore {
    fn append(&mut self, entry: LedgerEntry) -> Result<(), Error> {
        self.entries.push(entry);
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Option<LedgerEntry>, Error> {
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.hash == hash)
            .cloned())
    }

    fn last(&self) -> Result<Option<LedgerEntry>, Error> {
        Ok(self.entries.last().cloned())
    }

    fn all(&self) -> Result<Vec<LedgerEntry>, Error> {
        Ok(self.entries.clone())
    }
}

impl From<Vec<LedgerEntry>> for MemStore {
    fn from(entries: Vec<LedgerEntry>) -> Self {
        MemStore { entries }
    }
}
