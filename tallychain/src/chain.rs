use crate::*;

/// Check that every entry's declared `prev_hash` matches the actual hash
/// of its predecessor, in storage order.
///
/// This is a linkage check only: stored hashes are taken at face value,
/// so rewriting an entry's content together with its `hash` and the next
/// entry's `prev_hash` goes unnoticed. [`audit_chain`] also catches
/// that. Trivially true for zero or one entries.
pub fn verify_chain(entries: &[LedgerEntry]) -> Result<(), ValidationError> {
    for i in 1..entries.len() {
        if entries[i].prev_hash != entries[i - 1].hash {
            return Err(ValidationError::ChainBroken {
                index: i,
                expected: entries[i - 1].hash.clone(),
                actual: entries[i].prev_hash.clone(),
            });
        }
    }
    Ok(())
}

/// Full audit: linkage plus recomputing every entry's hash from its
/// stored fields.
///
/// An entry whose content was rewritten fails here even when its
/// `hash`/`prev_hash` pair was fixed up consistently.
pub fn audit_chain(entries: &[LedgerEntry]) -> Result<(), ValidationError> {
    verify_chain(entries)?;

    for (i, entry) in entries.iter().enumerate() {
        if entry.hash != entry.compute_hash() {
            return Err(ValidationError::TamperedEntry(i));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_chain(len: usize) -> Vec<LedgerEntry> {
        let mut entries: Vec<LedgerEntry> = Vec::with_capacity(len);
        for i in 0..len {
            let ballot = Ballot {
                timestamp: format!("2024-05-01T10:00:0{}Z", i),
                vote: vec![format!("{}", 1000 + i)],
            };
            let prev_hash = entries.last().map(|e| e.hash.clone()).unwrap_or_default();
            entries.push(LedgerEntry::new(ballot, prev_hash));
        }
        entries
    }

    #[test]
    fn sequentially_built_chains_verify() {
        assert!(verify_chain(&build_chain(0)).is_ok());
        assert!(verify_chain(&build_chain(1)).is_ok());
        assert!(verify_chain(&build_chain(5)).is_ok());
        assert!(audit_chain(&build_chain(5)).is_ok());
    }

    #[test]
    fn broken_link_is_reported_at_its_index() {
        let mut entries = build_chain(5);
        entries[3].prev_hash = "deadbeef".to_owned();

        match verify_chain(&entries) {
            Err(ValidationError::ChainBroken {
                index,
                expected,
                actual,
            }) => {
                assert_eq!(index, 3);
                assert_eq!(expected, entries[2].hash);
                assert_eq!(actual, "deadbeef");
            }
            other => panic!("expected a broken chain, got {:?}", other),
        }
    }

    #[test]
    fn only_the_first_break_is_reported() {
        let mut entries = build_chain(5);
        entries[2].prev_hash = "deadbeef".to_owned();
        entries[4].prev_hash = "cafebabe".to_owned();

        match verify_chain(&entries) {
            Err(ValidationError::ChainBroken { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected a broken chain, got {:?}", other),
        }
    }

    #[test]
    fn consistent_rewrite_passes_linkage_but_fails_audit() {
        let mut entries = build_chain(3);

        // Rewrite entry 1's content and fix up both its own hash and
        // entry 2's back-link, the way a tamperer with write access to
        // the store would.
        entries[1].vote[0] = "9999".to_owned();
        entries[1].hash = entries[1].compute_hash();
        entries[2].prev_hash = entries[1].hash.clone();

        assert!(verify_chain(&entries).is_ok());
        match audit_chain(&entries) {
            Err(ValidationError::TamperedEntry(index)) => assert_eq!(index, 2),
            other => panic!("expected a tampered entry, got {:?}", other),
        }
    }
}
