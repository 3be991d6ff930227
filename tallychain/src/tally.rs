use crate::*;
use num_bigint::BigUint;
use num_traits::One;

/// Homomorphically fold every ledger entry and decrypt one total per
/// candidate slot.
///
/// Each slot's accumulator starts at the ciphertext-group identity (1),
/// so a single-entry ledger decrypts to exactly that entry's plaintexts
/// and n ballots decrypt to the slot-wise plaintext sums. With one-hot
/// ballots the totals are vote counts per candidate.
///
/// Every entry must carry the same number of slots as the first, and
/// every slot must parse as a decimal ciphertext; the ledger must not be
/// empty.
pub fn tally(entries: &[LedgerEntry], key: &PrivateKey) -> Result<Vec<BigUint>, ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::EmptyLedger);
    }

    let public_key = &key.public_key;
    let width = entries[0].vote.len();
    let mut acc = vec![BigUint::one(); width];

    for entry in entries {
        if entry.vote.len() != width {
            return Err(ValidationError::MalformedVote {
                expected: width,
                found: entry.vote.len(),
            });
        }

        for (slot, value) in entry.vote.iter().enumerate() {
            let ciphertext = BigUint::parse_bytes(value.as_bytes(), 10)
                .ok_or(ValidationError::InvalidCiphertext(slot))?;
            acc[slot] = public_key.add_ciphertexts(&acc[slot], &ciphertext);
        }
    }

    Ok(acc.iter().map(|total| key.decrypt(total)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY_BITS: usize = 512;

    fn encrypted_entry(public_key: &PublicKey, plaintexts: &[u32], prev_hash: String) -> LedgerEntry {
        let vote = plaintexts
            .iter()
            .map(|m| public_key.encrypt(&BigUint::from(*m)).to_str_radix(10))
            .collect();
        let ballot = Ballot {
            timestamp: "2024-05-01T10:00:00Z".to_owned(),
            vote,
        };
        LedgerEntry::new(ballot, prev_hash)
    }

    #[test]
    fn empty_ledger_is_rejected() {
        let (_, private_key) = generate_keypair(TEST_KEY_BITS).unwrap();
        assert!(matches!(
            tally(&[], &private_key),
            Err(ValidationError::EmptyLedger)
        ));
    }

    #[test]
    fn single_entry_tallies_to_its_own_plaintexts() {
        let (public_key, private_key) = generate_keypair(TEST_KEY_BITS).unwrap();
        let entry = encrypted_entry(&public_key, &[3, 0, 7], String::new());

        let totals = tally(&[entry], &private_key).unwrap();
        assert_eq!(
            totals,
            vec![
                BigUint::from(3u32),
                BigUint::from(0u32),
                BigUint::from(7u32)
            ]
        );
    }

    #[test]
    fn totals_are_slotwise_sums() {
        let (public_key, private_key) = generate_keypair(TEST_KEY_BITS).unwrap();

        let mut entries = Vec::new();
        for plaintexts in [[1u32, 0], [0, 1], [1, 0]] {
            let prev_hash = entries
                .last()
                .map(|e: &LedgerEntry| e.hash.clone())
                .unwrap_or_default();
            entries.push(encrypted_entry(&public_key, &plaintexts, prev_hash));
        }

        let totals = tally(&entries, &private_key).unwrap();
        assert_eq!(totals, vec![BigUint::from(2u32), BigUint::from(1u32)]);
    }

    #[test]
    fn ragged_entries_are_rejected() {
        let (public_key, private_key) = generate_keypair(TEST_KEY_BITS).unwrap();

        let first = encrypted_entry(&public_key, &[1, 0], String::new());
        let second = encrypted_entry(&public_key, &[1], first.hash.clone());

        assert!(matches!(
            tally(&[first, second], &private_key),
            Err(ValidationError::MalformedVote {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn non_decimal_ciphertexts_are_rejected() {
        let (_, private_key) = generate_keypair(TEST_KEY_BITS).unwrap();

        let ballot = Ballot {
            timestamp: "2024-05-01T10:00:00Z".to_owned(),
            vote: vec!["42".to_owned(), "not-a-ciphertext".to_owned()],
        };
        let entry = LedgerEntry::new(ballot, String::new());

        assert!(matches!(
            tally(&[entry], &private_key),
            Err(ValidationError::InvalidCiphertext(1))
        ));
    }
}
