use crate::*;
use chrono::DateTime;
use digest::Digest;
use sha2::Sha256;

/// A single submitted vote: one decimal-string ciphertext per candidate
/// slot, encrypted by the client under the published public key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ballot {
    pub timestamp: String,
    pub vote: Vec<String>,
}

impl Ballot {
    /// Check that the submission is acceptable: the timestamp must be
    /// RFC 3339.
    ///
    /// Ciphertext strings are not parsed here; a slot that does not
    /// parse surfaces at tally time instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        DateTime::parse_from_rfc3339(&self.timestamp)?;
        Ok(())
    }
}

/// One persisted vote, hash-linked to its predecessor.
///
/// Entries are created once at submission time and never modified. The
/// first entry ever stored carries an empty `prev_hash`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub timestamp: String,
    pub vote: Vec<String>,
    pub prev_hash: String,
    pub hash: String,
}

impl LedgerEntry {
    /// Build the entry linking `ballot` to the entry whose hash is
    /// `prev_hash`, and stamp it with its own hash.
    pub fn new(ballot: Ballot, prev_hash: String) -> Self {
        let mut entry = LedgerEntry {
            timestamp: ballot.timestamp,
            vote: ballot.vote,
            prev_hash,
            hash: String::new(),
        };
        entry.hash = entry.compute_hash();
        entry
    }

    /// SHA-256 over the canonical JSON encoding of the entry with the
    /// `hash` field set to the empty string, hex-encoded.
    ///
    /// The digest input serializes fields in declaration order
    /// (`timestamp`, `vote`, `prev_hash`, `hash`); reordering the struct
    /// fields would change every stored hash.
    pub fn compute_hash(&self) -> String {
        let unhashed = LedgerEntry {
            hash: String::new(),
            ..self.clone()
        };
        let encoded = serde_json::to_vec(&unhashed)
            .expect("tallychain: unexpected error serializing ledger entry");
        hex::encode(Sha256::digest(&encoded))
    }
}
