use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("tallychain: key generation failed: {0}")]
    KeyGeneration(&'static str),

    #[error("tallychain: store failure: {0}")]
    Store(String),

    #[error("tallychain: JSON error encoding or decoding ledger state: {0}")]
    JSONSerialization(#[from] serde_json::Error),
}

/// Ballot and ledger validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tallychain validation: invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),

    #[error("tallychain validation: empty ledger, nothing to tally")]
    EmptyLedger,

    #[error("tallychain validation: entry has {found} vote slots, expected {expected}")]
    MalformedVote { expected: usize, found: usize },

    #[error("tallychain validation: vote slot {0} is not a valid decimal ciphertext")]
    InvalidCiphertext(usize),

    #[error(
        "tallychain validation: chain broken at entry {index}: expected prev_hash {expected}, found {actual}"
    )]
    ChainBroken {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("tallychain validation: entry {0} does not match its stored hash")]
    TamperedEntry(usize),

    #[error(transparent)]
    Store(#[from] Error),
}
