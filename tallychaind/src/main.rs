use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::tokio::sync::Mutex;
use rocket::{Request, State};
use serde::Serialize;
use tallychain::*;

#[macro_use]
extern crate rocket;

mod config;
mod db;

use db::Db;

/// Everything a request handler needs to serve the election: the keypair
/// and the single write/tally lock around the working copy of the
/// ledger. Built once at launch and managed by Rocket.
pub struct Board {
    key: PrivateKey,
    ledger: Mutex<MemStore>,
}

impl Board {
    pub fn new(key: PrivateKey, ledger: MemStore) -> Self {
        Board {
            key,
            ledger: Mutex::new(ledger),
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct TallyResponse {
    result: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_hash: Option<String>,
}

impl ErrorResponse {
    fn new(error: String) -> Self {
        ErrorResponse {
            error,
            index: None,
            expected_hash: None,
            actual_hash: None,
        }
    }
}

/// Route-level wrapper mapping core errors onto HTTP statuses: validation
/// and integrity failures are the caller's problem (400), store and
/// ciphertext failures are ours (500).
pub struct ApiError(ValidationError);

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(ValidationError::Store(err))
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = match &self.0 {
            ValidationError::Store(_) | ValidationError::InvalidCiphertext(_) => {
                Status::InternalServerError
            }
            _ => Status::BadRequest,
        };

        let body = match self.0 {
            ValidationError::ChainBroken {
                index,
                expected,
                actual,
            } => ErrorResponse {
                error: "ledger integrity check failed".to_owned(),
                index: Some(index),
                expected_hash: Some(expected),
                actual_hash: Some(actual),
            },
            other => ErrorResponse::new(other.to_string()),
        };

        (status, Json(body)).respond_to(request)
    }
}

#[get("/public-key")]
fn public_key(board: &State<Board>) -> Json<PublicKey> {
    Json(board.key.public_key.clone())
}

#[get("/vote")]
async fn list_votes(board: &State<Board>) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    let ledger = board.ledger.lock().await;
    Ok(Json(ledger.all()?))
}

#[post("/vote", data = "<ballot>")]
async fn cast_vote(
    board: &State<Board>,
    db: &State<Db>,
    ballot: Json<Ballot>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ballot = ballot.into_inner();
    ballot.validate()?;

    // The lock serializes submissions against each other and against
    // tallies, and the database insert happens inside the critical
    // section so `seq` order always matches chain order.
    let mut ledger = board.ledger.lock().await;
    let prev_hash = ledger.last()?.map(|entry| entry.hash).unwrap_or_default();
    let entry = LedgerEntry::new(ballot, prev_hash);

    db::insert_entry(db, &entry).await?;
    ledger.append(entry)?;

    Ok(Json(MessageResponse {
        message: "vote accepted",
    }))
}

#[get("/vote/tally")]
async fn tally_votes(board: &State<Board>) -> Result<Json<TallyResponse>, ApiError> {
    let ledger = board.ledger.lock().await;
    let totals = tally(&ledger.all()?, &board.key)?;

    Ok(Json(TallyResponse {
        result: totals.iter().map(|total| total.to_str_radix(10)).collect(),
    }))
}

#[get("/vote/check")]
async fn check_chain(board: &State<Board>) -> Result<Json<MessageResponse>, ApiError> {
    // Verification takes the write lock too: a chain observed mid-append
    // must not be reported as tampering.
    let ledger = board.ledger.lock().await;
    verify_chain(&ledger.all()?)?;

    Ok(Json(MessageResponse {
        message: "all entries correctly linked",
    }))
}

#[launch]
fn rocket() -> _ {
    rocket::build().attach(db::stage()).mount(
        "/",
        routes![public_key, list_votes, cast_vote, tally_votes, check_chain],
    )
}
