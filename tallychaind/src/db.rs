use log::{error, info};
use rocket::fairing::{self, AdHoc};
use rocket::{Build, Rocket};
use sqlx::{ConnectOptions, Row};
use tallychain::{generate_keypair, Error, LedgerEntry, MemStore, PrivateKey};

use crate::config::Config;

pub type Db = sqlx::SqlitePool;

async fn init_db(rocket: Rocket<Build>) -> fairing::Result {
    let config = Config::from_env();

    let mut opts = sqlx::sqlite::SqliteConnectOptions::new()
        .filename(&config.db_path)
        .create_if_missing(true);
    opts.disable_statement_logging();

    let db = match Db::connect_with(opts).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to the SQLite database: {}", e);
            return Err(rocket);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
        error!("Failed to initialize the SQLite database: {}", e);
        return Err(rocket);
    }

    let key = match load_or_generate_keypair(&db, config.key_bits).await {
        Ok(key) => key,
        Err(e) => {
            error!("Failed to set up the election keypair: {}", e);
            return Err(rocket);
        }
    };

    let ledger = match load_ledger(&db).await {
        Ok(ledger) => ledger,
        Err(e) => {
            error!("Failed to load the ballot ledger: {}", e);
            return Err(rocket);
        }
    };

    Ok(rocket.manage(db).manage(crate::Board::new(key, ledger)))
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("SQLx Stage", |rocket| async {
        rocket.attach(AdHoc::try_on_ignite("SQLx Database", init_db))
    })
}

/// Load the election keypair stored on a previous boot, or generate and
/// store a fresh one. Keys are never regenerated while the database
/// exists: ciphertexts in the ledger are only decryptable under the key
/// they were encrypted for.
async fn load_or_generate_keypair(db: &Db, key_bits: usize) -> Result<PrivateKey, Error> {
    let row = sqlx::query("SELECT data FROM keypair WHERE id = 1")
        .fetch_optional(db)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;

    if let Some(row) = row {
        let data: String = row.try_get("data").map_err(|e| Error::Store(e.to_string()))?;
        let key = serde_json::from_str(&data)?;
        info!("Loaded the election keypair from the database");
        return Ok(key);
    }

    info!("Generating a fresh {}-bit election keypair", key_bits);
    let (_, key) = generate_keypair(key_bits)?;

    let data = serde_json::to_string(&key)?;
    sqlx::query("INSERT INTO keypair (id, data) VALUES (1, ?)")
        .bind(data)
        .execute(db)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;

    Ok(key)
}

/// Rebuild the in-memory working copy of the ledger, in insertion order.
async fn load_ledger(db: &Db) -> Result<MemStore, Error> {
    let rows = sqlx::query("SELECT data FROM votes ORDER BY seq")
        .fetch_all(db)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let data: String = row.try_get("data").map_err(|e| Error::Store(e.to_string()))?;
        let entry: LedgerEntry = serde_json::from_str(&data)?;
        entries.push(entry);
    }

    info!("Loaded {} ledger entries", entries.len());
    Ok(MemStore::from(entries))
}

/// Persist one entry; the `seq` column records insertion order.
pub async fn insert_entry(db: &Db, entry: &LedgerEntry) -> Result<(), Error> {
    let data = serde_json::to_string(entry)?;

    sqlx::query("INSERT INTO votes (hash, data) VALUES (?, ?)")
        .bind(&entry.hash)
        .bind(data)
        .execute(db)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;

    Ok(())
}
