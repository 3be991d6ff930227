use std::env::var;

pub struct Config {
    pub db_path: String,
    pub key_bits: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = match var("TALLYCHAIN_DB_PATH") {
            Ok(val) => val,
            Err(_e) => "./tallychain.db".to_owned(),
        };

        let key_bits = match var("TALLYCHAIN_KEY_BITS") {
            Ok(val) => val
                .parse()
                .expect("TALLYCHAIN_KEY_BITS must be a number of bits"),
            Err(_e) => 1024,
        };

        Config { db_path, key_bits }
    }
}
