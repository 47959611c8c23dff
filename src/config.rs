use std::path::PathBuf;

use crate::error::SeismicError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DATABASE_PATH: &str = "instance/seismic_metadata.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub index_workers: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, SeismicError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| SeismicError::Config {
                message: format!("Invalid PORT: {}", raw),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        let index_workers = match std::env::var("INDEX_WORKERS") {
            Ok(raw) => raw.parse().map_err(|_| SeismicError::Config {
                message: format!("Invalid INDEX_WORKERS: {}", raw),
            })?,
            Err(_) => default_index_workers(),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            database_path,
            index_workers,
        })
    }
}

pub fn default_index_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
