pub mod archive;
pub mod config;
pub mod database;
pub mod detection;
pub mod engine;
pub mod error;
pub mod indexer;
pub mod models;
pub mod mseed;
pub mod processing;
pub mod server;
pub mod waveform;

pub use config::Config;
pub use engine::SeismicEngine;
pub use error::SeismicError;
