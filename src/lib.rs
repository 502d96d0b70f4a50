//! LumoFace emotion generator: a weighted catalog of robot-face emotions with
//! random draws, sequences, JSON export and a timed display simulation.

pub mod cli;
pub mod config;
pub mod emotion;
pub mod error;

pub use config::AppConfig;
pub use emotion::{Catalog, EmotionRecord, SequenceItem};
pub use error::{CatalogError, InputError};
