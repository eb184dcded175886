pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod player;
pub mod storage;

pub use config::Config;
pub use error::{GameError, PersistenceError, PlayerError, Result};
