//! MemCard Pro state source for the tty2rpi marquee.
//!
//! The device exposes `GET /api/currentState`; the loaded game id is mapped
//! to a marquee title through a CSV game database, with the configured
//! default memory cards standing in for "no game, console menu".

pub mod api;
pub mod config;
pub mod game_db;
pub mod resolve;
pub mod source;

pub use api::{CurrentState, MemCardProClient};
pub use config::{MemCardProConfig, SenderConfig};
pub use game_db::{GameDb, GameRecord};
pub use resolve::{DefaultCards, DeviceKind};
pub use source::{DeviceCandidate, MemCardProSource};
