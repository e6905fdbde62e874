//! Rainworms: the dice game, bots that play it, and the turn search behind the tree bots.
pub mod bots;
pub mod config;
pub mod driver;
pub mod error;
pub mod rainworms;
pub mod search;


pub use error::{RainwormsError, Result};
