//! Bot error type and Telegram Bot API data types.

pub mod error;
pub mod telegram;

pub use error::*;
pub use telegram::*;
