//! # Application Layer
//!
//! Contains the core behavior of the bot: the poll-and-reply cycle,
//! the watermark store, interrupt handling and logging bootstrap.

pub mod bot;
pub mod logging;
pub mod shutdown;
pub mod store;
