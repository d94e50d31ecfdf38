//! MAX messenger weather bot.
//!
//! Wires the workspace crates into a running bot: environment
//! configuration, the MAX Bot API transport (long polling), and the
//! message handler that routes chat text through city resolution, the
//! TTL cache, and the weather provider.

#![warn(missing_docs)]

pub mod config;
pub mod handler;
pub mod transport;

pub use config::BotConfig;
pub use handler::MessageHandler;
pub use transport::{ChatSink, IncomingMessage, MaxClient, SentMessage, Update, UpdateBatch};
