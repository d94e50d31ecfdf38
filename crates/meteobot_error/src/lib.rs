//! Error types for the meteobot weather bot.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enums define specific error conditions
//! - `*Error` structs wrap the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use meteobot_error::{MeteobotResult, HttpError};
//!
//! fn fetch_data() -> MeteobotResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod transport;
mod weather;

pub use config::ConfigError;
pub use error::{MeteobotError, MeteobotErrorKind, MeteobotResult};
pub use http::HttpError;
pub use transport::{TransportError, TransportErrorKind};
pub use weather::{WeatherError, WeatherErrorKind};
