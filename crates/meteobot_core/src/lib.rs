//! Domain glue for the meteobot weather bot.
//!
//! City alias resolution, city-name validation, and the catalog of
//! user-facing reply texts. No I/O lives here; everything is pure
//! text-to-text logic consumed by the message handler.

#![warn(missing_docs)]

mod city;
pub mod messages;
mod validation;

pub use city::{CityAliases, CityResolver, ResolvedCity};
pub use validation::{CityValidator, rate_limit_exceeded};
