//! Domain Layer
//!
//! Result model and pure evaluation logic, no I/O.
//!
//! ## Structure
//!
//! - `entities/` - `CheckResult`, `ResultSet`, `SuiteResult`
//! - `value_objects/` - categories, suite identifiers, principals
//! - `services/` - overlap evaluation and run summaries
//! - `ports/` - traits for the platform, BI service and SQL endpoint
//!
//! Everything that talks to the network lives behind `ports/` and is
//! implemented in `infrastructure`.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
