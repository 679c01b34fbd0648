pub mod provision;
pub mod setup;
pub mod validate;
