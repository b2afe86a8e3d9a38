//! Contract checks for the hello-world extension.

pub mod cli;
pub mod contract;
pub mod routes;

pub use contract::{AdjectivesResponse, cases, default_config};
