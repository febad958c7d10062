//! Rules constants shared by the dice engine, the resolver and the service.

pub mod constants;

pub use constants::*;
