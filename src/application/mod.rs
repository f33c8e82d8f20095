// Application layer - the billing session the CLI drives.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
