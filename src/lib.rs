pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod receipt;
pub mod storage;

pub use application::{AppError, BillingSession};
pub use domain::*;
