// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;

pub mod aggregate;
pub mod csv;
pub mod driver;
pub mod error;
pub mod extract;
pub mod page;
pub mod paginate;
pub mod progress;
pub mod record;
pub mod replay;
pub mod runner;
pub mod store;

pub use error::{Error, Result};
