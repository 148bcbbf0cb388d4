#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod ledger;
pub mod partition;
pub mod registry;
pub mod types;

pub use engine::ConditionalTokens;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
