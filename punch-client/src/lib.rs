mod client;
mod dto;
mod endpoint;
mod error;
mod service;
mod types;

pub use client::*;
pub use endpoint::*;
pub use error::*;
pub use service::*;
pub use types::*;
