pub mod client;

pub use client::{DerivClient, FetchError};
