//! Core business logic abstractions

pub mod asset;
pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod quote;
pub mod session;

// Re-export main types for cleaner imports
pub use asset::{Asset, AssetDirectory, CatalogProvider, RawAsset};
pub use convert::{ConversionRequest, ConversionResult, ConversionState, RateConverter};
pub use error::ConversionError;
pub use quote::{QuoteProvider, Quotes};
pub use session::{Action, Effect, Session};
