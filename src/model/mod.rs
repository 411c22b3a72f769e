//! Data model for crawled swimmer profiles
//!
//! # Components
//!
//! - `SwimmerRecord`: One extracted profile (identity attributes plus competition history)
//! - `Competition` / `Event`: The nested results history, in document order
//! - `RecordCollection`: The run-scoped, single-writer collection of accumulated records

mod collection;
mod swimmer;

// Re-export main types
pub use collection::RecordCollection;
pub use swimmer::{Competition, Event, ProfileBody, SwimmerRecord};
