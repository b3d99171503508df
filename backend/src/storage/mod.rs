//! Request-scoped storage.
//!
//! - [`scratch`]: Uniquely named scratch files with guaranteed removal

pub mod scratch;


pub use scratch::{ScratchFile, ScratchStore, DEFAULT_UPLOAD_NAME};
