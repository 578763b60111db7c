//! File system storage
//!
//! Read-only access to the serving directory.

pub mod operations;

pub use operations::list_files;
