#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

extern crate alloc;

// Shared byte storage and zero-copy views
mod buffer;
pub use buffer::*;

// The dynamic value model
mod value;
pub use value::*;

// Access failures
mod error;
pub use error::*;

// The typed-memory-access contract and the primitive types implementing it
mod types;
pub use types::*;
