#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod error;
pub use error::*;

mod union_type;
pub use union_type::*;

mod instance;
pub use instance::*;
