//! Maps logical variable requests onto the remote directory tree and filenames.
//!
//! Everything in here is pure: no I/O, no configuration beyond the climate root passed in.

pub mod error;
pub mod resolver;
pub mod table;
