//! Local cache of station archives and their extracted data files.
//!
//! Archives are matched by listing the remote directory, because only the stem of their name is
//! predictable. Each archive is stored under its remote name in the family's cache directory and
//! its data member is extracted next to it as `<archive stem>.txt`.

pub mod cache;
pub mod error;
pub mod extract;
