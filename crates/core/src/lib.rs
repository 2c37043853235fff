//! Domain building blocks shared by every Persona Studio crate.
//!
//! No I/O lives here: ids, the domain error type, validation rules,
//! prompt construction and search helpers.

pub mod error;
pub mod media;
pub mod persona;
pub mod prompt;
pub mod search;
pub mod types;
