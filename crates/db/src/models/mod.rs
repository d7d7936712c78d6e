//! Row structs and DTOs.
//!
//! Each submodule has a `FromRow` + `Serialize` struct for its table and,
//! where the API writes to it, a `Deserialize` create DTO.

pub mod analysis;
pub mod dog;
pub mod user;
