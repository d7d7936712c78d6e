//! Domain logic for the Guau behavioral alert service.
//!
//! Everything in this crate is independent of HTTP and SQL. The event store
//! is reached only through the [`behavior::store::EventStore`] trait, which the
//! database crate implements for Postgres and [`behavior::memory`] implements
//! in memory.

pub mod alert;
pub mod behavior;
pub mod emotion;
pub mod error;
pub mod types;
pub mod validation;
