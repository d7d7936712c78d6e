//! External delivery channels for owner notifications.

pub mod email;
