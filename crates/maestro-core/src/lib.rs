//! Core abstractions for Movie Maestro: domain types, input validation, and the
//! service and presentation contracts the clients and the CLI plug into.
//! This crate does no I/O of its own.

pub mod booking;
pub mod credentials;
pub mod movies;
pub mod presenter;
pub mod validation;
