//! # Folio Core
//!
//! The domain layer of the Folio content API.
//! Entities, ports, request validation and the authentication service live
//! here; nothing in this crate talks to a database or an HTTP socket.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
