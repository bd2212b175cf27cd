//! Topspin Core - Shared types library.
//!
//! This crate provides the domain types used by the Topspin Coaching
//! marketing site.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, visitor ids, and coaching packages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
