//! Core types for Topspin Coaching.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod package;
pub mod visitor;

pub use email::{Email, EmailError};
pub use package::{CoachingPackage, PackageError};
pub use visitor::VisitorId;
