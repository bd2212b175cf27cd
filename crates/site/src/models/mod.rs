//! Data models for the site.

pub mod session;
