//! TutorHub Core - Shared types library.
//!
//! This crate provides common types used across all TutorHub components:
//! - `portal` - The assignment-management web portal
//! - `integration-tests` - End-to-end tests against a stub upstream API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! here mirrors representations served by the upstream assignment API.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and
//!   assignment statuses
//! - [`models`] - Resource representations (users, subjects, assignments,
//!   comments)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
