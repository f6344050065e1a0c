//! Core types and functionality for pagegen
//!
//! This module forms the foundation of pagegen's type system: the error
//! taxonomy shared by every pipeline stage, and the user-facing error
//! presentation used by the CLI.
//!
//! # Error Management
//!
//! pagegen uses an error handling system designed for both developer
//! ergonomics and end-user experience:
//! - **Strongly-typed errors** ([`PagegenError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions
//! - **Automatic conversion** from common standard library errors
//!
//! The split between "this page does not exist" (not-found outcomes) and
//! "something is wrong" (real failures) lives here: the route layer calls
//! [`PagegenError::is_not_found`] and never inspects individual variants.
//!
//! # Design Principles
//!
//! - Every fallible operation returns a [`Result`] with meaningful error
//!   information.
//! - All user-facing errors include contextual suggestions and clear guidance
//!   for resolution.

pub mod error;

pub use error::{ErrorContext, PagegenError, user_friendly_error};
