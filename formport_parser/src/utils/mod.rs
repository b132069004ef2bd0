//! FormPort Utils - Shared types and utilities for the view parser passes
//!
//! This module provides dependency-light primitive types and helper utilities
//! used across document loading, structural parsing, and aggregation.

pub mod grid;
pub mod text;

pub use grid::{column_letter, DocPos, GridPos};
pub use text::{collapse_whitespace, is_caption_shaped, sanitize_identifier};
