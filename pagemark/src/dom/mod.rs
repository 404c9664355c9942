//! In-memory document tree.
//!
//! This module provides:
//! - An arena-based [`Document`] with the fixed skeleton the engine expects
//!   (head, title, body, content root)
//! - Stable [`NodeId`] handles usable as side-table keys
//! - A [`SharedDocument`] alias for the externally-owned handle the engine
//!   and its host both hold

mod document;
mod node;

pub use document::{Document, SharedDocument};
pub use node::{ElementData, NodeData, NodeId};
