//! Document model types for extracted content.
//!
//! This module defines the intermediate representation that bridges
//! document parsing and page-tree building: an ordered sequence of
//! [`ContentNode`]s plus the [`ImageAsset`]s their image nodes refer to.

mod asset;
mod document;
mod node;

pub use asset::{ImageAsset, ImageFormat};
pub use document::{ExtractedDocument, Metadata};
pub use node::{parse_nodes_json, ContentNode, RefId};
