// src/walk/mod.rs
// =============================================================================
// Repository tree walking.
//
// Submodules:
// - listing: what one folder contains (parsing + the TreeSource seam)
// - dfs: the depth-first walk with folder/file budgets
// =============================================================================

mod dfs;
mod listing;

pub use dfs::{Counters, Walk, WalkLimits, Walker};
pub use listing::{has_markdown_link, SiteTree};
