// src/walk/dfs.rs
// =============================================================================
// Depth-first walk of a repository's folder tree under two budgets.
//
// How it works:
// 1. Entering a folder bumps `folders`. Over the folder budget? Give up on
//    the spot (no listing fetched, no correction applied).
// 2. List the folder and go through its rows in order:
//    - README.md (any case): keep its raw link. Never counted.
//    - source file (.py .java .c .cpp .h): keep its raw link, bump `files`.
//      Over the file budget? Stop this folder and report the budget exceeded.
//    - sub-folder: skip env/venv and .github, otherwise recurse with the
//      current counters. A child that exceeded a budget ends this folder too.
// 3. Leaving a folder whose subtree added no source files un-counts it, so
//    the folder budget only counts folders that mattered.
//
// The counters are a plain value threaded through every call and handed
// back with the result; there is no shared state to reset between walks.
//
// Rust concepts:
// - BoxFuture: async fns can't call themselves directly, the recursive
//   future has to be boxed so its size is known
// - Tagged results: Walk::BudgetExceeded instead of a nullable list
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use super::listing::{NodeKind, TreeNode, TreeSource};
use crate::error::ScrapeError;
use crate::github::raw_href;

/// Recognized source-code file suffixes (matched case-sensitively).
const SOURCE_EXTENSIONS: &[&str] = &[".py", ".java", ".c", ".cpp", ".h"];

const README: &str = "readme.md";

/// Folders never descended into.
const VIRTUALENV_SUFFIXES: &[&str] = &["/env", "/venv"];
const CONFIG_FOLDER: &str = ".github";

/// Budgets for one repository walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Max folders counted (entered folders minus those that added no files)
    pub folders: usize,
    /// Max qualifying source files
    pub files: usize,
}

/// Progress of a walk: folders counted and source files found so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub folders: usize,
    pub files: usize,
}

/// What a walk produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Walk {
    /// Raw-content hrefs of every README and source file, in walk order
    Complete(Vec<String>),
    /// A budget ran out; the repository should be dropped
    BudgetExceeded,
}

pub struct Walker<'s, S> {
    source: &'s S,
    limits: WalkLimits,
}

impl<'s, S> Walker<'s, S>
where
    S: TreeSource + Sync,
{
    pub fn new(source: &'s S, limits: WalkLimits) -> Self {
        Self { source, limits }
    }

    /// Walks the tree under `root` (a repository href) from zeroed counters.
    pub async fn walk(&self, root: &str) -> Result<(Walk, Counters), ScrapeError> {
        self.walk_folder(root, Counters::default()).await
    }

    /// Walks one folder, continuing from `counters`.
    pub fn walk_folder<'a>(
        &'a self,
        path: &'a str,
        counters: Counters,
    ) -> BoxFuture<'a, Result<(Walk, Counters), ScrapeError>> {
        async move {
            let mut counters = counters;
            let files_before = counters.files;

            counters.folders += 1;
            if counters.folders > self.limits.folders {
                debug!("Folder budget exceeded at {}", path);
                return Ok((Walk::BudgetExceeded, counters));
            }

            let entries = self.source.list(path).await?;
            debug!("{}: {} entries", path, entries.len());

            let mut links = Vec::new();
            let mut exceeded = false;

            for node in &entries {
                match node.kind {
                    NodeKind::Blob => {
                        if is_readme(&node.title) {
                            links.push(raw_href(&node.path));
                        } else if is_source_file(&node.title) {
                            links.push(raw_href(&node.path));
                            counters.files += 1;
                        }
                        if counters.files > self.limits.files {
                            debug!("File budget exceeded at {}", node.path);
                            exceeded = true;
                            break;
                        }
                    }
                    NodeKind::Tree => {
                        if is_skipped_folder(node) {
                            continue;
                        }
                        let (walk, after) = self.walk_folder(&node.path, counters).await?;
                        counters = after;
                        match walk {
                            Walk::Complete(found) => links.extend(found),
                            Walk::BudgetExceeded => {
                                exceeded = true;
                                break;
                            }
                        }
                    }
                }
            }

            if counters.files == files_before {
                counters.folders -= 1;
            }

            let walk = if exceeded {
                Walk::BudgetExceeded
            } else {
                Walk::Complete(links)
            };
            Ok((walk, counters))
        }
        .boxed()
    }
}

fn is_readme(title: &str) -> bool {
    title.to_lowercase() == README
}

fn is_source_file(title: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| title.ends_with(ext))
}

fn is_skipped_folder(node: &TreeNode) -> bool {
    VIRTUALENV_SUFFIXES.iter().any(|suffix| node.path.ends_with(suffix)) || node.title == CONFIG_FOLDER
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return the counters instead of using &mut Counters?
//    - Counters is Copy, so passing it in and getting it back is free
//    - Every call's effect on the totals is visible in its return value,
//      which is what the tests below check
//
// 2. What is `async move { ... }.boxed()`?
//    - The async block becomes a future that owns what it captured
//    - .boxed() (from FutureExt) puts it on the heap as Pin<Box<dyn Future>>
//    - The recursive call then has a fixed-size type to await
//
// 3. Why `S: TreeSource + Sync`?
//    - BoxFuture must be Send, and it holds &S across .await points
//    - &S is Send only when S is Sync
// -----------------------------------------------------------------------------
