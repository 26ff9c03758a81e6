//! The library code for the `stele` static site generator. The architecture
//! can be generally broken down into three distinct steps:
//!
//! 1. Parsing content items from source files on disk ([`crate::parser`])
//! 2. Deriving collections and routes from the parsed items ([`crate::index`],
//!    [`crate::plan`])
//! 3. Rendering the planned routes to output files on disk ([`crate::write`])
//!
//! Of the three, the second step carries the interesting logic. Items are
//! grouped into route families (articles, wiki, books, courses), and each
//! family's items are folded into an [`crate::index::Index`] holding the
//! deduplicated category and tag collections. The planner then expands the
//! index into the full route manifest: one page for the whole family, one
//! page per category, one page per tag, and one page per item. Item pages
//! additionally pull a ranked list of similar items ([`crate::similar`]).
//!
//! The third step is pretty straight-forward: for each route, apply the
//! template (either the item template or the listing template) and write the
//! result to disk. The [`crate::build`] module stitches the steps together
//! and also emits the Atom feed ([`crate::feed`]) and copies static assets.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod content;
pub mod date;
pub mod feed;
pub mod index;
pub mod parser;
pub mod plan;
pub mod similar;
pub mod text;
pub mod write;
