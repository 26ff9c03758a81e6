//! Builds the derived [`Index`] over one route family's content items. The
//! index is a read-only aggregate: the published items plus the deduplicated,
//! sorted category and tag collections, all derivable purely from the item
//! list. It is rebuilt once per site build and passed by reference to the
//! planner and the similarity ranker, never updated in place.

use crate::content::Item;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// The derived, read-only aggregate over a family's [`Item`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
    /// The published items, in the order they were provided (the parser
    /// sorts newest-first).
    pub items: Vec<Item>,

    /// Every distinct non-empty category among the published items,
    /// case-sensitive, sorted ascending.
    pub categories: Vec<String>,

    /// The union of every published item's tags, empty entries dropped,
    /// deduplicated and sorted ascending.
    pub tags: Vec<String>,
}

impl Index {
    /// Builds an [`Index`] from a family's items. Unpublished items are
    /// dropped; categories and tags are deduplicated and sorted. The same
    /// input always yields the same index regardless of input order of the
    /// category and tag values.
    ///
    /// A missing slug or a slug shared by two items is a data-integrity
    /// problem in the content source, so it fails the build rather than
    /// producing a site with colliding pages. The check runs over the whole
    /// input, unpublished items included.
    pub fn build(items: Vec<Item>) -> Result<Index> {
        let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
        for item in &items {
            if item.slug.is_empty() {
                return Err(Error::EmptySlug {
                    title: item.title.clone(),
                });
            }
            if !seen.insert(item.slug.clone()) {
                return Err(Error::DuplicateSlug {
                    slug: item.slug.clone(),
                });
            }
        }

        let items: Vec<Item> = items.into_iter().filter(|item| item.published).collect();

        let categories: BTreeSet<String> = items
            .iter()
            .filter_map(|item| item.category.clone())
            .filter(|category| !category.is_empty())
            .collect();

        let tags: BTreeSet<String> = items
            .iter()
            .flat_map(|item| item.tags.iter())
            .filter(|tag| !tag.is_empty())
            .cloned()
            .collect();

        Ok(Index {
            items,
            categories: categories.into_iter().collect(),
            tags: tags.into_iter().collect(),
        })
    }
}

/// The result of building an [`Index`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a data-integrity problem in the content source. These are
/// build-time failures, not runtime conditions.
#[derive(Debug)]
pub enum Error {
    /// Returned when an item has no slug at all.
    EmptySlug { title: String },

    /// Returned when two items in the same route family share a slug.
    DuplicateSlug { slug: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptySlug { title } => {
                write!(f, "item '{}' has an empty slug", title)
            }
            Error::DuplicateSlug { slug } => {
                write!(f, "duplicate slug '{}' within one route family", slug)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
