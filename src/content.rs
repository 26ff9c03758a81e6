//! Defines the [`Item`] type, the normalized shape of one publishable unit
//! of content (an article, a wiki entry, a book review, or a course), plus
//! the [`TemplateKind`] and [`Family`] enums that decide which route
//! namespace an item belongs to.

use chrono::NaiveDate;
use serde::Deserialize;

/// The template an item is rendered with. This is declared in the item's
/// frontmatter (`templateKey`) and determines the item's route [`Family`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Article,
    BlogPost,
    Wiki,
    Book,
    Course,
}

impl TemplateKind {
    /// Returns the route [`Family`] for this template kind. `Article` and
    /// `BlogPost` share the `articles` namespace; the older posts keep their
    /// `blog-post` template key but are listed and indexed with articles.
    pub fn family(self) -> Family {
        match self {
            TemplateKind::Article | TemplateKind::BlogPost => Family::Articles,
            TemplateKind::Wiki => Family::Wiki,
            TemplateKind::Book => Family::Books,
            TemplateKind::Course => Family::Courses,
        }
    }
}

/// A group of template kinds sharing one route namespace. Each family gets
/// its own listing, category, and tag pages, and item slugs must be unique
/// within a family.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Family {
    Articles,
    Wiki,
    Books,
    Courses,
}

impl Family {
    /// Every family, in the order the site builds them.
    pub const ALL: [Family; 4] = [
        Family::Articles,
        Family::Wiki,
        Family::Books,
        Family::Courses,
    ];

    /// The leading URL path segment for the family's generated pages.
    pub fn namespace(self) -> &'static str {
        match self {
            Family::Articles => "articles",
            Family::Wiki => "wiki",
            Family::Books => "books",
            Family::Courses => "courses",
        }
    }
}

/// One publishable content unit. Items are produced by the parser at build
/// time and never mutated afterwards; every derived collection is rebuilt
/// from scratch on each site build.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// The item's route path (e.g. `/articles/clean-architecture/`). Unique
    /// within the item's route family.
    pub slug: String,

    /// The item's display title.
    pub title: String,

    /// A short description used for listing cards and feed summaries. May be
    /// empty.
    pub description: String,

    /// The publish date. Treated as a calendar date, not an instant.
    pub date: NaiveDate,

    /// The date of the last substantial edit, if any. Wiki entries carry
    /// this; most other items don't.
    pub updated: Option<NaiveDate>,

    /// The item's category, if it has one. Items without a category are
    /// simply absent from the category groupings.
    pub category: Option<String>,

    /// The item's tags. Order is irrelevant for matching but preserved for
    /// display.
    pub tags: Vec<String>,

    /// The template the item is rendered with.
    pub kind: TemplateKind,

    /// Unpublished items are parsed but excluded from every derived
    /// collection.
    pub published: bool,

    /// The item's body, already rendered to HTML.
    pub body: String,
}

impl Item {
    /// Returns true if `tag` appears in the item's tag list (exact,
    /// case-sensitive match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
