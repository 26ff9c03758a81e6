//! Expands an [`Index`] into the full set of generated routes for one route
//! family: a listing page for the whole family, a listing page per category,
//! a listing page per tag, and a page per item. The planner is pure; turning
//! the manifest into files on disk is [`crate::write`]'s job.
//!
//! Category and tag names are slugified into their URL path segment with the
//! same transformation the rest of the site uses, so the `filter_key` stored
//! on a route always reconstructs exactly the item subset that justified the
//! route's existence. Two distinct names that collide on one slugified path
//! would silently merge two pages, so the planner rejects that outright.

use crate::content::{Family, Item};
use crate::index::Index;
use std::collections::HashMap;
use std::fmt;

/// The kind of generated page a [`Route`] stands for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// The family's main listing of every published item.
    AllItems,

    /// A listing of the items in one category.
    ByCategory,

    /// A listing of the items carrying one tag.
    ByTag,

    /// A single item's own page.
    SingleItem,
}

/// One entry of the route manifest: a URL path, the kind of page behind it,
/// and (for category and tag listings) the value the page filters on.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub path: String,
    pub kind: Kind,
    pub filter_key: Option<String>,
}

/// Expands `index` into the route manifest for `family`. Emits exactly one
/// [`Kind::AllItems`] route, one [`Kind::ByCategory`] route per distinct
/// category, one [`Kind::ByTag`] route per distinct tag, and one
/// [`Kind::SingleItem`] route per item, in that order.
pub fn plan(index: &Index, family: Family) -> Result<Vec<Route>> {
    let namespace = family.namespace();
    let mut routes =
        Vec::with_capacity(1 + index.categories.len() + index.tags.len() + index.items.len());

    routes.push(Route {
        path: format!("/{}/", namespace),
        kind: Kind::AllItems,
        filter_key: None,
    });

    // One map across both groupings; the `categories/` and `tags/` path
    // segments already keep them from ever sharing a path.
    let mut claimed: HashMap<String, String> = HashMap::new();

    for category in &index.categories {
        let path = format!("/{}/categories/{}/", namespace, slug::slugify(category));
        claim(&mut claimed, &path, category)?;
        routes.push(Route {
            path,
            kind: Kind::ByCategory,
            filter_key: Some(category.clone()),
        });
    }

    for tag in &index.tags {
        let path = format!("/{}/tags/{}/", namespace, slug::slugify(tag));
        claim(&mut claimed, &path, tag)?;
        routes.push(Route {
            path,
            kind: Kind::ByTag,
            filter_key: Some(tag.clone()),
        });
    }

    for item in &index.items {
        routes.push(Route {
            path: item.slug.clone(),
            kind: Kind::SingleItem,
            filter_key: None,
        });
    }

    Ok(routes)
}

fn claim(claimed: &mut HashMap<String, String>, path: &str, name: &str) -> Result<()> {
    match claimed.insert(path.to_owned(), name.to_owned()) {
        None => Ok(()),
        Some(first) => Err(Error::PathCollision {
            path: path.to_owned(),
            first,
            second: name.to_owned(),
        }),
    }
}

/// Returns the subset of `index`'s items that belong on `route`'s page, in
/// the index's item order. Listings filter by exact, case-sensitive match on
/// the route's `filter_key`; a [`Kind::SingleItem`] route selects the item
/// whose slug is the route path.
pub fn filter<'a>(index: &'a Index, route: &Route) -> Vec<&'a Item> {
    match route.kind {
        Kind::AllItems => index.items.iter().collect(),
        Kind::ByCategory => match &route.filter_key {
            Some(key) => index
                .items
                .iter()
                .filter(|item| item.category.as_ref() == Some(key))
                .collect(),
            None => Vec::new(),
        },
        Kind::ByTag => match &route.filter_key {
            Some(key) => index
                .items
                .iter()
                .filter(|item| item.has_tag(key))
                .collect(),
            None => Vec::new(),
        },
        Kind::SingleItem => index
            .items
            .iter()
            .filter(|item| item.slug == route.path)
            .collect(),
    }
}

/// The heading text for a listing page showing `count` items.
pub fn heading(route: &Route, count: usize) -> String {
    match (route.kind, &route.filter_key) {
        (Kind::ByCategory, Some(key)) | (Kind::ByTag, Some(key)) => {
            if count == 1 {
                format!("Showing 1 item about \"{}\"", key)
            } else {
                format!("Showing {} item(s) about \"{}\"", count, key)
            }
        }
        _ => String::from("All items"),
    }
}

/// The result of a route-planning operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a route-planning failure.
#[derive(Debug)]
pub enum Error {
    /// Returned when two distinct category or tag names slugify to the same
    /// generated path.
    PathCollision {
        path: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::PathCollision {
                path,
                first,
                second,
            } => write!(
                f,
                "'{}' and '{}' both map to the generated path '{}'",
                first, second, path
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::TemplateKind;
    use chrono::NaiveDate;

    fn item(slug: &str, category: Option<&str>, tags: &[&str], published: bool) -> Item {
        Item {
            slug: slug.to_owned(),
            title: format!("Title for {}", slug),
            description: String::new(),
            date: NaiveDate::from_ymd(2021, 4, 16),
            updated: None,
            category: category.map(str::to_owned),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            kind: TemplateKind::Article,
            published,
            body: String::new(),
        }
    }

    fn fixture_index() -> Index {
        Index::build(vec![
            item(
                "/articles/a/",
                Some("Domain-Driven Design"),
                &["design", "ddd"],
                true,
            ),
            item("/articles/b/", Some("Web"), &["design"], true),
            item("/articles/c/", Some("Web"), &[], true),
            item("/articles/d/", None, &["C++ Tips!!"], true),
            item("/articles/e/", None, &[], true),
            item("/articles/f/", Some("Drafts"), &["wip"], false),
            item("/articles/g/", Some("Drafts"), &["wip"], false),
        ])
        .unwrap()
    }

    #[test]
    fn test_plan_emits_one_route_per_listing_and_item() -> Result<()> {
        let index = fixture_index();
        let routes = plan(&index, Family::Articles)?;

        let count = |kind: Kind| routes.iter().filter(|r| r.kind == kind).count();
        assert_eq!(count(Kind::AllItems), 1);
        assert_eq!(count(Kind::ByCategory), 2); // Domain-Driven Design, Web
        assert_eq!(count(Kind::ByTag), 3); // C++ Tips!!, ddd, design
        assert_eq!(count(Kind::SingleItem), 5);
        Ok(())
    }

    #[test]
    fn test_plan_slugifies_paths() -> Result<()> {
        let index = fixture_index();
        let routes = plan(&index, Family::Articles)?;
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();

        assert!(paths.contains(&"/articles/"));
        assert!(paths.contains(&"/articles/categories/domain-driven-design/"));
        assert!(paths.contains(&"/articles/tags/c-tips/"));
        assert!(paths.contains(&"/articles/a/"));
        Ok(())
    }

    #[test]
    fn test_colliding_names_are_rejected() {
        let index = Index::build(vec![
            item("/articles/a/", None, &["C++"], true),
            item("/articles/b/", None, &["C#"], true),
        ])
        .unwrap();

        match plan(&index, Family::Articles) {
            Err(Error::PathCollision { path, .. }) => {
                assert_eq!(path, "/articles/tags/c/");
            }
            other => panic!("expected a path collision, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_by_category_matches_exactly() -> Result<()> {
        let index = fixture_index();
        let routes = plan(&index, Family::Articles)?;
        let route = routes
            .iter()
            .find(|r| r.kind == Kind::ByCategory && r.filter_key.as_deref() == Some("Web"))
            .unwrap();

        let items = filter(&index, route);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.category.as_deref() == Some("Web")));
        Ok(())
    }

    #[test]
    fn test_filter_by_tag_matches_membership() -> Result<()> {
        let index = fixture_index();
        let routes = plan(&index, Family::Articles)?;
        let route = routes
            .iter()
            .find(|r| r.kind == Kind::ByTag && r.filter_key.as_deref() == Some("design"))
            .unwrap();

        let items = filter(&index, route);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.has_tag("design")));
        Ok(())
    }

    #[test]
    fn test_filter_single_item_selects_by_slug() -> Result<()> {
        let index = fixture_index();
        let route = Route {
            path: String::from("/articles/c/"),
            kind: Kind::SingleItem,
            filter_key: None,
        };
        let items = filter(&index, &route);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "/articles/c/");
        Ok(())
    }

    #[test]
    fn test_heading_count_matches_filter_and_pluralizes() -> Result<()> {
        let index = fixture_index();
        let routes = plan(&index, Family::Articles)?;

        for route in &routes {
            let count = filter(&index, route).len();
            match (route.kind, count) {
                (Kind::AllItems, _) => {
                    assert_eq!(heading(route, count), "All items");
                }
                (Kind::ByTag, 1) | (Kind::ByCategory, 1) => {
                    assert_eq!(
                        heading(route, count),
                        format!(
                            "Showing 1 item about \"{}\"",
                            route.filter_key.as_deref().unwrap()
                        )
                    );
                }
                (Kind::ByTag, n) | (Kind::ByCategory, n) => {
                    assert_eq!(
                        heading(route, count),
                        format!(
                            "Showing {} item(s) about \"{}\"",
                            n,
                            route.filter_key.as_deref().unwrap()
                        )
                    );
                }
                (Kind::SingleItem, _) => {}
            }
        }
        Ok(())
    }
}
