//! Responsible for turning planned routes into templated HTML files on disk.
//! The [`Writer`] expands a family's [`Index`] through [`crate::plan`],
//! renders listing routes with the listing template and item routes with the
//! item template, and hands each item page its ranked similar items.

use crate::content::{Family, Item};
use crate::date;
use crate::index::Index;
use crate::plan::{self, Kind, Route};
use crate::similar;
use crate::text;
use gtmpl::{Template, Value};
use gtmpl_derive::Gtmpl;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Renders one route family's pages from its [`Index`].
pub struct Writer<'a> {
    /// The template for listing pages (the family page and the per-category
    /// and per-tag pages).
    pub listing_template: &'a Template,

    /// The template for individual item pages.
    pub item_template: &'a Template,

    /// The site's root URL. Route paths are joined onto this to produce the
    /// absolute URLs handed to templates.
    pub site_root: &'a Url,

    /// The directory in which the output HTML files will be written. A
    /// route's file lands at `{output_directory}/{route_path}/index.html`.
    pub output_directory: &'a Path,

    /// How many similar items an item page shows.
    pub similar_limit: usize,

    /// How many characters of an item's description a listing card shows
    /// before it is ellipsized.
    pub excerpt_length: usize,
}

/// The listing-card projection of an [`Item`]: the string fields every card
/// in a listing or similar-items strip displays. Tags are attached
/// separately since they carry their own URLs.
#[derive(Gtmpl)]
struct Card {
    title: String,
    url: String,
    date: String,
    description: String,
    reading_time: String,
}

impl Writer<'_> {
    /// Plans `family`'s routes from `index` and writes every page to disk.
    pub fn write_family(&self, index: &Index, family: Family) -> Result<()> {
        let routes = plan::plan(index, family)?;
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();

        for route in &routes {
            let file_path = self.file_path(&route.path);
            let dir = file_path.parent().unwrap(); // there should always be a dir
            if seen_dirs.insert(dir.to_owned()) {
                std::fs::create_dir_all(dir)?;
            }

            match route.kind {
                Kind::SingleItem => {
                    for item in plan::filter(index, route) {
                        self.write_item_page(index, item, &file_path)?;
                    }
                }
                _ => self.write_listing_page(index, route, &file_path)?,
            }
        }
        Ok(())
    }

    /// Renders one listing page: the heading plus a card per item.
    fn write_listing_page(&self, index: &Index, route: &Route, file_path: &Path) -> Result<()> {
        let items = plan::filter(index, route);
        let mut cards = Vec::with_capacity(items.len());
        for item in &items {
            cards.push(self.card(item)?);
        }

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "title".to_owned(),
            Value::String(plan::heading(route, items.len())),
        );
        m.insert("items".to_owned(), Value::Array(cards));
        self.render(self.listing_template, Value::Object(m), file_path)
    }

    /// Renders one item page, including its ranked similar items.
    fn write_item_page(&self, index: &Index, item: &Item, file_path: &Path) -> Result<()> {
        let similar = similar::rank(item, &index.items, self.similar_limit)?;
        let mut similar_cards = Vec::with_capacity(similar.len());
        for scored in &similar {
            similar_cards.push(self.card(scored.item)?);
        }

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(item.title.clone()));
        m.insert(
            "description".to_owned(),
            Value::String(item.description.clone()),
        );
        m.insert(
            "date".to_owned(),
            Value::String(date::format(item.date, date::Style::Full)),
        );
        m.insert(
            "updated".to_owned(),
            match item.updated {
                Some(updated) => Value::String(date::format(updated, date::Style::Full)),
                None => Value::Nil,
            },
        );
        m.insert(
            "reading_time".to_owned(),
            Value::String(text::reading_time(&item.body)),
        );
        m.insert("body".to_owned(), Value::String(item.body.clone()));
        m.insert("tags".to_owned(), self.tag_values(item)?);
        m.insert("similar".to_owned(), Value::Array(similar_cards));
        self.render(self.item_template, Value::Object(m), file_path)
    }

    /// Converts an [`Item`] into its listing-card [`Value`].
    fn card(&self, item: &Item) -> Result<Value> {
        let card = Card {
            title: item.title.clone(),
            url: self.page_url(&item.slug)?.to_string(),
            date: date::format(item.date, date::Style::Abbreviated),
            description: text::ellipsize(&item.description, self.excerpt_length),
            reading_time: text::reading_time(&item.body),
        };

        let mut value: Value = card.into();
        if let Value::Object(obj) = &mut value {
            obj.insert("tags".to_owned(), self.tag_values(item)?);
        }
        Ok(value)
    }

    /// Converts an item's tags into template values, each carrying the tag
    /// name and the URL of the tag's listing page within the item's family.
    fn tag_values(&self, item: &Item) -> Result<Value> {
        let namespace = item.kind.family().namespace();
        let mut values = Vec::with_capacity(item.tags.len());
        for tag in &item.tags {
            let path = format!("/{}/tags/{}/", namespace, slug::slugify(tag));
            let mut m: HashMap<String, Value> = HashMap::new();
            m.insert("tag".to_owned(), Value::String(tag.clone()));
            m.insert(
                "url".to_owned(),
                Value::String(self.page_url(&path)?.to_string()),
            );
            values.push(Value::Object(m));
        }
        Ok(Value::Array(values))
    }

    /// Takes a page's [`Value`], adds the site-wide keys, templates it, and
    /// writes it to disk.
    fn render(&self, template: &Template, mut value: Value, file_path: &Path) -> Result<()> {
        if let Value::Object(obj) = &mut value {
            obj.insert(
                "home_page".to_owned(),
                Value::String(self.site_root.to_string()),
            );
        }
        template.execute(
            &mut std::fs::File::create(file_path)?,
            &gtmpl::Context::from(value).unwrap(),
        )?;
        Ok(())
    }

    /// Maps a route path onto its output file:
    /// `/articles/tags/rust/` becomes
    /// `{output_directory}/articles/tags/rust/index.html`.
    fn file_path(&self, route_path: &str) -> PathBuf {
        let mut path = self.output_directory.to_owned();
        for segment in route_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push("index.html");
        path
    }

    fn page_url(&self, route_path: &str) -> Result<Url> {
        Ok(self.site_root.join(route_path)?)
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error planning the routes to write.
    Plan(plan::Error),

    /// An error ranking an item page's similar items.
    Rank(similar::Error),

    /// An error building page URLs.
    UrlParse(url::ParseError),

    /// An error writing the output files.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Plan(err) => err.fmt(f),
            Error::Rank(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Plan(err) => Some(err),
            Error::Rank(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<plan::Error> for Error {
    /// Converts [`plan::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator when planning routes.
    fn from(err: plan::Error) -> Error {
        Error::Plan(err)
    }
}

impl From<similar::Error> for Error {
    /// Converts [`similar::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator when ranking similar items.
    fn from(err: similar::Error) -> Error {
        Error::Rank(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when joining page URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::TemplateKind;
    use chrono::NaiveDate;

    fn fixture_writer<'a>(
        listing_template: &'a Template,
        item_template: &'a Template,
        site_root: &'a Url,
        output_directory: &'a Path,
    ) -> Writer<'a> {
        Writer {
            listing_template,
            item_template,
            site_root,
            output_directory,
            similar_limit: 4,
            excerpt_length: 160,
        }
    }

    fn fixture_item() -> Item {
        Item {
            slug: String::from("/articles/a/"),
            title: String::from("A"),
            description: String::from("About A."),
            date: NaiveDate::from_ymd(2021, 4, 16),
            updated: None,
            category: None,
            tags: vec![String::from("Domain-Driven Design")],
            kind: TemplateKind::Article,
            published: true,
            body: String::from("<p>Body.</p>"),
        }
    }

    #[test]
    fn test_file_path_nests_routes_under_index_html() {
        let listing = Template::default();
        let item = Template::default();
        let site_root = Url::parse("https://example.org/").unwrap();
        let out = Path::new("/tmp/out");
        let writer = fixture_writer(&listing, &item, &site_root, out);

        assert_eq!(
            writer.file_path("/articles/tags/rust/"),
            Path::new("/tmp/out/articles/tags/rust/index.html")
        );
        assert_eq!(
            writer.file_path("/articles/"),
            Path::new("/tmp/out/articles/index.html")
        );
    }

    #[test]
    fn test_card_carries_display_fields_and_tag_urls() -> Result<()> {
        let listing = Template::default();
        let item_template = Template::default();
        let site_root = Url::parse("https://example.org/").unwrap();
        let out = Path::new("/tmp/out");
        let writer = fixture_writer(&listing, &item_template, &site_root, out);

        match writer.card(&fixture_item())? {
            Value::Object(m) => {
                assert_eq!(m["title"], Value::String(String::from("A")));
                assert_eq!(
                    m["url"],
                    Value::String(String::from("https://example.org/articles/a/"))
                );
                assert_eq!(
                    m["date"],
                    Value::String(String::from("Apr 16th, 2021"))
                );
                match &m["tags"] {
                    Value::Array(tags) => match &tags[0] {
                        Value::Object(tag) => assert_eq!(
                            tag["url"],
                            Value::String(String::from(
                                "https://example.org/articles/tags/domain-driven-design/"
                            ))
                        ),
                        other => panic!("expected a tag object, got {:?}", other),
                    },
                    other => panic!("expected a tag array, got {:?}", other),
                }
            }
            other => panic!("expected an object, got {:?}", other),
        }
        Ok(())
    }
}
