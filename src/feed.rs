//! Support for creating an Atom feed from the published article items.

use crate::config::Author;
use crate::content::Item;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,
    pub home_page: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Item`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`]. Items are expected
/// newest-first; entries are emitted in that order.
pub fn write_feed<W: Write>(config: FeedConfig, items: &[Item], w: W) -> Result<()> {
    feed(config, items)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, items: &[Item]) -> Result<Feed> {
    use std::collections::BTreeMap;
    Ok(Feed {
        entries: feed_entries(&config, items)?,
        title: config.title.into(),
        id: config.id,
        updated: FixedOffset::east(0).from_utc_datetime(&Utc::now().naive_utc()),
        authors: author_to_people(config.author),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        base: None,
        lang: None,
        extensions: BTreeMap::new(),
        namespaces: BTreeMap::new(),
        links: vec![Link {
            href: config.home_page.to_string(),
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    })
}

fn feed_entries(config: &FeedConfig, items: &[Item]) -> Result<Vec<Entry>> {
    use std::collections::BTreeMap;
    let mut entries: Vec<Entry> = Vec::with_capacity(items.len());

    for item in items {
        let url = config.home_page.join(&item.slug)?;

        // Items carry calendar dates; the feed format wants instants. Pin
        // everything to midnight UTC so the feed is deterministic.
        let published = midnight_utc(item.date);
        let updated = midnight_utc(item.updated.unwrap_or(item.date));

        entries.push(Entry {
            id: url.to_string(),
            title: item.title.clone().into(),
            updated,
            authors: author_to_people(config.author.clone()),
            links: vec![Link {
                href: url.to_string(),
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: match item.description.is_empty() {
                true => None,
                false => Some(item.description.clone().into()),
            },
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(published),
            source: None,
            content: None,
            extensions: BTreeMap::new(),
        })
    }
    Ok(entries)
}

fn midnight_utc(date: chrono::NaiveDate) -> chrono::DateTime<FixedOffset> {
    let naive_date_time = NaiveDateTime::new(date, NaiveTime::from_hms(0, 0, 0));
    FixedOffset::east(0).from_utc_datetime(&naive_date_time)
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// URL-joining issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when an item's slug can't be joined onto the home page URL.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::TemplateKind;
    use chrono::NaiveDate;

    fn item(slug: &str, date: NaiveDate, updated: Option<NaiveDate>) -> Item {
        Item {
            slug: slug.to_owned(),
            title: format!("Title for {}", slug),
            description: String::from("A short description."),
            date,
            updated,
            category: None,
            tags: Vec::new(),
            kind: TemplateKind::Article,
            published: true,
            body: String::new(),
        }
    }

    fn fixture_config() -> FeedConfig {
        FeedConfig {
            title: String::from("Example Site"),
            id: String::from("https://example.org/"),
            author: Some(Author {
                name: String::from("Jane Doe"),
                email: None,
            }),
            home_page: Url::parse("https://example.org/").unwrap(),
        }
    }

    #[test]
    fn test_entries_keep_item_order_and_urls() -> Result<()> {
        let items = vec![
            item("/articles/newer/", NaiveDate::from_ymd(2021, 4, 16), None),
            item("/articles/older/", NaiveDate::from_ymd(2021, 1, 2), None),
        ];

        let feed = feed(fixture_config(), &items)?;
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].id, "https://example.org/articles/newer/");
        assert_eq!(feed.entries[1].id, "https://example.org/articles/older/");
        Ok(())
    }

    #[test]
    fn test_updated_falls_back_to_published() -> Result<()> {
        let edited = NaiveDate::from_ymd(2021, 3, 4);
        let items = vec![
            item(
                "/articles/edited/",
                NaiveDate::from_ymd(2021, 1, 2),
                Some(edited),
            ),
            item("/articles/untouched/", NaiveDate::from_ymd(2021, 1, 2), None),
        ];

        let feed = feed(fixture_config(), &items)?;
        assert_eq!(feed.entries[0].updated, midnight_utc(edited));
        assert_eq!(
            feed.entries[1].updated,
            midnight_utc(NaiveDate::from_ymd(2021, 1, 2))
        );
        Ok(())
    }
}
