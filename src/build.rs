//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output site: parsing the content items
//! ([`crate::parser`]), grouping them into route families and indexing each
//! family ([`crate::index`]), rendering every planned route
//! ([`crate::write`]), copying the static source directory into the output,
//! and generating the Atom feed ([`crate::feed`]).

use crate::config::Config;
use crate::content::{Family, Item};
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::index::{Error as IndexError, Index};
use crate::parser::{Error as ParseError, Parser};
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Builds the site from a [`Config`] object into `output_directory`. This
/// calls into [`Parser::parse_items`], [`Index::build`], and
/// [`Writer::write_family`] which do the heavy-lifting. This function also
/// copies the static assets and writes the feed.
pub fn build_site(config: &Config, output_directory: &Path) -> Result<()> {
    let parser = Parser::new(&config.content_directory);
    let items = parser.parse_items()?;

    // Parse the template files.
    let listing_template = parse_template(config.listing_template.iter())?;
    let item_template = parse_template(config.item_template.iter())?;

    // Blow away the old family output directories so stale pages from a
    // previous build can't survive a rename. The root output directory
    // itself is left alone in case the user passed the wrong path.
    for family in &Family::ALL {
        rmdir(&output_directory.join(family.namespace()))?;
    }
    let static_output_directory = output_directory.join("static");
    rmdir(&static_output_directory)?;

    let writer = Writer {
        listing_template: &listing_template,
        item_template: &item_template,
        site_root: &config.site_root,
        output_directory,
        similar_limit: config.similar_limit,
        excerpt_length: config.excerpt_length,
    };

    // Index and write each family's pages. The articles index is kept
    // around for the feed.
    let mut articles: Option<Index> = None;
    for family in &Family::ALL {
        let family_items: Vec<Item> = items
            .iter()
            .filter(|item| item.kind.family() == *family)
            .cloned()
            .collect();
        let index = Index::build(family_items)?;
        writer.write_family(&index, *family)?;
        if *family == Family::Articles {
            articles = Some(index);
        }
    }

    // copy static directory
    if config.static_directory.is_dir() {
        copy_dir(&config.static_directory, &static_output_directory)?;
    }

    // create the atom feed
    if let Some(articles) = articles {
        write_feed(
            FeedConfig {
                title: config.title.clone(),
                id: config.site_root.to_string(),
                author: config.author.clone(),
                home_page: config.site_root.clone(),
            },
            &articles.items,
            File::create(output_directory.join("feed.atom"))?,
        )?;
    }

    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &dst.join(entry.file_name()))?;
        } else {
            std::fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }

    Ok(())
}

// Loads the template file contents, appends them to one another, and parses
// the result into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

/// The result of a site build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing,
/// indexing, writing, cleaning output directories, parsing template files,
/// creating the feed, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for data-integrity errors while indexing a family.
    Index(IndexError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Index(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
