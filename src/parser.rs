//! Parses [`Item`]s from the content directory. Each source file is a
//! markdown document with a `---`-fenced YAML frontmatter block; the
//! frontmatter carries the item's metadata and the body is rendered to HTML
//! here, so everything downstream of the parser works with display-ready
//! values. See [`Parser::parse_items`] for the file format.

use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser as MarkdownParser};
use serde::Deserialize;

use crate::content::{Item, TemplateKind};

const MARKDOWN_EXTENSION: &str = "md";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses [`Item`] objects from source files.
pub struct Parser<'a> {
    /// The root of the content tree. Slugs are derived from each source
    /// file's path relative to this directory.
    content_directory: &'a Path,
}

impl<'a> Parser<'a> {
    pub fn new(content_directory: &'a Path) -> Parser<'a> {
        Parser { content_directory }
    }

    /// Walks the content directory for item files (extension = `.md`) and
    /// returns the parsed [`Item`]s sorted by date (most recent first).
    /// Each source file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `templateKey`, `title`, `date`, and
    ///    optionally `description`, `updated`, `category`, `tags`, and
    ///    `published`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Markdown body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// templateKey: article
    /// title: Hello, world!
    /// date: 2021-04-16
    /// tags: [greet]
    /// published: true
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    ///
    /// A file named `index.md` takes its slug from its directory, so
    /// `articles/foo.md` and `articles/foo/index.md` both become
    /// `/articles/foo/`.
    pub fn parse_items(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        for result in walkdir::WalkDir::new(self.content_directory) {
            let entry = result?;
            if entry.file_type().is_file()
                && entry.path().extension() == Some(OsStr::new(MARKDOWN_EXTENSION))
            {
                items.push(self.parse_item(entry.path())?);
            }
        }

        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items)
    }

    fn parse_item(&self, path: &Path) -> Result<Item> {
        match self._parse_item(path) {
            Ok(item) => Ok(item),
            Err(e) => Err(Error::Annotated(
                format!("parsing item `{:?}`", path),
                Box::new(e),
            )),
        }
    }

    fn _parse_item(&self, path: &Path) -> Result<Item> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let input: &str = &contents;

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let mut item = Item {
            slug: self.slug_for(path)?,
            title: frontmatter.title,
            description: frontmatter.description,
            date: NaiveDate::parse_from_str(&frontmatter.date, DATE_FORMAT)?,
            updated: match &frontmatter.updated {
                Some(updated) => Some(NaiveDate::parse_from_str(updated, DATE_FORMAT)?),
                None => None,
            },
            category: frontmatter.category,
            tags: frontmatter.tags,
            kind: frontmatter.kind,
            published: frontmatter.published,
            body: String::new(),
        };

        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        html::push_html(
            &mut item.body,
            MarkdownParser::new_ext(&input[body_start..], options),
        );

        Ok(item)
    }

    /// Derives an item's slug from its source path: the path relative to the
    /// content root, extension dropped, wrapped in slashes. `index.md` files
    /// collapse into their parent directory.
    fn slug_for(&self, path: &Path) -> Result<String> {
        // strip_prefix shouldn't fail since the walk is rooted at
        // `content_directory`
        let relative = path.strip_prefix(self.content_directory).unwrap();

        let stem = if relative.ends_with("index.md") {
            match relative.parent() {
                Some(parent) => parent.to_owned(),
                None => return Err(InvalidSourcePathError(path.to_owned()).into()),
            }
        } else {
            relative.with_extension("")
        };

        match stem.to_str() {
            Some(s) if !s.is_empty() => Ok(format!("/{}/", s)),
            _ => Err(InvalidSourcePathError(path.to_owned()).into()),
        }
    }
}

fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    match input[FENCE.len()..].find("---") {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => Ok((
            FENCE.len(),                        // yaml_start
            FENCE.len() + offset,               // yaml_stop
            FENCE.len() + offset + FENCE.len(), // body_start
        )),
    }
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The template this item is rendered with.
    #[serde(rename = "templateKey")]
    pub kind: TemplateKind,

    /// The title of the item.
    pub title: String,

    /// A short description for listing cards. Optional.
    #[serde(default)]
    pub description: String,

    /// The publish date, `YYYY-MM-DD`.
    pub date: String,

    /// The date of the last substantial edit, `YYYY-MM-DD`. Optional.
    #[serde(default)]
    pub updated: Option<String>,

    /// The item's category. Optional.
    #[serde(default)]
    pub category: Option<String>,

    /// The tags associated with the item.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Items default to unpublished; they must opt in to showing up.
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug)]
pub struct InvalidSourcePathError(PathBuf);

impl fmt::Display for InvalidSourcePathError {
    /// Displays an [`InvalidSourcePathError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid source path: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidSourcePathError {
    /// Implements the [`std::error::Error`] trait for
    /// [`InvalidSourcePathError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of an [`Item`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing an [`Item`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a frontmatter date isn't `YYYY-MM-DD`.
    DateParse(chrono::ParseError),

    /// Returned for I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source path can't become a slug (not valid UTF-8, or
    /// an `index.md` at the content root).
    InvalidSourcePath(InvalidSourcePathError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Item must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::DateParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidSourcePath(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::DateParse(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidSourcePath(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidSourcePathError> for Error {
    fn from(err: InvalidSourcePathError) -> Error {
        Error::InvalidSourcePath(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts a [`chrono::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator when parsing frontmatter dates.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateParse(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
