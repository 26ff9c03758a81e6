//! Loads the project configuration. A project is a directory holding a
//! `stele.yaml` file, a `content/` tree of markdown sources, a `theme/`
//! directory with the template fragments, and a `static/` directory copied
//! verbatim into the output.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "stele.yaml";

#[derive(Deserialize)]
struct SimilarLimit(usize);
impl Default for SimilarLimit {
    fn default() -> Self {
        SimilarLimit(4)
    }
}

#[derive(Deserialize)]
struct ExcerptLength(usize);
impl Default for ExcerptLength {
    fn default() -> Self {
        ExcerptLength(160)
    }
}

/// The site author, used for feed attribution.
#[derive(Clone, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    site_root: Url,
    title: String,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default)]
    similar_limit: SimilarLimit,

    #[serde(default)]
    excerpt_length: ExcerptLength,
}

#[derive(Deserialize)]
struct Theme {
    listing_template: Vec<PathBuf>,
    item_template: Vec<PathBuf>,
}

/// The fully-resolved project configuration.
pub struct Config {
    pub site_root: Url,
    pub title: String,
    pub author: Option<Author>,
    pub similar_limit: usize,
    pub excerpt_length: usize,
    pub content_directory: PathBuf,
    pub static_directory: PathBuf,
    pub listing_template: Vec<PathBuf>,
    pub item_template: Vec<PathBuf>,
}

impl Config {
    /// Finds `stele.yaml` in `dir` or the nearest parent directory and loads
    /// the configuration from it.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(Error::ProjectFileNotFound),
            }
        }
    }

    /// Loads the configuration from a specific project file. Theme template
    /// fragments are resolved relative to `theme/` next to the project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(Error::NoProjectRoot(path.to_owned())),
            Some(project_root) => {
                let theme_dir = project_root.join("theme");
                let theme_file = open(&theme_dir.join("theme.yaml"), "theme")?;
                let theme: Theme = serde_yaml::from_reader(theme_file)?;
                Ok(Config {
                    site_root: project.site_root,
                    title: project.title,
                    author: project.author,
                    similar_limit: project.similar_limit.0,
                    excerpt_length: project.excerpt_length.0,
                    content_directory: project_root.join("content"),
                    static_directory: project_root.join("static"),
                    listing_template: theme
                        .listing_template
                        .iter()
                        .map(|relpath| theme_dir.join(relpath))
                        .collect(),
                    item_template: theme
                        .item_template
                        .iter()
                        .map(|relpath| theme_dir.join(relpath))
                        .collect(),
                })
            }
        }
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).map_err(|err| Error::Open {
        kind: kind.to_owned(),
        path: path.to_owned(),
        err,
    })
}

/// The result of a configuration-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `stele.yaml` exists in the given directory or any
    /// parent directory.
    ProjectFileNotFound,

    /// Returned when the project file path has no parent directory.
    NoProjectRoot(PathBuf),

    /// Returned for I/O problems opening a project or theme file.
    Open {
        kind: String,
        path: PathBuf,
        err: std::io::Error,
    },

    /// Returned when a project or theme file isn't valid YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectFileNotFound => {
                write!(
                    f,
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )
            }
            Error::NoProjectRoot(path) => {
                write!(
                    f,
                    "Can't get parent directory for provided project file path '{:?}'",
                    path
                )
            }
            Error::Open { kind, path, err } => {
                write!(f, "Opening {} file `{}`: {}", kind, path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectFileNotFound => None,
            Error::NoProjectRoot(_) => None,
            Error::Open { err, .. } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
