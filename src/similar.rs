//! Ranks the "similar content" shown on item pages. Given a target item and
//! the family's published items, every other item is scored by how much of
//! the target's category and tags it shares, and the best `limit` candidates
//! are returned. Zero-score candidates are ranked, not filtered out, so a
//! page always has something to show when the pool is small.

use crate::content::Item;
use std::collections::HashSet;
use std::fmt;

/// Sharing the target's category is worth more than sharing any one tag.
const CATEGORY_POINTS: u32 = 2;
const TAG_POINTS: u32 = 1;

/// One ranked candidate: a borrowed item and its score against the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Scored<'a> {
    pub item: &'a Item,
    pub score: u32,
}

/// Scores every candidate against `target` and returns the top `limit` of
/// them, best first. The target itself is excluded by slug equality. The
/// sort is stable, so candidates with equal scores keep their relative input
/// order; with a newest-first candidate list, ties resolve to the more
/// recent item.
///
/// A `limit` of zero indicates a configuration bug upstream and fails fast.
pub fn rank<'a>(target: &Item, candidates: &'a [Item], limit: usize) -> Result<Vec<Scored<'a>>> {
    if limit == 0 {
        return Err(Error::ZeroLimit);
    }

    let target_tags: HashSet<&str> = target.tags.iter().map(String::as_str).collect();

    let mut scored: Vec<Scored<'a>> = candidates
        .iter()
        .filter(|candidate| candidate.slug != target.slug)
        .map(|candidate| Scored {
            item: candidate,
            score: score(target, &target_tags, candidate),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    Ok(scored)
}

fn score(target: &Item, target_tags: &HashSet<&str>, candidate: &Item) -> u32 {
    let mut points = 0;

    if let (Some(a), Some(b)) = (&target.category, &candidate.category) {
        if a == b {
            points += CATEGORY_POINTS;
        }
    }

    // Each shared tag counts once, no matter how often it occurs.
    let candidate_tags: HashSet<&str> = candidate.tags.iter().map(String::as_str).collect();
    points += candidate_tags.intersection(target_tags).count() as u32 * TAG_POINTS;

    points
}

/// The result of a ranking operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an invalid argument to [`rank`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the similar-item limit is zero.
    ZeroLimit,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ZeroLimit => write!(f, "similar-item limit must be at least 1"),
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

    fn item(slug: &str, category: Option<&str>, tags: &[&str]) -> Item {
        Item {
            slug: slug.to_owned(),
            title: format!("Title for {}", slug),
            description: String::new(),
            date: NaiveDate::from_ymd(2021, 4, 16),
            updated: None,
            category: category.map(str::to_owned),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            kind: TemplateKind::Article,
            published: true,
            body: String::new(),
        }
    }

    #[test]
    fn test_scores_category_and_shared_tags() -> Result<()> {
        let target = item("/articles/target/", Some("A"), &["x", "y"]);
        let candidates = vec![
            item("/articles/b/", Some("A"), &["x"]),
            item("/articles/c/", Some("B"), &["x", "y"]),
            item("/articles/d/", Some("A"), &[]),
        ];

        let ranked = rank(&target, &candidates, 4)?;
        let summary: Vec<(&str, u32)> = ranked
            .iter()
            .map(|s| (s.item.slug.as_str(), s.score))
            .collect();

        // b scores 2+1, c and d tie at 2 and keep their input order.
        assert_eq!(
            summary,
            vec![("/articles/b/", 3), ("/articles/c/", 2), ("/articles/d/", 2)]
        );
        Ok(())
    }

    #[test]
    fn test_target_is_never_included() -> Result<()> {
        let target = item("/articles/target/", Some("A"), &["x"]);
        let candidates = vec![
            item("/articles/target/", Some("A"), &["x"]),
            item("/articles/b/", Some("A"), &["x"]),
        ];

        let ranked = rank(&target, &candidates, 4)?;
        assert!(ranked.iter().all(|s| s.item.slug != target.slug));
        Ok(())
    }

    #[test]
    fn test_output_is_truncated_to_limit() -> Result<()> {
        let target = item("/articles/target/", None, &[]);
        let candidates: Vec<Item> = (0..10)
            .map(|i| item(&format!("/articles/{}/", i), None, &[]))
            .collect();

        assert_eq!(rank(&target, &candidates, 3)?.len(), 3);
        assert_eq!(rank(&target, &candidates, 100)?.len(), 10);
        Ok(())
    }

    #[test]
    fn test_shared_tag_counts_once_despite_duplicates() -> Result<()> {
        let target = item("/articles/target/", None, &["x"]);
        let candidates = vec![item("/articles/b/", None, &["x", "x", "x"])];

        let ranked = rank(&target, &candidates, 1)?;
        assert_eq!(ranked[0].score, 1);
        Ok(())
    }

    #[test]
    fn test_blank_target_preserves_input_order() -> Result<()> {
        let target = item("/articles/target/", None, &[]);
        let candidates = vec![
            item("/articles/b/", Some("A"), &["x"]),
            item("/articles/c/", Some("B"), &["y"]),
            item("/articles/d/", None, &[]),
        ];

        let ranked = rank(&target, &candidates, 2)?;
        let slugs: Vec<&str> = ranked.iter().map(|s| s.item.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/articles/b/", "/articles/c/"]);
        assert!(ranked.iter().all(|s| s.score == 0));
        Ok(())
    }

    #[test]
    fn test_zero_limit_fails_fast() {
        let target = item("/articles/target/", None, &[]);
        assert!(matches!(rank(&target, &[], 0), Err(Error::ZeroLimit)));
    }
}
