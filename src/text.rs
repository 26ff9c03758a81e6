//! Small text helpers for listing cards, summaries, and feed entries.

/// Truncates `text` to `max_length` characters and appends `...`. Text at or
/// under the limit is returned unchanged. Truncation counts characters, not
/// words, so a cut can land mid-word; generated pages have always looked
/// this way and existing snapshots depend on it.
pub fn ellipsize(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_owned()
    } else {
        let mut truncated: String = text.chars().take(max_length).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Uppercases the first character of `s`, leaving the rest alone.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Estimates reading time for a body of text at 200 words per minute,
/// rounded up, never less than a minute, rendered the way listing cards
/// display it (`"4 min read"`).
pub fn reading_time(body: &str) -> String {
    const WORDS_PER_MINUTE: usize = 200;
    let words = body.split_whitespace().count();
    let minutes = std::cmp::max(1, (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE);
    format!("{} min read", minutes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ellipsize_truncates_long_text() {
        assert_eq!(ellipsize("Hello World", 5), "Hello...");
    }

    #[test]
    fn test_ellipsize_leaves_short_text_alone() {
        assert_eq!(ellipsize("Hi", 5), "Hi");
        assert_eq!(ellipsize("Hello", 5), "Hello");
    }

    #[test]
    fn test_ellipsize_counts_characters_not_bytes() {
        assert_eq!(ellipsize("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("value object"), "Value object");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let two_hundred_and_one = vec!["word"; 201].join(" ");
        assert_eq!(reading_time(&two_hundred_and_one), "2 min read");
    }

    #[test]
    fn test_reading_time_is_at_least_a_minute() {
        assert_eq!(reading_time(""), "1 min read");
        assert_eq!(reading_time("just a few words"), "1 min read");
    }
}
