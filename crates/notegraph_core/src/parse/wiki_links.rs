//! Wiki-style `[[Title]]` reference extraction.
//!
//! # Responsibility
//! - Produce the ordered sequence of reference titles found in a content
//!   body.
//!
//! # Invariants
//! - Pure function of the input string; no side effects.
//! - Titles are returned verbatim: no trimming, no case folding.
//! - One item per occurrence; repeated titles appear repeatedly.

use once_cell::sync::Lazy;
use regex::Regex;

// Non-greedy body, so `[[A]][[B]]` yields two matches instead of one
// spanning both. `.` does not cross newlines; a reference is a single-line
// construct.
static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("valid wiki link regex"));

/// Iterates over `[[...]]` reference titles in order of appearance.
///
/// The iterator is lazy and restartable: call again with the same content to
/// walk the sequence from the start. Unmatched single brackets produce no
/// match; `[[]]` yields an empty-string title, which is accepted rather than
/// special-cased.
pub fn iter_wiki_links(content: &str) -> impl Iterator<Item = &str> {
    WIKI_LINK_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::iter_wiki_links;

    fn collect(content: &str) -> Vec<&str> {
        iter_wiki_links(content).collect()
    }

    #[test]
    fn extracts_titles_in_order_of_appearance() {
        assert_eq!(
            collect("see [[Alpha]] then [[Beta]] and [[Alpha]] again"),
            vec!["Alpha", "Beta", "Alpha"]
        );
    }

    #[test]
    fn titles_are_used_verbatim_without_normalization() {
        assert_eq!(collect("[[ Spaced Title ]]"), vec![" Spaced Title "]);
        assert_eq!(collect("[[MiXeD Case]]"), vec!["MiXeD Case"]);
    }

    #[test]
    fn adjacent_pairs_yield_separate_matches() {
        assert_eq!(collect("[[A]][[B]]"), vec!["A", "B"]);
    }

    #[test]
    fn unmatched_brackets_yield_nothing() {
        assert!(collect("[not a link]").is_empty());
        assert!(collect("[[dangling").is_empty());
        assert!(collect("closing]] only").is_empty());
    }

    #[test]
    fn empty_reference_yields_empty_title() {
        assert_eq!(collect("[[]]"), vec![""]);
    }

    #[test]
    fn nesting_is_not_supported() {
        // The inner open brackets become part of the non-greedy body.
        assert_eq!(collect("[[outer [[inner]]]]"), vec!["outer [[inner"]);
    }

    #[test]
    fn references_do_not_cross_newlines() {
        assert!(collect("[[split\ntitle]]").is_empty());
    }
}
