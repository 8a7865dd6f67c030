//! Relevance Filter: literal, case-sensitive substring containment.

/// True iff `title` contains at least one of `substrings` verbatim.
/// An empty list accepts nothing. The matching policy is part of the
/// configuration contract: no word boundaries, no case folding, no fuzz.
pub fn is_relevant(title: &str, substrings: &[String]) -> bool {
    substrings.iter().any(|s| title.contains(s.as_str()))
}
