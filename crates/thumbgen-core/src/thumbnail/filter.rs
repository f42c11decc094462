//! Command-line filename filter.

/// True when `filename` should be generated: an empty filter matches everything,
/// otherwise the filter must be a (case-sensitive) substring of the filename.
pub fn matches_filter(filter: &str, filename: &str) -> bool {
    filter.is_empty() || filename.contains(filter)
}
