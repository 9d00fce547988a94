//! Relevance and ranking helpers layered on top of TF-IDF scores.

/// Name match bonus.
///
/// - 100: exact match
/// - 50: name starts with the query
/// - 10: name contains the query
/// - None: no match
///
/// Both sides are compared case-insensitively.
pub fn calculate_relevance(name: &str, query: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        None
    } else if name == query {
        Some(100)
    } else if name.starts_with(&query) {
        Some(50)
    } else if name.contains(&query) {
        Some(10)
    } else {
        None
    }
}

/// Canonicality of a `::`-separated path; shorter, public-looking paths score higher.
///
/// - Base score: 100
/// - Penalty: -8 per segment beyond the first
/// - Penalty: -40 per module or item segment carrying an internal marker
///   (`__private`, `internal`, ...)
///
/// The leading segment names the crate and never counts as internal.
pub fn path_canonicality_score(path: &str) -> i32 {
    const INTERNAL_MARKERS: [&str; 5] = ["_private", "_internal", "internal", "private", "__"];

    let segments: Vec<&str> = path.split("::").collect();
    let depth = i32::try_from(segments.len()).unwrap_or(i32::MAX / 8);
    let mut score = 100 - (depth - 1) * 8;

    for segment in segments.iter().skip(1) {
        if INTERNAL_MARKERS.iter().any(|marker| segment.contains(marker)) {
            score -= 40;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("KindConfig", "kindconfig", Some(100))]
    #[case("KindConfig", "Kind", Some(50))]
    #[case("get_venv_info", "venv", Some(10))]
    #[case("start", "stop", None)]
    #[case("start", "  ", None)]
    fn relevance(#[case] name: &str, #[case] query: &str, #[case] expected: Option<u32>) {
        check!(calculate_relevance(name, query) == expected);
    }

    #[test]
    fn shorter_paths_rank_higher() {
        let short = path_canonicality_score("valis_core::modules::core::run");
        let long = path_canonicality_score("valis_core::modules::projects::venv::status");
        check!(short > long);
    }

    #[test]
    fn internal_segments_are_penalised() {
        check!(path_canonicality_score("a::__private::B") == 100 - 16 - 40);
        check!(path_canonicality_score("a::b::C") == 100 - 16);
        check!(path_canonicality_score("a::internal::C") == 100 - 16 - 40);
    }

    #[rstest]
    #[case("valis_core::modules::log::ack", "valis::modules::log::ack")]
    #[case("app_core::run", "app::run")]
    #[case("private_api::run", "public_api::run")]
    fn crate_names_are_not_penalised(#[case] marked: &str, #[case] plain: &str) {
        check!(path_canonicality_score(marked) == path_canonicality_score(plain));
    }
}
