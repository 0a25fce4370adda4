//! Drops listings the candidate cannot apply to: hard Dutch requirements,
//! car/licence requirements, executive titles, and postings written in Dutch.

use std::collections::HashSet;

use crate::profile::ExclusionConfig;

pub fn should_exclude(config: &ExclusionConfig, title: &str, description: &str) -> bool {
    let title_lower = title.to_lowercase();
    let desc_lower = description.to_lowercase();
    let combined = format!("{title_lower} {desc_lower}");

    if config.keywords.iter().any(|kw| combined.contains(kw.as_str())) {
        return true;
    }
    if config
        .title_keywords
        .iter()
        .any(|kw| title_lower.contains(kw.as_str()))
    {
        return true;
    }
    is_foreign_language(config, title, description)
}

/// Number of distinct language markers present in `text`.
///
/// Single words must match a whole token; phrases match as substrings.
fn count_markers(config: &ExclusionConfig, text: &str) -> usize {
    let lower = text.to_lowercase();
    let tokens: HashSet<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();

    config
        .language_markers
        .iter()
        .filter(|marker| {
            if marker.contains(' ') {
                lower.contains(marker.as_str())
            } else {
                tokens.contains(marker.as_str())
            }
        })
        .count()
}

pub fn is_foreign_language(config: &ExclusionConfig, title: &str, description: &str) -> bool {
    let title_hits = count_markers(config, title);
    if title_hits >= config.title_threshold {
        return true;
    }
    if description.is_empty() {
        return false;
    }

    let body_hits = count_markers(config, description);
    body_hits >= config.body_threshold
        || (title_hits >= config.combined_title_threshold
            && body_hits >= config.combined_body_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExclusionConfig {
        ExclusionConfig::default()
    }

    #[test]
    fn english_listing_passes() {
        assert!(!should_exclude(
            &config(),
            "Junior Accountant",
            "Join our international finance team in Haarlem. English is the working language."
        ));
    }

    #[test]
    fn keyword_in_description_excludes() {
        assert!(should_exclude(
            &config(),
            "Bookkeeper",
            "Fluent Dutch is essential for this role."
        ));
        assert!(should_exclude(&config(), "Office Assistant", "Own car required"));
    }

    #[test]
    fn keyword_matching_ignores_case() {
        assert!(should_exclude(&config(), "Finance DIRECTOR", ""));
    }

    #[test]
    fn title_only_keyword_excludes() {
        assert!(should_exclude(&config(), "Senior Manager Finance", ""));
    }

    #[test]
    fn two_title_markers_exclude_despite_role_match() {
        assert!(should_exclude(&config(), "Vacature Boekhouder", ""));
    }

    #[test]
    fn single_title_marker_alone_is_not_enough() {
        assert!(!should_exclude(&config(), "Vacature Accountant", ""));
    }

    #[test]
    fn single_title_marker_plus_weak_body_excludes() {
        assert!(should_exclude(
            &config(),
            "Vacature Accountant",
            "Je werkt zelfstandig binnen een klein team"
        ));
    }

    #[test]
    fn body_threshold_excludes() {
        assert!(should_exclude(
            &config(),
            "Accountant",
            "Wij zoeken een collega voor onze afdeling met kennis van boekhouding"
        ));
    }

    #[test]
    fn markers_match_whole_words_only() {
        // "wo" and "uur" appear only inside longer English words.
        assert_eq!(count_markers(&config(), "woman hour tour"), 0);
    }

    #[test]
    fn accented_letters_stay_inside_tokens() {
        let mut cfg = config();
        cfg.language_markers = vec!["financiële".to_string()];
        assert_eq!(count_markers(&cfg, "Financiële administratie"), 1);
    }

    #[test]
    fn phrases_match_as_substrings() {
        assert_eq!(count_markers(&config(), "Starting per direct"), 1);
        // "wij zoeken" as a phrase plus "zoeken" as a word.
        assert_eq!(count_markers(&config(), "Wij zoeken iemand"), 2);
    }

    #[test]
    fn empty_input_is_kept() {
        assert!(!should_exclude(&config(), "", ""));
    }
}
