use crate::models::listing::{PostingType, Source};
use crate::profile::ClassifierConfig;

pub const OTHER_CATEGORY: &str = "Other";

/// First category rule with a keyword in title or description, else "Other".
pub fn category(config: &ClassifierConfig, title: &str, description: &str) -> String {
    let combined = format!("{title} {description}").to_lowercase();
    config
        .categories
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| combined.contains(kw.as_str())))
        .map(|rule| rule.name.clone())
        .unwrap_or_else(|| OTHER_CATEGORY.to_string())
}

/// Normalized city for a free-text location.
pub fn city(config: &ClassifierConfig, location: &str) -> String {
    let loc_lower = location.trim().to_lowercase();
    if loc_lower.is_empty() {
        return String::new();
    }

    if let Some((_, city)) = config
        .city_aliases
        .iter()
        .find(|(alias, _)| loc_lower.contains(alias.as_str()))
    {
        return city.clone();
    }

    if let Some(city) = config
        .target_cities
        .iter()
        .find(|city| loc_lower.contains(&city.to_lowercase()))
    {
        return city.clone();
    }

    let first = location.split(',').next().unwrap_or("").trim();
    strip_locality_prefix(config, first).trim().to_string()
}

/// Prefixes are tried in table order and each one that matches is removed,
/// so "Regio Area Haarlem" loses both.
fn strip_locality_prefix<'a>(config: &ClassifierConfig, mut text: &'a str) -> &'a str {
    for prefix in &config.locality_prefixes {
        let len = prefix.len();
        if let Some(head) = text.get(..len)
            && head.eq_ignore_ascii_case(prefix)
        {
            text = &text[len..];
        }
    }
    text
}

/// Company-level recruiter signal wins over anything known about the source.
pub fn posting_type(config: &ClassifierConfig, company: &str, source: Source) -> PostingType {
    let company_lower = company.trim().to_lowercase();
    if config
        .known_recruiters
        .iter()
        .any(|r| company_lower.contains(r.as_str()))
    {
        return PostingType::Recruiter;
    }

    let source = source.as_str();
    if config.recruiter_sources.iter().any(|s| s == source) {
        PostingType::Recruiter
    } else if config.job_board_sources.iter().any(|s| s == source) {
        PostingType::JobBoard
    } else {
        PostingType::Direct
    }
}
