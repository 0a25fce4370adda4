use sha2::{Digest, Sha256};

use crate::models::listing::{Listing, RawListing, Source};

/// Stable identity of a posting: SHA-256 of `"{source}:{link}"`, hex encoded.
pub fn fingerprint(source: Source, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{source}:{link}").as_bytes());
    hex::encode(hasher.finalize())
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_optional(text: Option<String>) -> Option<String> {
    text.map(|t| collapse_whitespace(&t)).filter(|t| !t.is_empty())
}

pub fn normalize(raw: RawListing) -> Listing {
    let link = collapse_whitespace(&raw.link);
    Listing {
        fingerprint: fingerprint(raw.source, &link),
        source: raw.source,
        title: collapse_whitespace(&raw.title),
        company: clean_optional(raw.company),
        location: clean_optional(raw.location),
        snippet: clean_optional(raw.snippet),
        link,
        date_posted: clean_optional(raw.date_posted),
    }
}
