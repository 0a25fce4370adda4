// Ingestion pipeline: everything between a scraped card and a stored row.

pub mod classify;
pub mod exclusion;
pub mod normalize;
pub mod posting_age;
pub mod salary;
pub mod scoring;

use crate::models::listing::{Listing, NormalizedJob};
use crate::profile::Profile;

/// Run the filter, classifier, salary extractor and scorer over a listing.
/// Returns `None` when the listing is excluded.
pub fn evaluate(profile: &Profile, listing: Listing) -> Option<NormalizedJob> {
    let title = listing.title.as_str();
    let snippet = listing.snippet_or_empty();

    if exclusion::should_exclude(&profile.exclusion, title, snippet) {
        return None;
    }

    let category = classify::category(&profile.classifier, title, snippet);
    let city = classify::city(&profile.classifier, listing.location_or_empty());
    let posting_type =
        classify::posting_type(&profile.classifier, listing.company_or_empty(), listing.source);
    let salary = salary::extract(profile.salary, &format!("{title} {snippet}"));
    let score = scoring::score(
        &profile.scoring,
        title,
        listing.company_or_empty(),
        listing.location_or_empty(),
        snippet,
    );

    Some(NormalizedJob {
        listing,
        score,
        category,
        city,
        posting_type,
        salary,
    })
}
