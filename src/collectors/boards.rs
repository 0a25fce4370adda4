//! Search URLs and card selectors for each job board.
//!
//! Selectors list alternatives because the boards ship several layouts.

use crate::models::listing::Source;

#[derive(Debug)]
pub struct CardSelectors {
    pub card: &'static str,
    pub title: &'static str,
    /// Separate link element; when absent the title element's href is used.
    pub link: Option<&'static str>,
    pub company: &'static str,
    pub location: &'static str,
    pub snippet: Option<&'static str>,
    pub date: Option<&'static str>,
    /// Read the date from this attribute instead of the element text.
    pub date_attr: Option<&'static str>,
}

#[derive(Debug)]
pub struct Board {
    pub source: Source,
    pub origin: &'static str,
    pub search_path: &'static str,
    pub query_param: &'static str,
    pub area_param: &'static str,
    pub extra_params: &'static [(&'static str, &'static str)],
    pub queries: &'static [&'static str],
    pub areas: &'static [&'static str],
    pub selectors: CardSelectors,
    pub snippet_limit: Option<usize>,
    pub strip_link_query: bool,
    /// Use the searched area when a card has no location.
    pub area_as_location: bool,
}

const BROAD_QUERIES: &[&str] = &[
    "accountant",
    "bookkeeper",
    "finance",
    "administration",
    "back office",
    "customer service",
    "data entry",
    "office",
];

pub static BOARDS: [Board; 6] = [
    Board {
        source: Source::Indeed,
        origin: "https://nl.indeed.com",
        search_path: "/jobs",
        query_param: "q",
        area_param: "l",
        extra_params: &[("radius", "25"), ("lang", "en"), ("fromage", "14")],
        queries: &[
            "accountant english",
            "bookkeeper english",
            "accounts payable english",
            "accounts receivable english",
            "financial administrator english",
            "office administrator english",
            "back office english",
            "customer service english",
            "data entry english",
        ],
        areas: &["Haarlem", "Amsterdam", "Hoofddorp"],
        selectors: CardSelectors {
            card: "div.job_seen_beacon, div.jobsearch-ResultsList > div",
            title: "h2.jobTitle a, h2.jobTitle span",
            link: Some("h2.jobTitle a"),
            company: "[data-testid='company-name'], span.companyName",
            location: "[data-testid='text-location'], div.companyLocation",
            snippet: Some("div.job-snippet, td.resultContent div.css-9446fg"),
            date: Some("span.date"),
            date_attr: None,
        },
        snippet_limit: None,
        strip_link_query: false,
        area_as_location: true,
    },
    Board {
        source: Source::IamExpat,
        origin: "https://www.iamexpat.nl",
        search_path: "/career/jobs-netherlands",
        query_param: "search",
        area_param: "location",
        extra_params: &[("distance", "25")],
        queries: BROAD_QUERIES,
        areas: &["Haarlem"],
        selectors: CardSelectors {
            card: "div.views-row, article.node--job, div.job-listing",
            title: "h2 a, h3 a, a.job-title, span.field--name-title a",
            link: None,
            company: ".field--name-field-company, .company-name, span.company",
            location: ".field--name-field-location, .location, span.location",
            snippet: Some(".field--name-body, .job-description, p"),
            date: None,
            date_attr: None,
        },
        snippet_limit: Some(300),
        strip_link_query: false,
        area_as_location: false,
    },
    Board {
        source: Source::Undutchables,
        origin: "https://undutchables.nl",
        search_path: "/jobs",
        query_param: "query",
        area_param: "region",
        extra_params: &[],
        queries: BROAD_QUERIES,
        areas: &["noord-holland"],
        selectors: CardSelectors {
            card: "div.vacancy-item, div.job-item, article.vacancy, div.card.vacancy",
            title: "h2 a, h3 a, a.vacancy-title, .vacancy-item__title a",
            link: None,
            company: ".vacancy-company, .company, .vacancy-item__company",
            location: ".vacancy-location, .location, .vacancy-item__location",
            snippet: Some(".vacancy-intro, .description, .vacancy-item__description"),
            date: None,
            date_attr: None,
        },
        snippet_limit: Some(300),
        strip_link_query: false,
        area_as_location: false,
    },
    Board {
        source: Source::LinkedIn,
        origin: "https://www.linkedin.com",
        search_path: "/jobs/search/",
        query_param: "keywords",
        area_param: "location",
        extra_params: &[("distance", "25"), ("f_TPR", "r604800")],
        queries: &[
            "accountant english",
            "bookkeeper",
            "finance administrator",
            "office administrator english",
            "back office english",
            "customer service english",
        ],
        areas: &["Haarlem, North Holland, Netherlands"],
        selectors: CardSelectors {
            card: "div.base-card, li.result-card, div.job-search-card",
            title: "h3.base-search-card__title, h3.result-card__title",
            link: Some("a.base-card__full-link, a.result-card__full-card-link"),
            company: "h4.base-search-card__subtitle, h4.result-card__subtitle",
            location: "span.job-search-card__location",
            snippet: None,
            date: Some("time"),
            date_attr: Some("datetime"),
        },
        snippet_limit: None,
        strip_link_query: true,
        area_as_location: false,
    },
    Board {
        source: Source::Adams,
        origin: "https://www.adamsrecruitment.com",
        search_path: "/jobs/",
        query_param: "search",
        area_param: "location",
        extra_params: &[],
        queries: BROAD_QUERIES,
        areas: &["Noord-Holland"],
        selectors: CardSelectors {
            card: "div.job-item, div.vacancy-card, article.vacancy, div.card-job, li.job-listing, div.job-result",
            title: "h2 a, h3 a, a.job-title, .vacancy-title a, .job-item__title a, .card-title a",
            link: None,
            company: ".company, .job-item__company, .vacancy-company, .employer",
            location: ".location, .job-item__location, .vacancy-location, .job-location",
            snippet: Some(".description, .job-item__description, .vacancy-intro, p"),
            date: None,
            date_attr: None,
        },
        snippet_limit: Some(300),
        strip_link_query: false,
        area_as_location: false,
    },
    Board {
        source: Source::WelcomeToNl,
        origin: "https://welcome-to-nl.nl",
        search_path: "/jobs/",
        query_param: "search",
        area_param: "location",
        extra_params: &[],
        queries: BROAD_QUERIES,
        areas: &["Noord-Holland"],
        selectors: CardSelectors {
            card: "div.job-item, div.vacancy, article.job, div.card-job, li.job-listing, div.job-result, div.views-row",
            title: "h2 a, h3 a, a.job-title, .vacancy-title a, .job-title a, .card-title a",
            link: None,
            company: ".company, .employer, .job-company, .organization",
            location: ".location, .job-location, .city",
            snippet: Some(".description, .job-description, .intro, p"),
            date: None,
            date_attr: None,
        },
        snippet_limit: Some(300),
        strip_link_query: false,
        area_as_location: false,
    },
];
