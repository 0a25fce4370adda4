use std::fmt;

use serde::{Deserialize, Serialize};

/// Job boards the collectors know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Indeed,
    IamExpat,
    Undutchables,
    LinkedIn,
    Adams,
    WelcomeToNl,
}

impl Source {
    pub const ALL: [Source; 6] = [
        Source::Indeed,
        Source::IamExpat,
        Source::Undutchables,
        Source::LinkedIn,
        Source::Adams,
        Source::WelcomeToNl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Indeed => "indeed",
            Source::IamExpat => "iamexpat",
            Source::Undutchables => "undutchables",
            Source::LinkedIn => "linkedin",
            Source::Adams => "adams",
            Source::WelcomeToNl => "welcometonl",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing exactly as a collector scraped it.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub snippet: Option<String>,
    pub link: String,
    pub source: Source,
    pub date_posted: Option<String>,
}

/// Cleaned-up listing with a stable identity. Produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub fingerprint: String,
    pub source: Source,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub snippet: Option<String>,
    pub link: String,
    pub date_posted: Option<String>,
}

impl Listing {
    pub fn company_or_empty(&self) -> &str {
        self.company.as_deref().unwrap_or("")
    }

    pub fn location_or_empty(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    pub fn snippet_or_empty(&self) -> &str {
        self.snippet.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingType {
    Direct,
    Recruiter,
    JobBoard,
}

impl PostingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingType::Direct => "direct",
            PostingType::Recruiter => "recruiter",
            PostingType::JobBoard => "job_board",
        }
    }
}

/// Monthly salary range found in the listing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Salary {
    pub min: i32,
    pub max: i32,
    pub raw: String,
}

/// A listing that survived filtering, with every derived field filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedJob {
    #[serde(flatten)]
    pub listing: Listing,
    pub score: i32,
    pub category: String,
    pub city: String,
    pub posting_type: PostingType,
    pub salary: Option<Salary>,
}
