//! Candidate profile: every keyword table the pipeline matches against.
//!
//! The built-in defaults describe an English-speaking finance/administration
//! candidate living in Haarlem. A JSON file can override any section; tables
//! whose order matters are arrays so that first-match semantics survive
//! deserialization.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub scoring: ScoringConfig,
    pub exclusion: ExclusionConfig,
    pub classifier: ClassifierConfig,
    pub salary: SalaryBounds,
}

impl Profile {
    /// Load a profile from a JSON file, or the built-in one when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Profile> {
        let Some(path) = path else {
            return Ok(Profile::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse profile {}", path.display()))
    }

    /// Parse a JSON profile, reject unusable bounds and lowercase its keywords.
    pub fn from_json(raw: &str) -> anyhow::Result<Profile> {
        let profile: Profile = serde_json::from_str(raw)?;
        profile.validate()?;
        Ok(profile.normalized())
    }

    fn validate(&self) -> anyhow::Result<()> {
        let scoring = &self.scoring;
        anyhow::ensure!(
            scoring.min_score <= scoring.max_score,
            "scoring.min_score ({}) is above scoring.max_score ({})",
            scoring.min_score,
            scoring.max_score
        );
        anyhow::ensure!(
            self.salary.min <= self.salary.max,
            "salary.min ({}) is above salary.max ({})",
            self.salary.min,
            self.salary.max
        );
        let exclusion = &self.exclusion;
        anyhow::ensure!(
            exclusion.title_threshold > 0
                && exclusion.body_threshold > 0
                && exclusion.combined_title_threshold > 0
                && exclusion.combined_body_threshold > 0,
            "exclusion thresholds must be at least 1"
        );
        Ok(())
    }

    /// Listing text is lowercased before matching, so the keywords must be too.
    /// Display names (categories, alias targets, cities) keep their case.
    fn normalized(mut self) -> Self {
        fn lower(items: &mut [String]) {
            for item in items {
                *item = item.to_lowercase();
            }
        }
        fn lower_keys<T>(items: &mut [(String, T)]) {
            for (key, _) in items {
                *key = key.to_lowercase();
            }
        }

        let scoring = &mut self.scoring;
        lower_keys(&mut scoring.role_scores);
        lower_keys(&mut scoring.seniority_penalties);
        lower_keys(&mut scoring.seniority_bonuses);
        lower(&mut scoring.english_signals);
        lower(&mut scoring.english_env_signals);
        lower(&mut scoring.language_asset_signals);
        lower(&mut scoring.temp_contract_signals);
        lower(&mut scoring.newcomer_signals);
        lower(&mut scoring.part_time_signals);
        lower(&mut scoring.prior_employer_signals);

        let exclusion = &mut self.exclusion;
        lower(&mut exclusion.keywords);
        lower(&mut exclusion.title_keywords);
        lower(&mut exclusion.language_markers);

        let classifier = &mut self.classifier;
        for rule in &mut classifier.categories {
            lower(&mut rule.keywords);
        }
        lower_keys(&mut classifier.city_aliases);
        lower(&mut classifier.known_recruiters);
        lower(&mut classifier.recruiter_sources);
        lower(&mut classifier.job_board_sources);

        self
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn weighted(items: &[(&str, i32)]) -> Vec<(String, i32)> {
    items.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Role keyword -> points. The best match wins.
    pub role_scores: Vec<(String, i32)>,
    /// Fixed total for listings that match no role keyword.
    pub unknown_role_score: i32,
    /// Title-only, first match applies.
    pub seniority_penalties: Vec<(String, i32)>,
    /// Title or description, first match applies.
    pub seniority_bonuses: Vec<(String, i32)>,
    pub english_signals: Vec<String>,
    pub english_bonus: i32,
    pub english_env_signals: Vec<String>,
    pub english_env_bonus: i32,
    pub language_asset_signals: Vec<String>,
    pub language_asset_bonus: i32,
    pub temp_contract_signals: Vec<String>,
    pub temp_contract_bonus: i32,
    /// City -> bonus, in priority order.
    pub city_bonuses: Vec<(String, i32)>,
    pub newcomer_signals: Vec<String>,
    pub newcomer_bonus: i32,
    pub part_time_signals: Vec<String>,
    pub part_time_bonus: i32,
    pub prior_employer_signals: Vec<String>,
    pub prior_employer_bonus: i32,
    pub min_score: i32,
    pub max_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            role_scores: weighted(&[
                ("accountant", 100),
                ("bookkeeper", 95),
                ("accounts payable", 95),
                ("accounts receivable", 95),
                ("financial", 90),
                ("finance", 90),
                ("accounting", 90),
                ("credit control", 85),
                ("invoice", 85),
                ("billing", 85),
                ("payroll", 80),
                ("tax", 80),
                ("office admin", 75),
                ("administration", 70),
                ("administrative", 70),
                ("back office", 70),
                ("office manager", 65),
                ("data entry", 65),
                ("operations support", 60),
                ("office assistant", 60),
                ("customer service", 50),
                ("customer support", 50),
                ("receptionist", 45),
                ("front desk", 45),
                ("sales assistant", 35),
                ("retail", 30),
                ("shop assistant", 30),
                ("store", 25),
            ]),
            unknown_role_score: 20,
            seniority_penalties: weighted(&[
                ("senior", -20),
                ("manager", -15),
                ("lead", -10),
                ("principal", -20),
                ("head", -15),
                ("expert", -10),
            ]),
            seniority_bonuses: weighted(&[
                ("junior", 15),
                ("assistant", 12),
                ("entry level", 15),
                ("entry-level", 15),
                ("starter", 15),
                ("trainee", 15),
                ("graduate", 12),
                ("medior", 5),
                ("intern", 10),
                ("stagiair", 10),
            ]),
            english_signals: strings(&[
                "english",
                "english-speaking",
                "international",
                "expat",
                "no dutch",
            ]),
            english_bonus: 15,
            english_env_signals: strings(&[
                "english-speaking environment",
                "no dutch required",
                "no dutch needed",
                "dutch not required",
                "english is the working language",
                "english only",
                "working language is english",
            ]),
            english_env_bonus: 15,
            language_asset_signals: strings(&["ukrainian", "russian", "oekraïens", "russisch"]),
            language_asset_bonus: 20,
            temp_contract_signals: strings(&[
                "temporary",
                "temp ",
                "contract",
                "freelance",
                "interim",
                "fixed-term",
                "fixed term",
            ]),
            temp_contract_bonus: 5,
            city_bonuses: weighted(&[
                ("Haarlem", 10),
                ("Hoofddorp", 8),
                ("Heemstede", 8),
                ("Schiphol", 7),
                ("Amsterdam", 5),
                ("Amstelveen", 5),
            ]),
            newcomer_signals: strings(&["refugee", "newcomer", "status holder"]),
            newcomer_bonus: 10,
            part_time_signals: strings(&["part-time", "part time"]),
            part_time_bonus: 3,
            prior_employer_signals: strings(&["zara", "inditex"]),
            prior_employer_bonus: 5,
            min_score: 0,
            max_score: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Matched against title and description together.
    pub keywords: Vec<String>,
    /// Matched against the title alone.
    pub title_keywords: Vec<String>,
    /// Foreign-language marker words. Entries containing a space are phrases.
    pub language_markers: Vec<String>,
    pub title_threshold: usize,
    pub body_threshold: usize,
    /// Title hits and body hits that together exclude a listing.
    pub combined_title_threshold: usize,
    pub combined_body_threshold: usize,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            keywords: strings(&[
                "dutch required",
                "dutch speaking",
                "dutch native",
                "native dutch",
                "nederlandstalig",
                "vloeiend nederlands",
                "dutch is a must",
                "dutch language required",
                "speaking dutch",
                "fluent dutch",
                "taaleis: nederlands",
                "goede beheersing van de nederlandse taal",
                "driving licence",
                "driving license",
                "driver's license",
                "rijbewijs",
                "own car",
                "eigen auto",
                "chief",
                "director",
                "vp ",
                "vice president",
                "head of",
                "c-level",
                "cfo",
                "cto",
                "ceo",
            ]),
            title_keywords: strings(&[
                "senior manager",
                "senior director",
                "managing director",
                "head of",
                "vp ",
                "chief",
            ]),
            language_markers: strings(&[
                "vacature",
                "werkervaring",
                "functie",
                "functieomschrijving",
                "solliciteer",
                "sollicitatie",
                "arbeidsovereenkomst",
                "dienstverband",
                "werknemer",
                "werkgever",
                "salaris",
                "maand",
                "uur",
                "fulltime",
                "parttime",
                "zoeken",
                "bieden",
                "werken",
                "kunnen",
                "hebben",
                "worden",
                "binnen",
                "jouw",
                "onze",
                "deze",
                "voor",
                "naar",
                "bent",
                "wordt",
                "staat",
                "beschikbaar",
                "ervaring",
                "minimaal",
                "kennis",
                "overleg",
                "overleggen",
                "zoals",
                "omdat",
                "daarnaast",
                "tevens",
                "echter",
                "indien",
                "graag",
                "bijvoorbeeld",
                "hieronder",
                "hierbij",
                "waarbij",
                "waardoor",
                "medewerker",
                "collega",
                "afdeling",
                "bedrijf",
                "organisatie",
                "klant",
                "klanten",
                "kantoor",
                "omgeving",
                "regio",
                "gemeente",
                "opleiding",
                "diploma",
                "hbo",
                "mbo",
                "wo",
                "administratief",
                "financieel",
                "financiele",
                "boekhouder",
                "boekhouding",
                "assistent",
                "gevorderd",
                "verantwoordelijk",
                "zelfstandig",
                "het",
                "een",
                "aan",
                "met",
                "ook",
                "nog",
                "wel",
                "niet",
                "maar",
                "zeer",
                "alle",
                "meer",
                "geen",
                "bij",
                "als",
                "hun",
                "wij zoeken",
                "wat bied",
                "wat ga je doen",
                "wat verwachten wij",
                "jij bent",
                "jij hebt",
                "je beschikt over",
                "sociale",
                "economie",
                "maatschappij",
                "impact",
                "ter versterking",
                "ons team",
                "per direct",
            ]),
            title_threshold: 2,
            body_threshold: 5,
            combined_title_threshold: 1,
            combined_body_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Priority-ordered; the first rule with any keyword hit wins.
    pub categories: Vec<CategoryRule>,
    /// Location variant -> city, checked before the gazetteer.
    pub city_aliases: Vec<(String, String)>,
    pub target_cities: Vec<String>,
    /// Stripped from the front of a fallback city, case-insensitively.
    pub locality_prefixes: Vec<String>,
    pub known_recruiters: Vec<String>,
    pub recruiter_sources: Vec<String>,
    pub job_board_sources: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let rule = |name: &str, keywords: &[&str]| CategoryRule {
            name: name.to_string(),
            keywords: strings(keywords),
        };
        Self {
            categories: vec![
                rule(
                    "Finance & Accounting",
                    &[
                        "accountant",
                        "bookkeeper",
                        "finance",
                        "accounting",
                        "accounts payable",
                        "accounts receivable",
                        "financial",
                        "fiscal",
                        "boekhouder",
                        "administrateur",
                        "credit control",
                        "invoice",
                        "billing",
                        "payroll",
                        "tax",
                    ],
                ),
                rule(
                    "Administration & Office",
                    &[
                        "admin",
                        "office",
                        "secretary",
                        "receptionist",
                        "office manager",
                        "back office",
                        "administrative",
                        "office assistant",
                    ],
                ),
                rule(
                    "Customer Service",
                    &[
                        "customer service",
                        "customer support",
                        "helpdesk",
                        "call centre",
                        "call center",
                        "klantenservice",
                    ],
                ),
                rule(
                    "Operations & Logistics",
                    &["operations", "logistics", "supply chain", "warehouse", "planning"],
                ),
                rule(
                    "Data Entry & Processing",
                    &["data entry", "data processing", "document", "scanning", "archiving"],
                ),
                rule(
                    "Retail",
                    &["retail", "sales assistant", "shop", "store", "winkel", "verkoop"],
                ),
            ],
            city_aliases: [
                ("amsterdam-zuidoost", "Amsterdam"),
                ("amsterdam zuidoost", "Amsterdam"),
                ("amsterdam zuid", "Amsterdam"),
                ("amsterdam west", "Amsterdam"),
                ("amsterdam noord", "Amsterdam"),
                ("schiphol-rijk", "Schiphol"),
                ("nieuw-vennep", "Nieuw-Vennep"),
            ]
            .iter()
            .map(|(a, c)| ((*a).to_string(), (*c).to_string()))
            .collect(),
            target_cities: strings(&[
                "Haarlem",
                "Amsterdam",
                "Hoofddorp",
                "Amstelveen",
                "Zaandam",
                "Schiphol",
                "Heemstede",
                "Beverwijk",
                "Leiden",
                "IJmuiden",
                "Velsen",
                "Bloemendaal",
                "Zandvoort",
                "Hillegom",
                "Lisse",
                "Nieuw-Vennep",
                "Badhoevedorp",
                "Halfweg",
                "Spaarndam",
            ]),
            locality_prefixes: strings(&["Regio ", "Area ", "Region ", "Omgeving "]),
            known_recruiters: strings(&[
                "randstad",
                "hays",
                "michael page",
                "robert half",
                "page personnel",
                "brunel",
                "yer",
                "adecco",
                "tempo-team",
                "tempo team",
                "manpower",
                "olympia",
                "yacht",
                "undutchables",
                "adams multilingual recruitment",
                "adams recruitment",
                "unique",
                "start people",
                "staffing group",
                "kelly services",
                "sander & partners",
                "progressive",
                "connected",
            ]),
            recruiter_sources: strings(&["undutchables", "adams"]),
            job_board_sources: strings(&["indeed", "linkedin", "glassdoor"]),
        }
    }
}

/// Plausible monthly salary range; anything outside is treated as noise.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SalaryBounds {
    pub min: i64,
    pub max: i64,
}

impl Default for SalaryBounds {
    fn default() -> Self {
        Self { min: 500, max: 20_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults_for_missing_sections() {
        let profile: Profile =
            serde_json::from_str(r#"{ "scoring": { "max_score": 120 } }"#).unwrap();
        assert_eq!(profile.scoring.max_score, 120);
        assert_eq!(profile.scoring.unknown_role_score, 20);
        assert_eq!(profile.salary.min, 500);
        assert_eq!(profile.classifier.categories[0].name, "Finance & Accounting");
    }

    #[test]
    fn ordered_tables_deserialize_from_arrays() {
        let profile: Profile = serde_json::from_str(
            r#"{ "scoring": { "seniority_penalties": [["lead", -5], ["senior", -30]] } }"#,
        )
        .unwrap();
        assert_eq!(
            profile.scoring.seniority_penalties,
            vec![("lead".to_string(), -5), ("senior".to_string(), -30)]
        );
    }

    #[test]
    fn mixed_case_keywords_still_match() {
        use crate::models::listing::{PostingType, Source};
        use crate::pipeline::{classify, exclusion, scoring};

        let profile = Profile::from_json(
            r#"{
                "exclusion": { "keywords": ["Own Car"] },
                "classifier": {
                    "known_recruiters": ["Randstad"],
                    "city_aliases": [["Amsterdam Zuid", "Amsterdam"]],
                    "categories": [{ "name": "Finance", "keywords": ["Bookkeeper"] }]
                },
                "scoring": { "role_scores": [["Bookkeeper", 90]] }
            }"#,
        )
        .unwrap();

        assert!(exclusion::should_exclude(
            &profile.exclusion,
            "Driver",
            "own car needed"
        ));
        assert_eq!(
            classify::posting_type(&profile.classifier, "Randstad", Source::Indeed),
            PostingType::Recruiter
        );
        assert_eq!(
            classify::city(&profile.classifier, "amsterdam zuid, NL"),
            "Amsterdam"
        );
        assert_eq!(
            classify::category(&profile.classifier, "Junior bookkeeper", ""),
            "Finance"
        );
        let breakdown = scoring::breakdown(&profile.scoring, "Bookkeeper", "", "", "");
        assert_eq!(breakdown.components[0].label, "Role: bookkeeper");
    }

    #[test]
    fn inverted_score_bounds_are_rejected() {
        let err = Profile::from_json(r#"{ "scoring": { "min_score": 100, "max_score": 50 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("min_score"));
    }

    #[test]
    fn inverted_salary_bounds_are_rejected() {
        let err = Profile::from_json(r#"{ "salary": { "min": 9000, "max": 800 } }"#).unwrap_err();
        assert!(err.to_string().contains("salary.min"));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        assert!(Profile::from_json(r#"{ "exclusion": { "title_threshold": 0 } }"#).is_err());
    }

    #[test]
    fn default_profile_is_valid() {
        assert!(Profile::default().validate().is_ok());
        assert!(Profile::from_json("{}").is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Profile::load(Some(Path::new("/nonexistent/profile.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile"));
    }
}
