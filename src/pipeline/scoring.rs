//! Relevance score of a listing for the candidate profile.

use serde::Serialize;

use crate::profile::ScoringConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub label: String,
    pub delta: i32,
}

/// Explains a score. `total` is clamped, the components are not, so their
/// sum only equals `total` when no clamping happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: i32,
}

impl ScoreBreakdown {
    fn push(&mut self, label: impl Into<String>, delta: i32) {
        self.components.push(ScoreComponent {
            label: label.into(),
            delta,
        });
    }

    pub fn unclamped_total(&self) -> i32 {
        self.components.iter().map(|c| c.delta).sum()
    }
}

fn any_in(signals: &[String], text: &str) -> bool {
    signals.iter().any(|s| text.contains(s.as_str()))
}

pub fn score(
    config: &ScoringConfig,
    title: &str,
    company: &str,
    location: &str,
    description: &str,
) -> i32 {
    breakdown(config, title, company, location, description).total
}

pub fn breakdown(
    config: &ScoringConfig,
    title: &str,
    _company: &str,
    location: &str,
    description: &str,
) -> ScoreBreakdown {
    let title_lower = title.to_lowercase();
    let desc_lower = description.to_lowercase();
    let combined = format!("{title_lower} {desc_lower}");

    let mut result = ScoreBreakdown {
        components: Vec::new(),
        total: 0,
    };

    // Highest-valued role keyword; ties keep the earlier table entry.
    let best_role = config
        .role_scores
        .iter()
        .filter(|(kw, _)| combined.contains(kw.as_str()))
        .fold(None::<&(String, i32)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        });

    let Some((role, role_points)) = best_role else {
        result.push("Unknown role", config.unknown_role_score);
        result.total = config
            .unknown_role_score
            .clamp(config.min_score, config.max_score);
        return result;
    };
    result.push(format!("Role: {role}"), *role_points);

    if let Some((kw, penalty)) = config
        .seniority_penalties
        .iter()
        .find(|(kw, _)| title_lower.contains(kw.as_str()))
    {
        result.push(format!("Seniority: {kw}"), *penalty);
    }

    if let Some((kw, bonus)) = config
        .seniority_bonuses
        .iter()
        .find(|(kw, _)| title_lower.contains(kw.as_str()) || desc_lower.contains(kw.as_str()))
    {
        result.push(format!("Level: {kw}"), *bonus);
    }

    if any_in(&config.english_signals, &combined) {
        result.push("English friendly", config.english_bonus);
    }
    if any_in(&config.english_env_signals, &combined) {
        result.push("English working environment", config.english_env_bonus);
    }
    if any_in(&config.language_asset_signals, &combined) {
        result.push("Language asset", config.language_asset_bonus);
    }
    if any_in(&config.temp_contract_signals, &combined) {
        result.push("Temporary/contract", config.temp_contract_bonus);
    }

    let location_lower = location.to_lowercase();
    if let Some((city, bonus)) = config
        .city_bonuses
        .iter()
        .find(|(city, _)| location_lower.contains(&city.to_lowercase()))
    {
        result.push(format!("Location: {city}"), *bonus);
    }

    if any_in(&config.newcomer_signals, &combined) {
        result.push("Newcomer friendly", config.newcomer_bonus);
    }
    if any_in(&config.part_time_signals, &combined) {
        result.push("Part-time", config.part_time_bonus);
    }
    if any_in(&config.prior_employer_signals, &combined) {
        result.push("Prior employer", config.prior_employer_bonus);
    }

    result.total = result
        .unclamped_total()
        .clamp(config.min_score, config.max_score);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    fn labels(b: &ScoreBreakdown) -> Vec<&str> {
        b.components.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn best_role_keyword_wins() {
        // "accountant" (100) beats "administration" (70).
        let b = breakdown(&config(), "Accountant", "", "", "Some administration work");
        assert_eq!(b.components[0].label, "Role: accountant");
        assert_eq!(b.components[0].delta, 100);
        assert_eq!(b.total, 100);
    }

    #[test]
    fn unknown_role_is_a_flat_floor() {
        let b = breakdown(
            &config(),
            "Junior Software Engineer",
            "",
            "Haarlem",
            "English speaking, part-time",
        );
        assert_eq!(b.total, 20);
        assert_eq!(labels(&b), vec!["Unknown role"]);
    }

    #[test]
    fn only_first_seniority_penalty_applies() {
        // "senior" and "manager" both match; only "senior" counts.
        let b = breakdown(&config(), "Senior Office Manager", "", "", "");
        let seniority: Vec<_> = b
            .components
            .iter()
            .filter(|c| c.label.starts_with("Seniority"))
            .collect();
        assert_eq!(seniority.len(), 1);
        assert_eq!(seniority[0].delta, -20);
        assert_eq!(b.total, 65 - 20);
    }

    #[test]
    fn seniority_penalty_ignores_description() {
        let b = breakdown(&config(), "Bookkeeper", "", "", "reporting to the senior manager");
        assert_eq!(b.total, 95);
    }

    #[test]
    fn seniority_bonus_reads_description() {
        let b = breakdown(&config(), "Bookkeeper", "", "", "A great starter role");
        assert_eq!(b.total, 95 + 15);
    }

    #[test]
    fn english_bonuses_stack() {
        let b = breakdown(
            &config(),
            "Accounts Payable Clerk",
            "",
            "",
            "English is the working language. No Dutch required.",
        );
        assert!(labels(&b).contains(&"English friendly"));
        assert!(labels(&b).contains(&"English working environment"));
        assert_eq!(b.total, 95 + 15 + 15);
    }

    #[test]
    fn flat_bonus_applies_once_regardless_of_matches() {
        let b = breakdown(
            &config(),
            "Payroll administrator",
            "",
            "",
            "temporary contract, freelance or interim",
        );
        // "administrator" does not contain "administration"; payroll is 80.
        assert_eq!(b.total, 80 + 5);
    }

    #[test]
    fn location_bonus_takes_first_city_in_priority_order() {
        let b = breakdown(&config(), "Accountant", "", "Haarlem / Amsterdam", "");
        assert!(labels(&b).contains(&"Location: Haarlem"));
        assert_eq!(b.total, 110);
    }

    #[test]
    fn total_is_clamped_but_components_are_not() {
        let b = breakdown(
            &config(),
            "Junior Accountant",
            "",
            "Haarlem",
            "International team, English is the working language, Ukrainian or Russian \
             is a plus, temporary contract, refugee and newcomer friendly, part-time, \
             ex-ZARA welcome",
        );
        assert_eq!(b.total, 150);
        assert!(b.unclamped_total() > 150);
    }

    #[test]
    fn score_matches_breakdown_total() {
        let cfg = config();
        let s = score(&cfg, "Office assistant", "Acme", "Hoofddorp", "english");
        let b = breakdown(&cfg, "Office assistant", "Acme", "Hoofddorp", "english");
        assert_eq!(s, b.total);
    }

    #[test]
    fn scoring_is_pure() {
        let cfg = config();
        let a = score(&cfg, "Bookkeeper", "", "Leiden", "expat");
        let b = score(&cfg, "Bookkeeper", "", "Leiden", "expat");
        assert_eq!(a, b);
    }

    #[test]
    fn score_stays_within_bounds() {
        let cfg = config();
        let inputs = [
            ("", "", ""),
            ("Senior Principal Head Expert", "", ""),
            ("Senior lead retail store", "", ""),
            ("Accountant", "Haarlem", "english ukrainian temporary refugee part-time zara"),
        ];
        for (title, location, description) in inputs {
            let s = score(&cfg, title, "", location, description);
            assert!((0..=150).contains(&s), "{title}: {s}");
        }
    }
}
