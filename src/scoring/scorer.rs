// src/scoring/scorer.rs
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::vocabulary::Vocabulary;
use crate::types::candidate::CandidateRecord;
use crate::types::report::{
    clamp_score, CompatibilityReport, DetailedScores, MatchCategory, SkillMatch,
};

/// Sub-scores used when the job text gives nothing to compare against.
/// A vague job description is never a reason to score a candidate at zero.
pub const DEFAULT_TECHNICAL_FIT: u32 = 80;
pub const DEFAULT_EXPERIENCE_FIT: u32 = 70;
pub const DEFAULT_LOCATION_FIT: u32 = 60;
pub const DEFAULT_SOFT_SKILLS_FIT: u32 = 75;

const SKILLS_BONUS_THRESHOLD: usize = 5;
const SKILLS_BONUS: u32 = 10;
const ABOUT_BONUS_MIN_CHARS: usize = 200;
const ABOUT_BONUS: u32 = 5;
const DETAILED_EXPERIENCE_MIN_CHARS: usize = 200;
const SUMMARY_MIN_CHARS: usize = 100;
const MANY_MATCHES: usize = 8;

static YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\+?\s*(?:anos?|years?)\b").expect("years pattern is valid")
});

const REMOTE_MARKERS: [&str; 2] = ["remoto", "remote"];

/// Keyword-driven compatibility scorer. Never fails: any pair of strings
/// yields a report.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    vocabulary: Vocabulary,
}

/// Outcome of matching one vocabulary against the job and profile text
struct KeywordTally {
    required: u32,
    matched: Vec<String>,
    missing: Vec<String>,
}

impl KeywordTally {
    fn ratio_score(&self) -> Option<u32> {
        if self.required == 0 {
            return None;
        }
        // round(matched / required * 100), half up
        let matched = self.matched.len() as u32;
        Some((matched * 200 + self.required) / (2 * self.required))
    }
}

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn score(&self, candidate: &CandidateRecord, job_text: &str) -> CompatibilityReport {
        let job = job_text.to_lowercase();
        let profile = candidate.searchable_text();

        let mut matches = Vec::new();
        let mut strengths = Vec::new();
        let mut concerns = Vec::new();

        let technical_tally = tally(&self.vocabulary.technical, &job, &profile);
        let mut technical = technical_tally
            .ratio_score()
            .unwrap_or(DEFAULT_TECHNICAL_FIT);
        matches.extend(technical_tally.matched.iter().map(|keyword| SkillMatch {
            keyword: keyword.clone(),
            category: MatchCategory::Technical,
        }));
        let missing_skills = technical_tally
            .missing
            .iter()
            .map(|keyword| keyword.to_uppercase())
            .collect();

        let mut experience =
            self.experience_fit(candidate, &job, &mut strengths, &mut concerns);
        let location = self.location_fit(candidate, &job, &mut strengths);

        let soft_tally = tally(&self.vocabulary.soft_skills, &job, &profile);
        let soft_skills = soft_tally.ratio_score().unwrap_or(DEFAULT_SOFT_SKILLS_FIT);
        matches.extend(soft_tally.matched.iter().map(|keyword| SkillMatch {
            keyword: keyword.clone(),
            category: MatchCategory::SoftSkill,
        }));

        if !candidate.skills.is_empty() {
            strengths.push(format!(
                "{} skills identified in the profile",
                candidate.skills.len()
            ));
            if candidate.skills.len() >= SKILLS_BONUS_THRESHOLD {
                technical = u32::from(clamp_score(technical + SKILLS_BONUS));
            }
        }

        let about_chars = candidate.about.chars().count();
        if about_chars > ABOUT_BONUS_MIN_CHARS {
            strengths.push(format!(
                "Profile with a detailed description ({} characters)",
                about_chars
            ));
            experience = u32::from(clamp_score(experience + ABOUT_BONUS));
        }

        let detailed = DetailedScores::new(technical, experience, location, soft_skills);

        if detailed.technical_fit < 50 {
            concerns.push("Important technical skills are missing".to_string());
        }
        if detailed.technical_fit > 80 {
            strengths.push("Strong technical compatibility".to_string());
        }
        if matches.len() > MANY_MATCHES {
            strengths.push(format!("{} compatibilities found", matches.len()));
        }

        debug!(
            technical = detailed.technical_fit,
            experience = detailed.experience_fit,
            location = detailed.location_fit,
            soft_skills = detailed.soft_skills_fit,
            "Computed compatibility sub-scores"
        );

        CompatibilityReport::new(detailed, matches, missing_skills, strengths, concerns)
    }

    fn experience_fit(
        &self,
        candidate: &CandidateRecord,
        job: &str,
        strengths: &mut Vec<String>,
        concerns: &mut Vec<String>,
    ) -> u32 {
        let Some(required_years) = required_years(job) else {
            return DEFAULT_EXPERIENCE_FIT;
        };

        let experience_chars = candidate.experience_text().chars().count();
        if experience_chars > DETAILED_EXPERIENCE_MIN_CHARS {
            strengths.push(format!(
                "Detailed professional experience ({} points)",
                experience_chars / 100
            ));
            90
        } else if candidate.about.chars().count() > SUMMARY_MIN_CHARS {
            strengths.push("Professional summary present".to_string());
            75
        } else {
            concerns.push(format!(
                "Check whether the candidate has {}+ years of experience",
                required_years
            ));
            60
        }
    }

    fn location_fit(&self, candidate: &CandidateRecord, job: &str, strengths: &mut Vec<String>) -> u32 {
        let location = candidate.location.trim();
        if location.is_empty() || job.trim().is_empty() {
            return DEFAULT_LOCATION_FIT;
        }

        if REMOTE_MARKERS.iter().any(|marker| job.contains(marker)) {
            strengths.push("Remote work available".to_string());
            100
        } else if job.contains(&location.to_lowercase()) {
            strengths.push(format!("Compatible location: {}", location));
            100
        } else {
            strengths.push(format!("Location: {}", location));
            70
        }
    }
}

/// Years of experience requested by the job text ("5+ years", "3 anos").
///
/// Returns the digits as written; a number too large for any integer type
/// still counts as a requirement.
pub fn required_years(job_lower: &str) -> Option<&str> {
    YEARS_PATTERN
        .captures(job_lower)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn tally(keywords: &[String], job: &str, profile: &str) -> KeywordTally {
    let mut result = KeywordTally {
        required: 0,
        matched: Vec::new(),
        missing: Vec::new(),
    };

    for keyword in keywords {
        if !job.contains(keyword.as_str()) {
            continue;
        }
        result.required += 1;
        if profile.contains(keyword.as_str()) {
            result.matched.push(keyword.clone());
        } else {
            result.missing.push(keyword.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::ExperienceEntry;
    use crate::types::report::Recommendation;

    fn candidate() -> CandidateRecord {
        let mut rec = CandidateRecord::empty("https://example.com/in/jane", "test");
        rec.name = "Jane".to_string();
        rec.title = "Engineer".to_string();
        rec
    }

    fn small_vocab_scorer() -> CompatibilityScorer {
        CompatibilityScorer::with_vocabulary(Vocabulary::new(
            &["python", "docker", "kubernetes", "aws"],
            &["leadership", "communication"],
        ))
    }

    #[test]
    fn test_empty_job_gives_defaults() {
        let mut rec = candidate();
        rec.location = "Lisbon".to_string();
        let report = CompatibilityScorer::new().score(&rec, "");

        assert_eq!(report.detailed_analysis, DetailedScores::new(80, 70, 60, 75));
        assert_eq!(report.overall_score, 73);
        assert_eq!(report.recommendation, Recommendation::VeryGood);
        assert!(report.matches.is_empty());
        assert!(report.missing_skills.is_empty());
    }

    #[test]
    fn test_technical_fit_is_matched_ratio() {
        let mut rec = candidate();
        rec.about = "Built services with Python and Docker".to_string();
        let report = small_vocab_scorer().score(&rec, "Python, Docker and Kubernetes on AWS");

        // 2 of 4 required
        assert_eq!(report.detailed_analysis.technical_fit, 50);
        assert_eq!(report.missing_skills, vec!["KUBERNETES", "AWS"]);
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].to_string(), "PYTHON");
    }

    #[test]
    fn test_technical_ratio_rounds() {
        let mut rec = candidate();
        rec.about = "python".to_string();
        let report = small_vocab_scorer().score(&rec, "python docker kubernetes");
        // 1/3 -> 33.3
        assert_eq!(report.detailed_analysis.technical_fit, 33);

        rec.about = "python docker".to_string();
        let report = small_vocab_scorer().score(&rec, "python docker kubernetes");
        // 2/3 -> 66.7
        assert_eq!(report.detailed_analysis.technical_fit, 67);
    }

    #[test]
    fn test_skills_bonus_caps_at_100() {
        let mut rec = candidate();
        rec.skills = ["Python", "Go", "SQL", "Linux", "Bash"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = small_vocab_scorer().score(&rec, "python");

        assert_eq!(report.detailed_analysis.technical_fit, 100);
        assert!(report
            .strengths
            .contains(&"5 skills identified in the profile".to_string()));
        assert!(report
            .strengths
            .contains(&"Strong technical compatibility".to_string()));
    }

    #[test]
    fn test_no_match_when_required_scores_zero() {
        let report = small_vocab_scorer().score(&candidate(), "docker");
        assert_eq!(report.detailed_analysis.technical_fit, 0);
        assert!(report
            .concerns
            .contains(&"Important technical skills are missing".to_string()));
    }

    #[test]
    fn test_experience_tiers() {
        let scorer = small_vocab_scorer();
        let job = "at least 5+ years of experience";

        let rec = candidate();
        let report = scorer.score(&rec, job);
        assert_eq!(report.detailed_analysis.experience_fit, 60);
        assert!(report.concerns[0].contains("5+ years"));

        let mut with_about = candidate();
        with_about.about = "a".repeat(150);
        assert_eq!(
            scorer.score(&with_about, job).detailed_analysis.experience_fit,
            75
        );

        let mut with_history = candidate();
        with_history.experience = (0..5)
            .map(|i| ExperienceEntry {
                title: format!("Senior Platform Engineer {}", i),
                company: "Some Large Company Ltd".to_string(),
                duration: "2018 - 2023".to_string(),
            })
            .collect();
        assert_eq!(
            scorer.score(&with_history, job).detailed_analysis.experience_fit,
            90
        );
    }

    #[test]
    fn test_experience_pattern_in_portuguese() {
        assert_eq!(required_years("mínimo de 3 anos de experiência"), Some("3"));
        assert_eq!(required_years("10+ years"), Some("10"));
        assert_eq!(required_years("1 ano"), Some("1"));
        assert_eq!(required_years("senior role"), None);
    }

    #[test]
    fn test_oversized_year_count_still_uses_tiers() {
        let report = small_vocab_scorer().score(&candidate(), "needs 10000000000 years of experience");
        assert_eq!(report.detailed_analysis.experience_fit, 60);
        assert!(report
            .concerns
            .contains(&"Check whether the candidate has 10000000000+ years of experience".to_string()));
    }

    #[test]
    fn test_about_bonus_adds_five() {
        let mut rec = candidate();
        rec.about = "x".repeat(250);
        let report = small_vocab_scorer().score(&rec, "no requirements here");
        assert_eq!(report.detailed_analysis.experience_fit, 75);

        let report = small_vocab_scorer().score(&rec, "3 years");
        // about > 100 -> 75, plus 5
        assert_eq!(report.detailed_analysis.experience_fit, 80);
    }

    #[test]
    fn test_location_dimension() {
        let scorer = small_vocab_scorer();
        let mut rec = candidate();

        assert_eq!(
            scorer.score(&rec, "office job").detailed_analysis.location_fit,
            60
        );

        rec.location = "São Paulo".to_string();
        assert_eq!(
            scorer.score(&rec, "Trabalho remoto").detailed_analysis.location_fit,
            100
        );
        assert_eq!(
            scorer
                .score(&rec, "Office in SÃO PAULO downtown")
                .detailed_analysis
                .location_fit,
            100
        );
        let report = scorer.score(&rec, "Office in Lisbon");
        assert_eq!(report.detailed_analysis.location_fit, 70);
        assert!(report.strengths.contains(&"Location: São Paulo".to_string()));
    }

    #[test]
    fn test_soft_skills_do_not_record_missing() {
        let mut rec = candidate();
        rec.about = "Strong leadership".to_string();
        let report = small_vocab_scorer().score(&rec, "leadership and communication");

        assert_eq!(report.detailed_analysis.soft_skills_fit, 50);
        assert!(report.missing_skills.is_empty());
        assert_eq!(report.matches[0].to_string(), "Leadership");
    }

    #[test]
    fn test_many_matches_adds_strength() {
        let vocab = Vocabulary::new(
            &["aa", "bb", "cc", "dd", "ee", "ff", "gg", "hh", "ii"],
            &[],
        );
        let mut rec = candidate();
        rec.about = "aa bb cc dd ee ff gg hh ii".to_string();
        let report = CompatibilityScorer::with_vocabulary(vocab).score(&rec, "aa bb cc dd ee ff gg hh ii");
        assert!(report
            .strengths
            .contains(&"9 compatibilities found".to_string()));
    }

    #[test]
    fn test_overall_matches_sub_scores() {
        let mut rec = candidate();
        rec.about = "React and TypeScript developer, remote friendly".to_string();
        rec.location = "Recife".to_string();
        let report = CompatibilityScorer::new().score(
            &rec,
            "Senior React developer with TypeScript, GraphQL and AWS. 5 anos. Remoto.",
        );
        assert_eq!(
            report.overall_score,
            report.detailed_analysis.weighted_overall()
        );
        assert_eq!(
            report.recommendation,
            Recommendation::from_score(report.overall_score)
        );
    }
}
