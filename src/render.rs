// src/render.rs
//! Display structures for candidates and reports, plus their plain-text form

use serde::Serialize;
use std::fmt;

use crate::types::candidate::CandidateRecord;
use crate::types::report::CompatibilityReport;
use crate::utils::truncate_chars;

const MAX_MATCHES_SHOWN: usize = 10;
const MAX_MISSING_SHOWN: usize = 8;
const ABOUT_PREVIEW_CHARS: usize = 100;
const SKILLS_PREVIEW: usize = 5;
const NOT_FOUND: &str = "not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Green,
    Yellow,
    Red,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => ScoreBand::Green,
            55..=69 => ScoreBand::Yellow,
            _ => ScoreBand::Red,
        }
    }
}

/// A list shown up to a limit, with a count of what was left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagList {
    pub shown: Vec<String>,
    pub hidden: usize,
}

impl TagList {
    fn new(items: impl ExactSizeIterator<Item = String>, limit: usize) -> Self {
        let total = items.len();
        Self {
            shown: items.take(limit).collect(),
            hidden: total.saturating_sub(limit),
        }
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shown.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&self.shown.join(", "))?;
        if self.hidden > 0 {
            write!(f, " (+{} more)", self.hidden)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub candidate_name: String,
    pub overall_score: u8,
    pub band: ScoreBand,
    pub technical_fit: u8,
    pub experience_fit: u8,
    pub location_fit: u8,
    pub soft_skills_fit: u8,
    pub matches: TagList,
    pub missing_skills: TagList,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation: String,
}

impl ReportView {
    pub fn new(candidate: &CandidateRecord, report: &CompatibilityReport) -> Self {
        let scores = report.detailed_analysis;
        Self {
            candidate_name: display_name(candidate),
            overall_score: report.overall_score,
            band: ScoreBand::from_score(report.overall_score),
            technical_fit: scores.technical_fit,
            experience_fit: scores.experience_fit,
            location_fit: scores.location_fit,
            soft_skills_fit: scores.soft_skills_fit,
            matches: TagList::new(
                report.matches.iter().map(ToString::to_string),
                MAX_MATCHES_SHOWN,
            ),
            missing_skills: TagList::new(
                report.missing_skills.iter().cloned(),
                MAX_MISSING_SHOWN,
            ),
            strengths: report.strengths.clone(),
            concerns: report.concerns.clone(),
            recommendation: report.recommendation.message().to_string(),
        }
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compatibility: {}", self.candidate_name)?;
        writeln!(f, "Overall score:  {}% [{:?}]", self.overall_score, self.band)?;
        writeln!(f, "  Technical:    {}%", self.technical_fit)?;
        writeln!(f, "  Experience:   {}%", self.experience_fit)?;
        writeln!(f, "  Location:     {}%", self.location_fit)?;
        writeln!(f, "  Soft skills:  {}%", self.soft_skills_fit)?;
        writeln!(f, "Matches: {}", self.matches)?;
        writeln!(f, "Missing: {}", self.missing_skills)?;
        for strength in &self.strengths {
            writeln!(f, "  + {}", strength)?;
        }
        for concern in &self.concerns {
            writeln!(f, "  ! {}", concern)?;
        }
        write!(f, "{}", self.recommendation)
    }
}

/// Short summary of an extracted candidate shown before analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePreview {
    pub name: String,
    pub title: String,
    pub location: String,
    pub about: String,
    pub skill_count: usize,
    pub skills: TagList,
    pub experience_count: usize,
    pub education_count: usize,
    pub source_strategy: String,
}

impl CandidatePreview {
    pub fn new(candidate: &CandidateRecord) -> Self {
        let about = if candidate.about.chars().count() > ABOUT_PREVIEW_CHARS {
            format!("{}...", truncate_chars(&candidate.about, ABOUT_PREVIEW_CHARS))
        } else {
            candidate.about.clone()
        };

        Self {
            name: candidate.name.clone(),
            title: candidate.title.clone(),
            location: candidate.location.clone(),
            about,
            skill_count: candidate.skills.len(),
            skills: TagList::new(candidate.skills.iter().cloned(), SKILLS_PREVIEW),
            experience_count: candidate.experience.len(),
            education_count: candidate.education.len(),
            source_strategy: candidate.source_strategy.clone(),
        }
    }
}

fn or_not_found(value: &str) -> &str {
    if value.is_empty() {
        NOT_FOUND
    } else {
        value
    }
}

fn display_name(candidate: &CandidateRecord) -> String {
    if candidate.name.is_empty() {
        "Candidate".to_string()
    } else {
        candidate.name.clone()
    }
}

impl fmt::Display for CandidatePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:       {}", or_not_found(&self.name))?;
        writeln!(f, "Title:      {}", or_not_found(&self.title))?;
        writeln!(f, "Location:   {}", or_not_found(&self.location))?;
        writeln!(f, "About:      {}", or_not_found(&self.about))?;
        writeln!(f, "Skills ({}): {}", self.skill_count, self.skills)?;
        writeln!(
            f,
            "Experience: {} entries, education: {} entries",
            self.experience_count, self.education_count
        )?;
        write!(f, "Strategy:   {}", self.source_strategy)
    }
}
