// src/types/mod.rs
pub mod backend;
pub mod candidate;
pub mod report;

pub use backend::{AuthResponse, LoginRequest, RegisterRequest, Resource, SavedAnalysis};
pub use candidate::{CandidateRecord, EducationEntry, ExperienceEntry, ManualCandidateInput};
pub use report::{CompatibilityReport, DetailedScores, MatchCategory, Recommendation, SkillMatch};
