// src/scoring/vocabulary.rs
//! Keyword vocabularies used by the compatibility scorer. Matching is plain
//! lower-case substring search, so short terms ("r", "go") match inside
//! longer words.

pub const TECHNICAL_KEYWORDS: &[&str] = &[
    // web
    "javascript", "typescript", "react", "angular", "vue", "node", "nodejs", "express",
    "html", "css", "sass", "scss", "bootstrap", "tailwind", "jquery", "webpack",
    // backend
    "python", "java", "php", "c#", "ruby", "go", "rust", "scala", "kotlin",
    "django", "flask", "spring", "laravel", "rails", "fastapi",
    // databases
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "oracle",
    "sqlite", "cassandra", "dynamodb", "firebase",
    // cloud / devops
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "git", "github",
    "gitlab", "terraform", "ansible", "ci/cd", "devops",
    // mobile
    "android", "ios", "react native", "flutter", "swift",
    // data science
    "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "r", "matlab",
    "tableau", "powerbi", "excel", "sql server", "spark", "hadoop",
    // methodologies
    "agile", "scrum", "kanban", "lean", "waterfall",
    // sales / marketing
    "marketing", "vendas", "sales", "crm", "salesforce", "hubspot",
    "seo", "sem", "google ads", "facebook ads", "analytics",
    // design
    "photoshop", "illustrator", "figma", "sketch", "adobe", "ui/ux", "design",
];

pub const SOFT_SKILL_KEYWORDS: &[&str] = &[
    "liderança", "leadership", "comunicação", "communication", "teamwork", "team",
    "equipe", "gestão", "management", "criatividade", "creativity", "inovação",
    "innovation", "problem solving", "analytical", "analítico", "proativo",
    "proactive", "adaptabilidade", "adaptability", "colaboração", "collaboration",
];

/// Keyword lists handed to the scorer. Order matters: matches and gaps are
/// reported in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub technical: Vec<String>,
    pub soft_skills: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(TECHNICAL_KEYWORDS, SOFT_SKILL_KEYWORDS)
    }
}

impl Vocabulary {
    /// Builds a vocabulary, lower-casing terms and dropping duplicates
    pub fn new(technical: &[&str], soft_skills: &[&str]) -> Self {
        Self {
            technical: dedup_terms(technical.iter().copied()),
            soft_skills: dedup_terms(soft_skills.iter().copied()),
        }
    }
}

fn dedup_terms<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}
