//! Constants Module - Single Source of Truth
//!
//! Keyword tables, weights and defaults used across the engine.
//! Other modules must not hardcode these values.

use serde::Serialize;

use crate::models::types::SectionKind;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "RusterATS";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = concat!("RusterATS/", env!("CARGO_PKG_VERSION"));

// ============================================
// RUNTIME DEFAULTS
// ============================================

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 10;
/// Matches the MiniLM sentence-embedding width
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;
pub const MAX_BATCH_CONCURRENCY: usize = 50;
pub const MAX_BATCH_ITEMS: usize = 100;
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_TELEMETRY_DIR: &str = "./telemetry";

/// Per-directory ignore file honoured by batch scoring
pub const ATS_IGNORE_FILENAME: &str = ".atsignore";

/// Resume file extensions picked up by batch scoring
pub const DEFAULT_RESUME_EXTENSIONS: [&str; 2] = ["txt", "md"];

// ============================================
// SCORE WEIGHTS
// ============================================

pub const WEIGHT_SECTIONS: f64 = 0.25;
pub const WEIGHT_KEYWORDS: f64 = 0.35;
pub const WEIGHT_FORMATTING: f64 = 0.20;
pub const WEIGHT_CONTEXT: f64 = 0.20;

/// Basic scoring discounts raw word overlap
pub const BASIC_SCORE_FACTOR: f64 = 0.8;

// ============================================
// SECTION KEYWORDS
// ============================================

/// Header/content keywords for each resume section
pub fn section_keywords(section: SectionKind) -> &'static [&'static str] {
    match section {
        SectionKind::Experience => &[
            "experience",
            "work history",
            "professional background",
            "employment",
            "work experience",
            "career history",
            "professional experience",
            "employment history",
            "work background",
            "professional journey",
        ],
        SectionKind::Education => &[
            "education",
            "academic",
            "qualification",
            "degree",
            "university",
            "college",
            "school",
            "certification",
            "academic background",
            "educational background",
            "academic qualifications",
            "degrees",
            "certifications",
            "training",
            "courses",
        ],
        SectionKind::Skills => &[
            "skills",
            "abilities",
            "competencies",
            "expertise",
            "proficiencies",
            "technical skills",
            "core competencies",
            "technical expertise",
            "professional skills",
            "key skills",
            "skill set",
            "capabilities",
            "technical proficiencies",
            "areas of expertise",
        ],
        SectionKind::Summary => &[
            "summary",
            "profile",
            "objective",
            "about me",
            "professional summary",
            "career objective",
            "professional profile",
            "executive summary",
            "career summary",
            "personal statement",
            "professional overview",
            "career profile",
            "professional statement",
        ],
        SectionKind::Projects => &[
            "projects",
            "portfolio",
            "project experience",
            "project history",
            "project work",
            "project portfolio",
            "project showcase",
            "project achievements",
            "project highlights",
            "project details",
        ],
        SectionKind::Achievements => &[
            "achievements",
            "accomplishments",
            "awards",
            "recognition",
            "honors",
            "certifications",
            "professional achievements",
            "key achievements",
            "notable accomplishments",
            "awards and recognition",
        ],
    }
}

/// Sections whose header lines earn the keyword context bonus
pub const KEYWORD_CONTEXT_SECTIONS: [&str; 3] = ["experience", "skills", "projects"];

/// Sections scanned for contextual relevance, with weights
pub const CONTEXT_SECTIONS: [(&str, f64); 4] = [
    ("experience", 0.4),
    ("project", 0.2),
    ("skill", 0.4),
    ("education", 0.2),
];

/// Sections the embedding report checks for
pub const REPORT_SECTIONS: [&str; 4] = ["education", "experience", "skills", "projects"];

// ============================================
// KEYWORD IMPORTANCE
// ============================================

pub const TECH_TERMS: [&str; 14] = [
    "python", "java", "javascript", "react", "aws", "cloud", "ml", "ai", "docker",
    "kubernetes", "sql", "nosql", "devops", "security",
];
pub const TECH_BONUS: f64 = 0.5;

pub const FRAMEWORK_TERMS: [&str; 10] = [
    "react", "angular", "vue", "django", "flask", "spring", "express", "tensorflow",
    "pytorch", "scikit-learn",
];
pub const FRAMEWORK_BONUS: f64 = 0.3;

pub const CLOUD_TERMS: [&str; 10] = [
    "aws", "azure", "gcp", "cloud", "s3", "ec2", "lambda", "kubernetes", "docker",
    "terraform",
];
pub const CLOUD_BONUS: f64 = 0.4;

// ============================================
// SKILL VOCABULARY
// ============================================

/// Skills recognised when extracting requirements and resume skills
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages
    "python", "java", "javascript", "typescript", "golang", "rust", "c++", "c#", "ruby",
    "php", "kotlin", "swift", "scala", "sql", "bash",
    // Frameworks / libraries
    "react", "angular", "vue", "node.js", "django", "flask", "fastapi", "spring",
    "express", "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy",
    // Data stores
    "postgresql", "mysql", "mongodb", "redis", "nosql", "elasticsearch", "kafka",
    // Cloud / infra
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "linux",
    "ci/cd", "jenkins", "git",
    // Practices
    "machine learning", "deep learning", "data analysis", "nlp", "computer vision",
    "rest api", "graphql", "microservices", "agile", "scrum", "devops", "security",
    "testing",
];

// ============================================
// EDUCATION
// ============================================

/// Degree level, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeLevel::HighSchool => "high school",
            DegreeLevel::Associate => "associate",
            DegreeLevel::Bachelor => "bachelor's",
            DegreeLevel::Master => "master's",
            DegreeLevel::Doctorate => "phd",
        }
    }
}

/// Regex fragments (case-insensitive) that indicate each degree level
pub const DEGREE_PATTERNS: [(DegreeLevel, &str); 5] = [
    (DegreeLevel::HighSchool, r"\b(?:high school|secondary school|ged)\b"),
    (DegreeLevel::Associate, r"\bassociate(?:'s)?\s+(?:degree|of)\b"),
    (
        DegreeLevel::Bachelor,
        r"\b(?:bachelor(?:'?s)?\b|b\.s\.|b\.sc\b|bsc\b|b\.a\.|b\.tech\b|undergraduate degree)",
    ),
    (
        DegreeLevel::Master,
        r"\b(?:master(?:'?s)?\b|m\.s\.|m\.sc\b|msc\b|m\.a\.|mba\b|m\.tech\b|graduate degree)",
    ),
    (DegreeLevel::Doctorate, r"\b(?:ph\.?d\.?|doctorate|doctoral)"),
];
