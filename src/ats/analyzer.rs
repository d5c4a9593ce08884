use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Technology and tool names recognised in job descriptions, in canonical spelling.
pub const TECH_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "React",
    "Django",
    "Flask",
    "AWS",
    "Azure",
    "Docker",
    "Kubernetes",
    "SQL",
    "NoSQL",
    "Git",
    "Agile",
    "Scrum",
];

/// Degree-level terms, in canonical spelling.
pub const DEGREE_TERMS: &[&str] = &["Bachelor", "Master", "PhD", "degree"];

const REQUIREMENT_HEADERS: &[&str] = &["requirements", "qualifications", "must have"];
const SKILL_HEADERS: &[&str] = &["skills", "technologies", "experience with"];

static TECH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| word_list_pattern(TECH_VOCABULARY).expect("invalid technology pattern"));

static DURATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+\+?\s*years?)\b").expect("invalid duration pattern"));

static DEGREE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| word_list_pattern(DEGREE_TERMS).expect("invalid degree pattern"));

fn word_list_pattern(words: &[&str]) -> std::result::Result<Regex, regex::Error> {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b"))
}

/// Keywords, skill lines and requirement lines pulled out of a job description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptionAnalysis {
    /// Unique case-insensitively, in order of first match.
    pub keywords: Vec<String>,
    pub skills: Vec<String>,
    pub requirements: Vec<String>,
}

impl JobDescriptionAnalysis {
    pub fn estimated_keywords(&self) -> usize {
        self.keywords.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Requirements,
    Skills,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        if REQUIREMENT_HEADERS.iter().any(|h| lower.contains(h)) {
            Some(Section::Requirements)
        } else if SKILL_HEADERS.iter().any(|h| lower.contains(h)) {
            Some(Section::Skills)
        } else {
            None
        }
    }
}

/// Analyzes raw job-description text.
///
/// Fails only when the text is empty or blank. Lines that follow a
/// requirements header ("requirements", "qualifications", "must have") or a
/// skills header ("skills", "technologies", "experience with") are collected
/// verbatim until the next header; header lines themselves are not kept.
pub fn analyze_job_description(text: &str) -> Result<JobDescriptionAnalysis> {
    if text.trim().is_empty() {
        return Err(Error::validation("Job description is required"));
    }

    let (skills, requirements) = extract_sections(text);
    let keywords = extract_keywords(text);

    debug!(
        "Job description analysis: {} keywords, {} skills, {} requirements",
        keywords.len(),
        skills.len(),
        requirements.len()
    );

    Ok(JobDescriptionAnalysis {
        keywords,
        skills,
        requirements,
    })
}

/// Same as [`analyze_job_description`] for raw bytes; invalid UTF-8 is replaced
/// rather than rejected.
pub fn analyze_job_description_bytes(bytes: &[u8]) -> Result<JobDescriptionAnalysis> {
    analyze_job_description(&String::from_utf8_lossy(bytes))
}

fn extract_sections(text: &str) -> (Vec<String>, Vec<String>) {
    let mut skills = Vec::new();
    let mut requirements = Vec::new();
    let mut current = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if let Some(section) = Section::from_header(line) {
            current = Some(section);
            continue;
        }
        if line.is_empty() {
            continue;
        }
        match current {
            Some(Section::Requirements) => requirements.push(line.to_string()),
            Some(Section::Skills) => skills.push(line.to_string()),
            None => {}
        }
    }

    (skills, requirements)
}

fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    let mut push = |keyword: String| {
        if seen.insert(keyword.to_lowercase()) {
            keywords.push(keyword);
        }
    };

    for m in TECH_PATTERN.find_iter(text) {
        push(canonical(TECH_VOCABULARY, m.as_str()));
    }
    for m in DURATION_PATTERN.find_iter(text) {
        push(m.as_str().to_string());
    }
    for m in DEGREE_PATTERN.find_iter(text) {
        push(canonical(DEGREE_TERMS, m.as_str()));
    }

    keywords
}

fn canonical(vocabulary: &[&str], matched: &str) -> String {
    vocabulary
        .iter()
        .find(|term| term.eq_ignore_ascii_case(matched))
        .map(|term| term.to_string())
        .unwrap_or_else(|| matched.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_example_posting() {
        let analysis =
            analyze_job_description("Requirements:\n3+ years Python\nSkills:\nDjango, AWS").unwrap();

        assert_eq!(analysis.requirements, vec!["3+ years Python"]);
        assert_eq!(analysis.skills, vec!["Django, AWS"]);
        assert_eq!(analysis.keywords, vec!["Python", "Django", "AWS", "3+ years"]);
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t  ")]
    fn test_blank_text_is_rejected(#[case] text: &str) {
        let err = analyze_job_description(text).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg == "Job description is required"));
    }

    #[rstest]
    #[case("REQUIREMENTS")]
    #[case("Minimum Qualifications:")]
    #[case("What you must have")]
    fn test_requirement_headers(#[case] header: &str) {
        let text = format!("{header}\n  Ships code weekly  \n\nOwns on-call\n");
        let analysis = analyze_job_description(&text).unwrap();
        assert_eq!(analysis.requirements, vec!["Ships code weekly", "Owns on-call"]);
        assert!(analysis.skills.is_empty());
    }

    #[rstest]
    #[case("Skills")]
    #[case("Technologies we use")]
    #[case("Experience with:")]
    fn test_skill_headers(#[case] header: &str) {
        let text = format!("{header}\nTerraform\n");
        let analysis = analyze_job_description(&text).unwrap();
        assert_eq!(analysis.skills, vec!["Terraform"]);
        assert!(analysis.requirements.is_empty());
    }

    #[test]
    fn test_no_headers_still_yields_keywords() {
        let analysis =
            analyze_job_description("We run Kubernetes and docker on Azure.").unwrap();
        assert!(analysis.skills.is_empty());
        assert!(analysis.requirements.is_empty());
        assert_eq!(analysis.keywords, vec!["Kubernetes", "Docker", "Azure"]);
    }

    #[test]
    fn test_lines_before_first_header_are_ignored() {
        let analysis =
            analyze_job_description("About us\nWe are growing\nRequirements\nBe kind").unwrap();
        assert_eq!(analysis.requirements, vec!["Be kind"]);
    }

    #[test]
    fn test_requirements_header_wins_over_skills_on_same_line() {
        let analysis =
            analyze_job_description("Requirements and skills\nRust").unwrap();
        assert_eq!(analysis.requirements, vec!["Rust"]);
        assert!(analysis.skills.is_empty());
    }

    #[test]
    fn test_keywords_dedup_case_insensitively() {
        let analysis = analyze_job_description(
            "python, PYTHON and Python. 5 years or 5 Years. A bachelor or Bachelor degree.",
        )
        .unwrap();
        assert_eq!(
            analysis.keywords,
            vec!["Python", "5 years", "Bachelor", "degree"]
        );
    }

    #[test]
    fn test_java_and_javascript_are_distinct() {
        let analysis = analyze_job_description("JavaScript and Java").unwrap();
        assert_eq!(analysis.keywords, vec!["JavaScript", "Java"]);
    }

    #[test]
    fn test_partial_words_do_not_match() {
        let analysis = analyze_job_description("Gitlab, Reactive, Masters").unwrap();
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Qualifications\nPhD preferred\nSkills\nSQL, NoSQL, Git\nAgile/Scrum";
        let first = analyze_job_description(text).unwrap();
        let second = analyze_job_description(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_ascii_text_is_opaque() {
        let analysis =
            analyze_job_description("Compétences requises — Skills\nSQL avancé ✓\n日本語").unwrap();
        assert_eq!(analysis.skills, vec!["SQL avancé ✓", "日本語"]);
        assert_eq!(analysis.keywords, vec!["SQL"]);
    }

    #[test]
    fn test_invalid_utf8_bytes_are_replaced() {
        let bytes = b"Requirements\nDocker \xff\xfe";
        let analysis = analyze_job_description_bytes(bytes).unwrap();
        assert_eq!(analysis.requirements.len(), 1);
        assert!(analysis.requirements[0].starts_with("Docker"));
        assert_eq!(analysis.keywords, vec!["Docker"]);
    }
}
