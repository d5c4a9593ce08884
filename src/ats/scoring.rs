use super::JobDescriptionAnalysis;

/// Fixed advice returned alongside every analysis.
pub const SUGGESTIONS: [&str; 4] = [
    "Include these key skills in your resume",
    "Use exact job title from the posting",
    "Quantify your achievements with numbers",
    "Match the company's language and terminology",
];

const KEYWORD_WEIGHT: usize = 5;
const SKILL_WEIGHT: usize = 3;
const MAX_SCORE: usize = 100;

/// Heuristic ATS score: `min(100, 5 * keywords + 3 * skill lines)`.
///
/// Kept linear so stored scores stay comparable with earlier records.
pub fn estimated_score(analysis: &JobDescriptionAnalysis) -> u8 {
    let raw = analysis.keywords.len() * KEYWORD_WEIGHT + analysis.skills.len() * SKILL_WEIGHT;
    raw.min(MAX_SCORE) as u8
}

/// Number of analysis keywords that appear in `resume_text`, ignoring case.
pub fn keywords_matched(analysis: &JobDescriptionAnalysis, resume_text: &str) -> usize {
    let haystack = resume_text.to_lowercase();
    analysis
        .keywords
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .count()
}
