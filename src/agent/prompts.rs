use super::persona::Stage;
use crate::profile::{CandidateProfile, EducationEntry, ExperienceEntry, ProjectEntry};
use std::fmt::Write;

/// Output of the analyze step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobAnalysis(pub String);

/// Output of the draft step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDraft(pub String);

pub fn analyze_instructions(profile: &CandidateProfile) -> String {
    let body = format!(
        "Analyze the following job description and extract:
1. Key technical skills and technologies
2. Required qualifications and experience levels
3. Important keywords that should appear in the resume
4. Soft skills mentioned in the job posting
5. Company culture indicators

Job Description:
{}

Target Position: {}
Target Industry: {}",
        profile.job_description, profile.target_position, profile.target_industry
    );
    with_expected_output(body, Stage::Analyze)
}

pub fn draft_instructions(profile: &CandidateProfile) -> String {
    let body = format!(
        "Create an ATS-optimized resume using the job analysis from the previous step and the following candidate information:

Personal Information:
- Name: {}
- Email: {}
- Phone: {}
- Location: {}
- LinkedIn: {}
- Portfolio: {}

Experience Level: {} years
Career Level: {}

Work Experience:
{}
Education:
{}
Technical Skills: {}
Soft Skills: {}
Projects:
{}
Certifications: {}
Languages: {}
Achievements: {}
Additional Info: {}
Current Summary: {}

Requirements:
1. Create a compelling professional summary that incorporates job-specific keywords
2. Optimize work experience descriptions with action verbs and quantified achievements
3. Ensure skills section matches job requirements
4. Use ATS-friendly formatting
5. Include relevant keywords naturally throughout the resume
6. Structure the resume for maximum ATS compatibility",
        profile.full_name,
        profile.email,
        profile.phone,
        profile.location,
        profile.linkedin,
        profile.portfolio,
        profile.years_experience,
        profile.career_level,
        format_experience(&profile.experience),
        format_education(&profile.education),
        profile.technical_skills,
        profile.soft_skills,
        format_projects(&profile.projects),
        profile.certifications,
        profile.languages,
        profile.achievements,
        profile.additional_info,
        profile.current_summary,
    );
    with_expected_output(body, Stage::Draft)
}

pub fn review_instructions() -> String {
    let body = "Review the generated resume and ensure:
1. ATS compatibility (proper formatting, keyword density, structure)
2. Grammar and consistency
3. Professional presentation
4. Keyword optimization without over-stuffing
5. Quantified achievements where possible
6. Proper contact information formatting
7. Industry-appropriate language and terminology

Provide the final, polished resume ready for submission."
        .to_string();
    with_expected_output(body, Stage::Review)
}

pub fn draft_context(analysis: &JobAnalysis) -> String {
    format!("Job analysis:\n{}", analysis.0)
}

pub fn review_context(analysis: &JobAnalysis, draft: &ResumeDraft) -> String {
    format!("Job analysis:\n{}\n\nResume draft:\n{}", analysis.0, draft.0)
}

fn with_expected_output(mut body: String, stage: Stage) -> String {
    body.push_str("\n\nExpected output: ");
    body.push_str(stage.expected_output());
    body
}

fn format_experience(entries: &[ExperienceEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "- {} at {} ({} - {}): {}",
            entry.title, entry.company, entry.start_date, entry.end_date, entry.description
        );
    }
    or_none(out)
}

fn format_education(entries: &[EducationEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "- {}, {} ({})", entry.degree, entry.school, entry.year);
        if !entry.gpa.is_empty() {
            let _ = write!(out, ", GPA {}", entry.gpa);
        }
        out.push('\n');
    }
    or_none(out)
}

fn format_projects(entries: &[ProjectEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "- {} [{}]: {}", entry.name, entry.technologies, entry.description);
        if !entry.url.is_empty() {
            let _ = write!(out, " ({})", entry.url);
        }
        out.push('\n');
    }
    or_none(out)
}

fn or_none(out: String) -> String {
    if out.is_empty() {
        "- None provided\n".to_string()
    } else {
        out
    }
}
