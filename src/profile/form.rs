use super::types::{CandidateProfile, EducationEntry, ExperienceEntry, ProjectEntry};
use crate::{Error, Result};
use tracing::debug;

/// Ordered multimap of URL-encoded form fields. Repeated keys such as
/// `experience_title[]` keep every value in submission order.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `name`, trimmed, or an empty string.
    pub fn get(&self, name: &str) -> String {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.trim().to_string())
            .unwrap_or_default()
    }

    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.trim().to_string())
            .collect()
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

/// Value at `index` of a parallel array, or `default` when the array is short.
fn nth_or(values: &[String], index: usize, default: &str) -> String {
    values
        .get(index)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

impl CandidateProfile {
    /// Builds and validates a profile from the submitted form.
    ///
    /// Entry groups are zipped by position with their primary field
    /// (title, degree, name); an entry whose primary field is blank is dropped
    /// whatever its other fields hold.
    pub fn from_form(form: &FormFields) -> Result<Self> {
        let profile = Self {
            full_name: form.get("full_name"),
            email: form.get("email"),
            phone: form.get("phone"),
            location: form.get("location"),
            linkedin: form.get("linkedin"),
            portfolio: form.get("portfolio"),
            target_position: form.get("target_position"),
            target_industry: form.get("target_industry"),
            job_description: form.get("job_description"),
            current_summary: form.get("current_summary"),
            years_experience: form.get("years_experience"),
            career_level: form.get("career_level"),
            technical_skills: form.get("technical_skills"),
            soft_skills: form.get("soft_skills"),
            certifications: form.get("certifications"),
            languages: form.get("languages"),
            achievements: form.get("achievements"),
            additional_info: form.get("additional_info"),
            experience: experience_entries(form),
            education: education_entries(form),
            projects: project_entries(form),
        };

        debug!(
            "Parsed profile with {} experience, {} education, {} project entries",
            profile.experience.len(),
            profile.education.len(),
            profile.projects.len()
        );

        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(Error::validation("Full name is required"));
        }
        if self.job_description.trim().is_empty() {
            return Err(Error::validation("Job description is required"));
        }
        Ok(())
    }
}

fn experience_entries(form: &FormFields) -> Vec<ExperienceEntry> {
    let titles = form.get_all("experience_title[]");
    let companies = form.get_all("experience_company[]");
    let starts = form.get_all("experience_start[]");
    let ends = form.get_all("experience_end[]");
    let descriptions = form.get_all("experience_description[]");

    titles
        .iter()
        .enumerate()
        .filter(|(_, title)| !title.is_empty())
        .map(|(i, title)| ExperienceEntry {
            title: title.clone(),
            company: nth_or(&companies, i, ""),
            start_date: nth_or(&starts, i, ""),
            end_date: nth_or(&ends, i, "Present"),
            description: nth_or(&descriptions, i, ""),
        })
        .collect()
}

fn education_entries(form: &FormFields) -> Vec<EducationEntry> {
    let degrees = form.get_all("education_degree[]");
    let schools = form.get_all("education_school[]");
    let years = form.get_all("education_year[]");
    let gpas = form.get_all("education_gpa[]");

    degrees
        .iter()
        .enumerate()
        .filter(|(_, degree)| !degree.is_empty())
        .map(|(i, degree)| EducationEntry {
            degree: degree.clone(),
            school: nth_or(&schools, i, ""),
            year: nth_or(&years, i, ""),
            gpa: nth_or(&gpas, i, ""),
        })
        .collect()
}

fn project_entries(form: &FormFields) -> Vec<ProjectEntry> {
    let names = form.get_all("project_name[]");
    let technologies = form.get_all("project_tech[]");
    let descriptions = form.get_all("project_description[]");
    let urls = form.get_all("project_url[]");

    names
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(i, name)| ProjectEntry {
            name: name.clone(),
            technologies: nth_or(&technologies, i, ""),
            description: nth_or(&descriptions, i, ""),
            url: nth_or(&urls, i, ""),
        })
        .collect()
}

/// Attachment name for a downloaded resume: `<Full_Name>_ATS_optimized.txt`.
pub fn download_filename(full_name: &str) -> String {
    let cleaned: String = full_name
        .trim()
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    let stem = if cleaned.is_empty() {
        "resume"
    } else {
        cleaned.as_str()
    };
    format!("{stem}_ATS_optimized.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn base_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("full_name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("job_description", "Requirements\nPython"),
        ]
    }

    #[test]
    fn test_flat_fields() {
        let mut pairs = base_pairs();
        pairs.push(("target_position", "  Backend Engineer "));
        pairs.push(("certifications", "AWS SAA"));
        let profile = CandidateProfile::from_form(&form(&pairs)).unwrap();

        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.target_position, "Backend Engineer");
        assert_eq!(profile.certifications, "AWS SAA");
        assert_eq!(profile.phone, "");
    }

    #[test]
    fn test_blank_primary_field_drops_entry() {
        let mut pairs = base_pairs();
        pairs.extend([
            ("experience_title[]", "Engineer"),
            ("experience_company[]", "Analytical Engines"),
            ("experience_start[]", "1842"),
            ("experience_end[]", "1843"),
            ("experience_description[]", "Wrote the first program"),
            ("experience_title[]", "   "),
            ("experience_company[]", "Ghost Corp"),
            ("experience_start[]", "1850"),
            ("experience_end[]", "1851"),
            ("experience_description[]", "Should not appear"),
        ]);
        let profile = CandidateProfile::from_form(&form(&pairs)).unwrap();

        assert_eq!(
            profile.experience,
            vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Analytical Engines".to_string(),
                start_date: "1842".to_string(),
                end_date: "1843".to_string(),
                description: "Wrote the first program".to_string(),
            }]
        );
    }

    #[test]
    fn test_entries_stay_aligned_by_index() {
        let mut pairs = base_pairs();
        pairs.extend([
            ("education_degree[]", ""),
            ("education_school[]", "Skipped School"),
            ("education_degree[]", "BSc Mathematics"),
            ("education_school[]", "University of London"),
            ("education_year[]", "1830"),
            ("education_year[]", "1835"),
        ]);
        let profile = CandidateProfile::from_form(&form(&pairs)).unwrap();

        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.education[0].degree, "BSc Mathematics");
        assert_eq!(profile.education[0].school, "University of London");
        assert_eq!(profile.education[0].year, "1835");
        assert_eq!(profile.education[0].gpa, "");
    }

    #[test]
    fn test_missing_end_date_defaults_to_present() {
        let mut pairs = base_pairs();
        pairs.push(("experience_title[]", "Consultant"));
        let profile = CandidateProfile::from_form(&form(&pairs)).unwrap();

        assert_eq!(profile.experience[0].end_date, "Present");
        assert_eq!(profile.experience[0].company, "");
    }

    #[test]
    fn test_projects() {
        let mut pairs = base_pairs();
        pairs.extend([
            ("project_name[]", "Note G"),
            ("project_tech[]", "Punch cards"),
            ("project_description[]", "Bernoulli numbers"),
            ("project_url[]", "https://example.com/note-g"),
            ("project_name[]", ""),
            ("project_tech[]", "Unused"),
        ]);
        let profile = CandidateProfile::from_form(&form(&pairs)).unwrap();

        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.projects[0].technologies, "Punch cards");
        assert_eq!(profile.projects[0].url, "https://example.com/note-g");
    }

    #[rstest]
    #[case("full_name", "Full name is required")]
    #[case("job_description", "Job description is required")]
    fn test_required_fields(#[case] missing: &str, #[case] message: &str) {
        let pairs: Vec<_> = base_pairs()
            .into_iter()
            .filter(|(k, _)| *k != missing)
            .collect();
        let err = CandidateProfile::from_form(&form(&pairs)).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    #[case("Ada Lovelace", "Ada_Lovelace_ATS_optimized.txt")]
    #[case("  Grace  Hopper ", "Grace__Hopper_ATS_optimized.txt")]
    #[case("", "resume_ATS_optimized.txt")]
    #[case("Bobby \"Tables\"", "Bobby_Tables_ATS_optimized.txt")]
    #[case("José Núñez", "José_Núñez_ATS_optimized.txt")]
    fn test_download_filename(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(download_filename(name), expected);
    }
}
