use crate::{
    Result,
    ats::{self, JobDescriptionAnalysis},
    profile::CandidateProfile,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One finished resume generation, owned by a single identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    #[serde(skip_serializing)]
    pub owner: String,
    pub full_name: String,
    pub email: String,
    pub target_position: String,
    pub target_industry: String,
    pub form_data: serde_json::Value,
    pub job_description: String,
    pub generated_resume: String,
    pub estimated_ats_score: u8,
    pub keywords_matched: u32,
    /// Keywords, skills and requirements extracted from the job description.
    pub analysis: JobDescriptionAnalysis,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    /// Scores `generated_resume` against `analysis` and stamps a new id.
    pub fn new(
        owner: String,
        profile: &CandidateProfile,
        generated_resume: String,
        analysis: JobDescriptionAnalysis,
    ) -> Result<Self> {
        let estimated_ats_score = ats::estimated_score(&analysis);
        let keywords_matched =
            u32::try_from(ats::keywords_matched(&analysis, &generated_resume)).unwrap_or(u32::MAX);

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            target_position: profile.target_position.clone(),
            target_industry: profile.target_industry.clone(),
            form_data: serde_json::to_value(profile)?,
            job_description: profile.job_description.clone(),
            generated_resume,
            estimated_ats_score,
            keywords_matched,
            analysis,
            recommendations: ats::SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        })
    }
}
