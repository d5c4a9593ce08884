use crate::ats::JobDescriptionAnalysis;
use crate::history::GenerationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    /// `null` and a missing key are both treated as blank.
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub success: bool,
    pub analysis: JobDescriptionAnalysis,
    pub estimated_keywords: usize,
    pub estimated_score: u8,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub resume_text: String,
    pub estimated_score: u8,
    pub keywords_matched: u32,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: String,
    pub full_name: String,
    pub target_position: String,
    pub target_industry: String,
    pub estimated_ats_score: u8,
    pub keywords_matched: u32,
    pub created_at: DateTime<Utc>,
}

impl From<GenerationRecord> for HistoryItem {
    fn from(record: GenerationRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            target_position: record.target_position,
            target_industry: record.target_industry,
            estimated_ats_score: record.estimated_ats_score,
            keywords_matched: record.keywords_matched,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
