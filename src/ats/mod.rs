//! Job-description keyword and requirement extraction.

mod analyzer;
mod scoring;

pub use analyzer::{
    DEGREE_TERMS, JobDescriptionAnalysis, TECH_VOCABULARY, analyze_job_description,
    analyze_job_description_bytes,
};
pub use scoring::{SUGGESTIONS, estimated_score, keywords_matched};
