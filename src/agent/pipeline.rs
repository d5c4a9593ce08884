use super::fsm::{PipelineEvent, PipelineStateMachine};
use super::persona::Stage;
use super::prompts::{self, JobAnalysis, ResumeDraft};
use crate::{
    Error, Result,
    config::{LlmConfig, PipelineConfig},
    llm::{LlmClient, OpenAiClient},
    profile::CandidateProfile,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Runs analyze, draft and review against the LLM, strictly in sequence.
///
/// Holds no per-run state, so one instance serves concurrent requests.
pub struct ResumePipeline {
    llm_client: Arc<dyn LlmClient>,
    request_timeout: Duration,
}

impl ResumePipeline {
    pub fn new(llm_client: Arc<dyn LlmClient>, request_timeout: Duration) -> Self {
        Self {
            llm_client,
            request_timeout,
        }
    }

    pub fn from_config(llm_config: LlmConfig, pipeline_config: &PipelineConfig) -> Self {
        info!(
            "Initializing resume pipeline with model '{}' ({}s per call)",
            llm_config.model, pipeline_config.request_timeout_secs
        );
        let client = OpenAiClient::new(llm_config).with_pipeline_options(pipeline_config);
        Self::new(
            Arc::new(client),
            Duration::from_secs(pipeline_config.request_timeout_secs),
        )
    }

    /// Generates the final resume text. The first failing stage aborts the run;
    /// nothing from earlier stages is returned.
    pub async fn run(&self, profile: &CandidateProfile) -> Result<String> {
        let start_time = Instant::now();
        info!("Starting resume pipeline for '{}'", profile.full_name);
        let mut fsm = PipelineStateMachine::new();

        let analysis = JobAnalysis(
            self.run_stage(
                &mut fsm,
                Stage::Analyze,
                &prompts::analyze_instructions(profile),
                "",
            )
            .await?,
        );

        let draft = ResumeDraft(
            self.run_stage(
                &mut fsm,
                Stage::Draft,
                &prompts::draft_instructions(profile),
                &prompts::draft_context(&analysis),
            )
            .await?,
        );

        let resume = self
            .run_stage(
                &mut fsm,
                Stage::Review,
                &prompts::review_instructions(),
                &prompts::review_context(&analysis, &draft),
            )
            .await?;

        info!(
            "Resume pipeline completed {} stages in {:?} ({} chars)",
            fsm.completed_stages().len(),
            start_time.elapsed(),
            resume.len()
        );
        Ok(resume)
    }

    async fn run_stage(
        &self,
        fsm: &mut PipelineStateMachine,
        stage: Stage,
        instructions: &str,
        context: &str,
    ) -> Result<String> {
        if fsm.is_terminal() {
            return Err(Error::pipeline(format!(
                "stage {stage} requested after the run ended in {:?}",
                fsm.current_state()
            )));
        }
        if fsm.current_stage() != Some(stage) {
            return Err(Error::pipeline(format!(
                "stage {stage} requested in state {:?}",
                fsm.current_state()
            )));
        }

        let persona = stage.persona();
        debug!("Running {} stage as {}", stage, persona.role());

        let stage_start = Instant::now();
        let outcome = tokio::time::timeout(
            self.request_timeout,
            self.llm_client
                .complete(&persona.system_prompt(), instructions, context),
        )
        .await;

        match outcome {
            Ok(Ok(text)) => {
                info!(
                    "Stage {} finished in {:?} ({} chars)",
                    stage,
                    stage_start.elapsed(),
                    text.len()
                );
                fsm.transition(PipelineEvent::StageCompleted)?;
                Ok(text)
            }
            Ok(Err(e)) => {
                error!("Stage {} failed: {}", stage, e);
                fsm.transition(PipelineEvent::StageFailed)?;
                Err(Error::generation(stage.name(), e.to_string()))
            }
            Err(_) => {
                error!(
                    "Stage {} timed out after {:?}",
                    stage, self.request_timeout
                );
                fsm.transition(PipelineEvent::StageFailed)?;
                Err(Error::generation(
                    stage.name(),
                    format!(
                        "LLM call timed out after {} seconds",
                        self.request_timeout.as_secs()
                    ),
                ))
            }
        }
    }
}
