use super::persona::Stage;
use crate::{Error, Result};
use tracing::{debug, info, warn};

// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Analyzing,
    Drafting,
    Reviewing,
    Done,
    Failed,
}

// Pipeline events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    StageCompleted,
    StageFailed,
}

/// Tracks a single generation run through analyze, draft and review.
pub struct PipelineStateMachine {
    state: PipelineState,
    completed: Vec<Stage>,
}

impl PipelineStateMachine {
    pub fn new() -> Self {
        debug!("Creating pipeline state machine");
        Self {
            state: PipelineState::Analyzing,
            completed: Vec::new(),
        }
    }

    pub fn current_state(&self) -> PipelineState {
        self.state
    }

    /// Stage that should run next, or `None` once the run is over.
    pub fn current_stage(&self) -> Option<Stage> {
        match self.state {
            PipelineState::Analyzing => Some(Stage::Analyze),
            PipelineState::Drafting => Some(Stage::Draft),
            PipelineState::Reviewing => Some(Stage::Review),
            PipelineState::Done | PipelineState::Failed => None,
        }
    }

    pub fn completed_stages(&self) -> &[Stage] {
        &self.completed
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, PipelineState::Done | PipelineState::Failed)
    }

    pub fn transition(&mut self, event: PipelineEvent) -> Result<()> {
        let old_state = self.state;

        let new_state = match (old_state, event) {
            (PipelineState::Analyzing, PipelineEvent::StageCompleted) => PipelineState::Drafting,
            (PipelineState::Drafting, PipelineEvent::StageCompleted) => PipelineState::Reviewing,
            (PipelineState::Reviewing, PipelineEvent::StageCompleted) => PipelineState::Done,
            (
                PipelineState::Analyzing | PipelineState::Drafting | PipelineState::Reviewing,
                PipelineEvent::StageFailed,
            ) => PipelineState::Failed,
            _ => {
                warn!(
                    "Invalid pipeline transition from {:?} with event {:?}",
                    old_state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{old_state:?}"),
                    requested: format!("{event:?}"),
                });
            }
        };

        if event == PipelineEvent::StageCompleted {
            if let Some(stage) = self.current_stage() {
                self.completed.push(stage);
            }
        }

        info!(
            "Pipeline state transition: {:?} -> {:?} (event: {:?})",
            old_state, new_state, event
        );
        self.state = new_state;
        Ok(())
    }
}

impl Default for PipelineStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
