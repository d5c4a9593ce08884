mod persona;
mod pipeline;
pub mod fsm;
pub mod prompts;

pub use fsm::{PipelineEvent, PipelineState, PipelineStateMachine};
pub use persona::{Persona, Stage};
pub use pipeline::ResumePipeline;
pub use prompts::{JobAnalysis, ResumeDraft};
