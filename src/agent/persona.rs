use std::fmt;

/// The three specialists that take turns on a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    AtsSpecialist,
    ResumeWriter,
    QualityReviewer,
}

impl Persona {
    pub fn role(&self) -> &'static str {
        match self {
            Persona::AtsSpecialist => "ATS Optimization Specialist",
            Persona::ResumeWriter => "Professional Resume Writer",
            Persona::QualityReviewer => "Resume Quality Assurance Specialist",
        }
    }

    pub fn goal(&self) -> &'static str {
        match self {
            Persona::AtsSpecialist => {
                "Analyze job descriptions and optimize resumes for ATS systems"
            }
            Persona::ResumeWriter => "Create compelling and professional resume content",
            Persona::QualityReviewer => {
                "Review and improve resume quality and ATS compatibility"
            }
        }
    }

    pub fn backstory(&self) -> &'static str {
        match self {
            Persona::AtsSpecialist => {
                "You are an expert in Applicant Tracking Systems (ATS) and resume optimization. \
                 You understand how ATS systems parse and rank resumes, and you know the best \
                 practices for keyword optimization, formatting, and content structure to achieve \
                 high ATS scores."
            }
            Persona::ResumeWriter => {
                "You are a professional resume writer with 10+ years of experience. You excel at \
                 crafting compelling professional summaries, quantifying achievements, and \
                 presenting experience in the most impactful way. You know how to highlight \
                 transferable skills and make candidates stand out while maintaining professional \
                 standards."
            }
            Persona::QualityReviewer => {
                "You are a meticulous quality assurance specialist who reviews resumes for \
                 grammar, consistency, ATS compatibility, and overall impact. You ensure that \
                 resumes meet industry standards and will perform well in both ATS systems and \
                 human review."
            }
        }
    }

    /// System message sent with every call made under this persona.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}.\nYour goal: {}.\n\n{}",
            self.role(),
            self.goal(),
            self.backstory()
        )
    }
}

/// A step of the generation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Draft,
    Review,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Analyze, Stage::Draft, Stage::Review];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Analyze => "analyze",
            Stage::Draft => "draft",
            Stage::Review => "review",
        }
    }

    pub fn persona(&self) -> Persona {
        match self {
            Stage::Analyze => Persona::AtsSpecialist,
            Stage::Draft => Persona::ResumeWriter,
            Stage::Review => Persona::QualityReviewer,
        }
    }

    pub fn expected_output(&self) -> &'static str {
        match self {
            Stage::Analyze => {
                "A detailed analysis of job requirements and ATS optimization keywords"
            }
            Stage::Draft => "A complete, ATS-optimized resume in professional format",
            Stage::Review => "A final, polished, ATS-optimized resume",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
