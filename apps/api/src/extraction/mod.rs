// Document & skill extraction: resume bytes + job requirements -> SkillsProfile.
// Text extraction never fails the pipeline; the model call does.

pub mod prompts;
pub mod resume_text;
pub mod skills;
