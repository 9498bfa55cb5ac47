// Exam generation: prompt + single structured model call, the background task
// that runs extraction then generation, and the bounded queue in front of it.

pub mod exam_generator;
pub mod handlers;
pub mod prompts;
pub mod queue;
pub mod task;
