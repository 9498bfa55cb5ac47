// Finalize: consolidate profile + answer batches, write the scored report,
// bundle the session into an archive.

pub mod archive;
pub mod consolidate;
pub mod finalize;
pub mod handlers;
pub mod prompts;
pub mod report;
