// Answer collection: three independent batches per candidate, each overwritten
// wholesale on resubmission (last write wins).

pub mod collector;
pub mod handlers;
