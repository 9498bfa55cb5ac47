// Workflow tests driving the real router against a scripted model and a temp storage root.

pub(crate) mod support;

mod workflow;
