pub mod answers;
pub mod exam;
pub mod job;
pub mod profile;
