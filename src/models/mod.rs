pub mod grading;
pub mod image;
pub mod job;

pub use grading::{GradingResult, Issue};
pub use image::ImageFile;
pub use job::{Job, JobId, JobPhase, JobStatus, SubmitResponse};
