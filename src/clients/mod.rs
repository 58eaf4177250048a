pub mod backend;
pub mod error;
pub mod grade_client;

pub use backend::GradingBackend;
pub use error::ApiError;
pub use grade_client::GradeClient;
