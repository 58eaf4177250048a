pub mod poller;
pub mod report_writer;
pub mod results_renderer;
pub mod upload;

pub use poller::{PollEvent, PollHandle, StatusPoller};
pub use report_writer::ReportWriter;
pub use results_renderer::{GradeTier, IssuesView, RenderedResults};
pub use upload::{UploadComponent, UploadInteraction, UploadOutcome};
