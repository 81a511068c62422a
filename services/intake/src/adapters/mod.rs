pub mod file_store;
pub mod guidance_llm;
pub mod guidance_schema;
pub mod report_pdf;

pub use file_store::JsonFileStore;
pub use guidance_llm::{GuidanceSettings, OpenAiGuidanceAdapter};
pub use report_pdf::{export_report, render_history_report, ReportError};
