//! Input handling
//! File detection, CV upload selection and job description loading

pub mod file_detector;
pub mod upload;

pub use upload::{read_job_description, UploadSelection};
