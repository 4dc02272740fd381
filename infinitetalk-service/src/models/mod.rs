pub mod job;

pub use job::{Job, JobStatus, AUDIO_FILE_NAME, IMAGE_FILE_NAME};
