//! Background-job hand-off.
//!
//! The gate decides *whether* an image job runs; the outbox only records
//! the intent. Hosts wire the outbox to whatever worker machinery they
//! run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repos::RepoError;

/// A serializable description of work to perform out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum JobDescriptor {
    GenerateSocialImage { entry_id: Uuid, site: String },
}

impl JobDescriptor {
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::GenerateSocialImage { .. } => "generate_social_image",
        }
    }
}

/// Synchronous hand-off point for job descriptors.
pub trait JobOutbox: Send + Sync {
    fn enqueue(&self, job: JobDescriptor) -> Result<(), RepoError>;
}
