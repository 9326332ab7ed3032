//! Submitter that writes the registration payload to a file

use async_trait::async_trait;
use dorm_wizard::submission::{
    RegistrationId, RegistrationPayload, RegistrationSubmitter, SubmissionError,
};
use dorm_wizard::RegistrationDraft;
use std::path::PathBuf;

pub struct FileSubmitter {
    out: PathBuf,
}

impl FileSubmitter {
    pub fn new(out: PathBuf) -> Self {
        Self { out }
    }
}

#[async_trait]
impl RegistrationSubmitter for FileSubmitter {
    async fn submit(&self, draft: &RegistrationDraft) -> Result<RegistrationId, SubmissionError> {
        let payload = RegistrationPayload::from_draft(draft);
        let body = serde_json::to_string_pretty(&payload)
            .map_err(|e| SubmissionError::encoding(&e.to_string()))?;

        std::fs::write(&self.out, body).map_err(|e| {
            SubmissionError::unavailable(&format!("{}: {}", self.out.display(), e))
        })?;

        let id = RegistrationId::new(uuid::Uuid::new_v4().to_string());
        log::info!("Payload written to {} as {}", self.out.display(), id);
        Ok(id)
    }
}
