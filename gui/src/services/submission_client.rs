// Hands validated inquiries off to the site owner's inbox. The desktop build appends
// each submission as one JSON line; a mail or HTTP relay reads the file from there.
use anyhow::{Context, Result};
use site_shared::models::FormSubmission;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionClient {
    outbox: PathBuf,
}

impl SubmissionClient {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self { outbox: outbox.into() }
    }

    pub async fn submit(&self, submission: FormSubmission) -> Result<()> {
        if let Some(parent) = self.outbox.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut line = serde_json::to_string(&submission)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.outbox)
            .await
            .with_context(|| format!("opening {}", self.outbox.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        tracing::info!(id = %submission.id, form = %submission.form_id, "Inquiry queued for delivery");
        Ok(())
    }
}
