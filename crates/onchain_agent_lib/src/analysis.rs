use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::time::Duration;

use crate::err_custom_create;
use crate::error::AgentError;
use crate::model::TransactionSummary;

pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub tx_hash: String,
    /// Credential of the text generation service, never stored
    pub api_key: String,
}

impl SummaryRequest {
    pub fn new(tx_hash: impl Into<String>, api_key: impl Into<String>) -> Self {
        SummaryRequest {
            tx_hash: tx_hash.into(),
            api_key: api_key.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.tx_hash.trim().is_empty() || self.api_key.trim().is_empty() {
            return Err(err_custom_create!(
                "Please provide both transaction hash and API key."
            ));
        }
        Ok(())
    }
}

/// Boundary to a text generation service producing human readable
/// explanations of a transaction.
#[async_trait]
pub trait TransactionSummarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<TransactionSummary, AgentError>;
}

/// Placeholder summarizer. Waits `delay` and answers with fixed text, no
/// inference service is contacted.
pub struct CannedSummarizer {
    delay: Duration,
}

impl CannedSummarizer {
    pub fn new(delay: Duration) -> Self {
        CannedSummarizer { delay }
    }
}

impl Default for CannedSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_DELAY)
    }
}

#[async_trait]
impl TransactionSummarizer for CannedSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<TransactionSummary, AgentError> {
        request.validate()?;
        log::debug!("Summarizing transaction {}", request.tx_hash);
        tokio::time::sleep(self.delay).await;
        let tx_hash = request.tx_hash.trim().to_string();
        Ok(TransactionSummary {
            summary: format!(
                "Transaction {tx_hash} has not been analyzed by a language model. \
                 This summary is a placeholder."
            ),
            analysis: "No analysis service is configured. Connect a text generation backend \
                       to receive a detailed explanation of this transaction."
                .to_string(),
            tx_hash,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_summary_names_the_hash() {
        let summarizer = CannedSummarizer::new(Duration::from_millis(1));
        let summary = summarizer
            .summarize(&SummaryRequest::new("0xabc", "llm-key"))
            .await
            .unwrap();
        assert_eq!(summary.tx_hash, "0xabc");
        assert!(summary.summary.contains("0xabc"));
        assert!(!summary.analysis.is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_is_rejected() {
        let summarizer = CannedSummarizer::new(Duration::from_millis(1));
        let err = summarizer
            .summarize(&SummaryRequest::new("0xabc", ""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please provide both transaction hash and API key.");
        assert!(summarizer
            .summarize(&SummaryRequest::new(" ", "key"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_summary_waits_for_delay() {
        let delay = Duration::from_millis(50);
        let summarizer = CannedSummarizer::new(delay);
        let started = tokio::time::Instant::now();
        summarizer
            .summarize(&SummaryRequest::new("0xabc", "key"))
            .await
            .unwrap();
        assert!(started.elapsed() >= delay);
    }
}
