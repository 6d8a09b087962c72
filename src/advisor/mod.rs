pub mod gemini;

pub use gemini::GeminiAdvisor;

use crate::model::{ChatRole, RiskLevel};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ANALYSIS_FAILED: &str = "AI Analysis failed.";
pub const ANALYSIS_NO_DATA: &str = "No data available from the ghostly archives.";
pub const CHAT_FAILED: &str = "Ecto-containment breach! (Error connecting to AI)";
pub const CHAT_EMPTY: &str =
    "I'm having trouble connecting to the ecto-containment unit (API Error).";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub risk: RiskLevel,
    pub explanation: String,
}

impl Analysis {
    pub fn failed() -> Self {
        Self {
            risk: RiskLevel::Unknown,
            explanation: ANALYSIS_FAILED.to_string(),
        }
    }
}

/// One prior message of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("API_KEY not found in environment")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advisor returned status {0}: {1}")]
    Status(u16, String),
    #[error("advisor returned no text")]
    EmptyResponse,
    #[error("could not parse advisor reply: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Hosted model that explains processes and answers questions about a scan.
#[async_trait::async_trait]
pub trait Advisor: Send + Sync {
    async fn analyze(&self, process_name: &str, port: u16) -> Result<Analysis, AdvisorError>;

    async fn chat(
        &self,
        history: &[ChatTurn],
        message: &str,
        context: &str,
    ) -> Result<String, AdvisorError>;
}

pub async fn analyze_or_fallback(advisor: &dyn Advisor, process_name: &str, port: u16) -> Analysis {
    match advisor.analyze(process_name, port).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(process = process_name, port, error = %e, "analysis failed");
            Analysis::failed()
        }
    }
}

pub async fn chat_or_fallback(
    advisor: &dyn Advisor,
    history: &[ChatTurn],
    message: &str,
    context: &str,
) -> String {
    match advisor.chat(history, message, context).await {
        Ok(text) if text.trim().is_empty() => CHAT_EMPTY.to_string(),
        Ok(text) => text,
        Err(AdvisorError::EmptyResponse) => CHAT_EMPTY.to_string(),
        Err(e) => {
            warn!(error = %e, "chat failed");
            CHAT_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns fixed replies and records what it was asked.
    #[derive(Default)]
    pub(crate) struct CannedAdvisor {
        pub analysis: Option<Analysis>,
        pub reply: String,
        pub seen: Mutex<Vec<(usize, String, String)>>,
    }

    #[async_trait::async_trait]
    impl Advisor for CannedAdvisor {
        async fn analyze(&self, _name: &str, _port: u16) -> Result<Analysis, AdvisorError> {
            self.analysis.clone().ok_or(AdvisorError::EmptyResponse)
        }

        async fn chat(
            &self,
            history: &[ChatTurn],
            message: &str,
            context: &str,
        ) -> Result<String, AdvisorError> {
            self.seen.lock().unwrap().push((
                history.len(),
                message.to_string(),
                context.to_string(),
            ));
            Ok(self.reply.clone())
        }
    }

    pub(crate) struct FailingAdvisor;

    #[async_trait::async_trait]
    impl Advisor for FailingAdvisor {
        async fn analyze(&self, _name: &str, _port: u16) -> Result<Analysis, AdvisorError> {
            Err(AdvisorError::MissingApiKey)
        }

        async fn chat(
            &self,
            _history: &[ChatTurn],
            _message: &str,
            _context: &str,
        ) -> Result<String, AdvisorError> {
            Err(AdvisorError::Status(503, "unavailable".into()))
        }
    }

    #[tokio::test]
    async fn failing_advisor_degrades_to_sentinels() {
        let analysis = analyze_or_fallback(&FailingAdvisor, "postgres", 5432).await;
        assert_eq!(analysis.risk, RiskLevel::Unknown);
        assert_eq!(analysis.explanation, ANALYSIS_FAILED);

        let reply = chat_or_fallback(&FailingAdvisor, &[], "hello", "[]").await;
        assert_eq!(reply, CHAT_FAILED);
    }

    #[tokio::test]
    async fn canned_replies_pass_through() {
        let advisor = CannedAdvisor {
            analysis: Some(Analysis {
                risk: RiskLevel::Critical,
                explanation: "Mines coins for someone else.".into(),
            }),
            reply: "Boo! Port 6666 is trouble.".into(),
            ..Default::default()
        };

        let analysis = analyze_or_fallback(&advisor, "unknown_miner.exe", 6666).await;
        assert_eq!(analysis.risk, RiskLevel::Critical);

        let history = [ChatTurn {
            role: ChatRole::Model,
            text: "Greetings!".into(),
        }];
        let reply = chat_or_fallback(&advisor, &history, "what is 6666?", "[{}]").await;
        assert_eq!(reply, "Boo! Port 6666 is trouble.");

        let seen = advisor.seen.lock().unwrap();
        assert_eq!(seen[0], (1, "what is 6666?".to_string(), "[{}]".to_string()));
    }

    #[tokio::test]
    async fn blank_reply_uses_empty_sentinel() {
        let advisor = CannedAdvisor {
            reply: "   ".into(),
            ..Default::default()
        };
        assert_eq!(chat_or_fallback(&advisor, &[], "hi", "[]").await, CHAT_EMPTY);
    }
}
