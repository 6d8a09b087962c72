use crate::advisor::{ANALYSIS_NO_DATA, Advisor, AdvisorError, Analysis, ChatTurn};
use crate::config::AdvisorConfig;
use crate::model::{ChatRole, RiskLevel};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const PERSONA: &str = "\
You are SlimerNet's AI agent: a cyber-security expert who happens to be a friendly, \
slightly gooey green ghost. You help the user make sense of the API traffic and \
running processes on their machine. Be witty, but know your ports, protocols and malware.";

const NO_CONTEXT: &str = "No active scan data available.";

/// Advisor backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug)]
pub struct GeminiAdvisor {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: std::borrow::Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    risk: Option<RiskLevel>,
    explanation: Option<String>,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'static str>, text: impl Into<std::borrow::Cow<'a, str>>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

impl GeminiAdvisor {
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, AdvisorError> {
        let key = self.api_key.as_deref().ok_or(AdvisorError::MissingApiKey)?;

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Status(status.as_u16(), body));
        }

        let parsed: GenerateResponse = resp.json().await?;
        debug!(candidates = parsed.candidates.len(), "advisor replied");
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, AdvisorError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(AdvisorError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Missing fields fall back to `UNKNOWN` and the no-data explanation.
fn parse_analysis(text: &str) -> Result<Analysis, AdvisorError> {
    let raw: RawAnalysis = serde_json::from_str(text)?;
    Ok(Analysis {
        risk: raw.risk.unwrap_or(RiskLevel::Unknown),
        explanation: raw
            .explanation
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| ANALYSIS_NO_DATA.to_string()),
    })
}

fn system_instruction(context: &str) -> String {
    let context = if context.trim().is_empty() {
        NO_CONTEXT
    } else {
        context
    };
    format!(
        "{PERSONA}\n\nCurrent system context (simulated scan):\n{context}\n\n\
         When asked about a specific process, explain what it does, which ports it \
         normally uses and whether it is safe. Always put security first."
    )
}

#[async_trait::async_trait]
impl Advisor for GeminiAdvisor {
    async fn analyze(&self, process_name: &str, port: u16) -> Result<Analysis, AdvisorError> {
        let prompt = format!(
            "Analyze this process: Name=\"{process_name}\", Port={port}. \
             Return JSON with fields: risk (one of SAFE, SUS, CRITICAL, UNKNOWN) and \
             explanation (one short sentence on what it does and who it talks to)."
        );
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "risk": {
                            "type": "STRING",
                            "enum": ["SAFE", "SUS", "CRITICAL", "UNKNOWN"]
                        },
                        "explanation": { "type": "STRING" }
                    }
                }
            }),
        };

        let text = self.generate(&request).await?;
        parse_analysis(&text)
    }

    async fn chat(
        &self,
        history: &[ChatTurn],
        message: &str,
        context: &str,
    ) -> Result<String, AdvisorError> {
        let mut contents: Vec<Content<'_>> = history
            .iter()
            .map(|turn| Content::text(Some(role_name(turn.role)), turn.text.as_str()))
            .collect();
        contents.push(Content::text(Some("user"), message));

        let request = GenerateRequest {
            system_instruction: Some(Content::text(None, system_instruction(context))),
            contents,
            generation_config: json!({ "temperature": 0.7 }),
        };

        self.generate(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> AdvisorConfig {
        AdvisorConfig {
            api_key: api_key.map(str::to_string),
            ..AdvisorConfig::default()
        }
    }

    #[test]
    fn analysis_with_all_fields() {
        let a = parse_analysis(r#"{"risk":"SUS","explanation":"Sends data out."}"#).unwrap();
        assert_eq!(a.risk, RiskLevel::Sus);
        assert_eq!(a.explanation, "Sends data out.");
    }

    #[test]
    fn analysis_missing_fields_falls_back() {
        let a = parse_analysis("{}").unwrap();
        assert_eq!(a.risk, RiskLevel::Unknown);
        assert_eq!(a.explanation, ANALYSIS_NO_DATA);
    }

    #[test]
    fn analysis_that_is_not_json_is_an_error() {
        assert!(matches!(
            parse_analysis("definitely a ghost"),
            Err(AdvisorError::Parse(_))
        ));
    }

    #[test]
    fn text_is_joined_from_first_candidate() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Boo, "},{"text":"safe."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(resp).unwrap(), "Boo, safe.");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(extract_text(empty), Err(AdvisorError::EmptyResponse)));
    }

    #[test]
    fn chat_request_carries_history_and_context() {
        let history = [
            ChatTurn {
                role: ChatRole::Model,
                text: "Greetings!".into(),
            },
            ChatTurn {
                role: ChatRole::User,
                text: "Hi".into(),
            },
        ];
        let request = GenerateRequest {
            system_instruction: Some(Content::text(None, system_instruction(""))),
            contents: history
                .iter()
                .map(|t| Content::text(Some(role_name(t.role)), t.text.as_str()))
                .collect(),
            generation_config: json!({ "temperature": 0.7 }),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "model");
        assert_eq!(value["contents"][1]["parts"][0]["text"], "Hi");
        assert!(
            value["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains(NO_CONTEXT)
        );
        assert!(value["systemInstruction"].get("role").is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let advisor = GeminiAdvisor::new(&config(Some("  "))).unwrap();
        assert!(matches!(
            advisor.analyze("postgres", 5432).await,
            Err(AdvisorError::MissingApiKey)
        ));
        assert!(matches!(
            advisor.chat(&[], "hi", "[]").await,
            Err(AdvisorError::MissingApiKey)
        ));
    }

    #[test]
    fn endpoint_uses_model_and_trims_base_url() {
        let advisor = GeminiAdvisor::new(&AdvisorConfig {
            base_url: "https://example.test/".into(),
            ..config(Some("k"))
        })
        .unwrap();
        assert_eq!(
            advisor.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
