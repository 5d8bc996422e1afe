use crate::settings::Settings;
use crate::solve::error::SolveError;
use crate::solve::solution::MathSolution;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Narrow boundary to the external inference service. The orchestrator only
/// ever sees this trait, so tests run against a scripted fake.
pub trait SolveClient: Send + Sync {
    fn solve(&self, image: &str) -> Result<MathSolution, SolveError>;
}

const SOLVE_PROMPT: &str = "Analyze this handwritten mathematical equation.\n\
1. Transcribe it into clear text and LaTeX format.\n\
2. Solve it step-by-step.\n\
3. Provide the final result.\n\
Return the answer in a structured JSON format.";

/// Posts the drawing to a hosted multimodal model and deserializes the
/// structured JSON reply. The model's reasoning is a black box.
pub struct GeminiSolveClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiSolveClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.api_key().unwrap_or_else(|| {
            tracing::warn!(
                "no API key configured (settings.json or GEMINI_API_KEY); solve requests will fail"
            );
            String::new()
        });
        let http = reqwest::blocking::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            endpoint: settings.api_endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

impl SolveClient for GeminiSolveClient {
    fn solve(&self, image: &str) -> Result<MathSolution, SolveError> {
        let (mime, payload) = split_data_uri(image);
        let body = request_body(mime, payload);

        let response = self
            .http
            .post(self.request_url())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|err| SolveError::Service(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| SolveError::Service(err.to_string()))?;
        if !status.is_success() {
            return Err(SolveError::Service(service_error_message(
                status.as_u16(),
                &text,
            )));
        }
        parse_solution(&text)
    }
}

/// Split `data:<mime>;base64,<payload>` into MIME type and payload. Inputs
/// that are not data URIs are passed through as a PNG payload.
fn split_data_uri(image: &str) -> (&str, &str) {
    let Some(rest) = image.strip_prefix("data:") else {
        return ("image/png", image);
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return ("image/png", image);
    };
    let mime = header.split(';').next().unwrap_or_default();
    if mime.is_empty() {
        ("image/png", payload)
    } else {
        (mime, payload)
    }
}

fn request_body(mime: &str, payload: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [
                { "inline_data": { "mime_type": mime, "data": payload } },
                { "text": SOLVE_PROMPT }
            ]
        }],
        "generationConfig": {
            "response_mime_type": "application/json",
            "response_schema": {
                "type": "OBJECT",
                "properties": {
                    "equation": { "type": "STRING" },
                    "latex": { "type": "STRING" },
                    "result": { "type": "STRING" },
                    "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "explanation": { "type": "STRING" }
                },
                "required": ["equation", "latex", "result", "steps", "explanation"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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

fn parse_solution(body: &str) -> Result<MathSolution, SolveError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|err| SolveError::Service(format!("malformed solver response: {err}")))?;
    let text = response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .find(|text| !text.trim().is_empty());
    let Some(text) = text else {
        return Err(SolveError::EmptyResponse);
    };
    serde_json::from_str(&text)
        .map_err(|err| SolveError::Service(format!("solver reply is missing required fields: {err}")))
}

fn service_error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.trim().is_empty() => parsed.error.message,
        _ => format!("solver request failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_splits_into_mime_and_payload() {
        assert_eq!(
            split_data_uri("data:image/png;base64,AAAA"),
            ("image/png", "AAAA")
        );
        assert_eq!(
            split_data_uri("data:image/jpeg;base64,QkJC"),
            ("image/jpeg", "QkJC")
        );
    }

    #[test]
    fn bare_payload_defaults_to_png() {
        assert_eq!(split_data_uri("AAAA"), ("image/png", "AAAA"));
        assert_eq!(split_data_uri("data:;base64,AAAA"), ("image/png", "AAAA"));
    }

    #[test]
    fn request_body_carries_image_prompt_and_schema() {
        let body = request_body("image/png", "AAAA");
        assert_eq!(
            body.pointer("/contents/0/parts/0/inline_data/data")
                .and_then(|v| v.as_str()),
            Some("AAAA")
        );
        assert_eq!(
            body.pointer("/contents/0/parts/1/text")
                .and_then(|v| v.as_str()),
            Some(SOLVE_PROMPT)
        );
        let required = body
            .pointer("/generationConfig/response_schema/required")
            .and_then(|v| v.as_array())
            .expect("required fields");
        assert_eq!(required.len(), 5);
    }

    #[test]
    fn candidate_text_parses_into_a_solution() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "{\"equation\":\"2+2\",\"latex\":\"2+2\",\"result\":\"4\",\
                                 \"steps\":[\"Add 2 and 2\"],\"explanation\":\"Basic addition\"}"
                    }]
                }
            }]
        })
        .to_string();
        let solution = parse_solution(&body).expect("solution");
        assert_eq!(solution.result, "4");
    }

    #[test]
    fn reply_without_text_is_an_empty_response() {
        assert_eq!(
            parse_solution(r#"{"candidates":[]}"#),
            Err(SolveError::EmptyResponse)
        );
        assert_eq!(
            parse_solution(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            Err(SolveError::EmptyResponse)
        );
    }

    #[test]
    fn candidate_missing_required_fields_is_a_service_failure() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"equation\":\"x\"}"}]}}]}"#;
        assert!(matches!(
            parse_solution(body),
            Err(SolveError::Service(message)) if message.contains("missing required fields")
        ));
    }

    #[test]
    fn http_error_bodies_surface_the_service_message() {
        let body = r#"{"error":{"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(service_error_message(429, body), "quota exceeded");
        assert_eq!(
            service_error_message(500, "not json"),
            "solver request failed with status 500"
        );
    }
}
