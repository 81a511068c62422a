//! services/intake/src/adapters/guidance_llm.rs
//!
//! This module contains the adapter for the guidance language model.
//! It implements the `GuidanceService` port from the `core` crate against an
//! OpenAI-compatible chat completions endpoint with an enforced JSON schema.

const SYSTEM_INSTRUCTION: &str = r#"You are a medical information assistant providing informational health guidance, not a diagnosis.

Rules:
- Suggest ONLY over-the-counter (OTC) medications. NEVER suggest prescription-only drugs.
- Be concise, professional and empathetic.
- Never issue a definitive diagnosis. Describe possible causes, not conclusions.
- Set isEmergency to true whenever the symptoms imply high risk (for example chest pain,
  signs of stroke, severe bleeding, difficulty breathing or loss of consciousness).
- Respond only with JSON matching the provided schema."#;

pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"Please review the following symptoms and provide informational guidance.

Description: {description}
Patient: age {age}, gender {gender}.
Duration: {duration}.
Severity: {severity}/10."#;

use crate::adapters::guidance_schema::{guidance_schema, SCHEMA_NAME};
use crate::config::{Config, ConfigError};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use symptom_guide_core::{
    sanitize_credential, GuidanceError, GuidanceResult, GuidanceService, SymptomIntake,
};
use tracing::{info, warn};

static REGION_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)location (?:is )?not supported|not (?:available|supported) in your (?:region|country)")
        .expect("valid region signature")
});

static UNAUTHORIZED_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)api[ _]key[ _]not[ _]valid|api_key_invalid|invalid api key|permission[ _]denied|unauthenticated|\b40[13]\b",
    )
    .expect("valid unauthorized signature")
});

static BUSY_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)overloaded|\bunavailable\b|\b503\b|try again later")
        .expect("valid busy signature")
});

//=========================================================================================
// Settings
//=========================================================================================

/// Everything the adapter needs, consolidated from configuration.
#[derive(Clone)]
pub struct GuidanceSettings {
    pub api_base: String,
    pub credential: Option<String>,
    pub model: String,
    pub prompt_template: String,
    pub include_reasoning: bool,
}

impl GuidanceSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let prompt_template = config
            .load_prompt_template()?
            .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string());
        Ok(Self {
            api_base: config.api_base.clone(),
            credential: config.api_key.clone(),
            model: config.guidance_model.clone(),
            prompt_template,
            include_reasoning: config.include_reasoning,
        })
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GuidanceService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGuidanceAdapter {
    /// `None` when no usable credential is configured.
    client: Option<Client<OpenAIConfig>>,
    model: String,
    prompt_template: String,
    include_reasoning: bool,
}

impl OpenAiGuidanceAdapter {
    /// Creates a new `OpenAiGuidanceAdapter`. No client is built without a credential.
    pub fn new(settings: GuidanceSettings) -> Self {
        let client = sanitize_credential(settings.credential.as_deref()).map(|key| {
            let config = OpenAIConfig::new()
                .with_api_base(settings.api_base.clone())
                .with_api_key(key);
            Client::with_config(config).with_backoff(single_attempt())
        });

        Self {
            client,
            model: settings.model,
            prompt_template: settings.prompt_template,
            include_reasoning: settings.include_reasoning,
        }
    }

    fn build_request(&self, prompt: String) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTION)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                name: SCHEMA_NAME.to_string(),
                description: Some("Structured informational health guidance.".to_string()),
                schema: Some(guidance_schema(self.include_reasoning)),
                strict: None,
            },
        };

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(response_format)
            .build()
    }
}

/// The client retries 5xx and 429 replies by default; a guidance request is sent once.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

/// Fills the prompt template from the intake fields.
pub fn build_prompt(template: &str, intake: &SymptomIntake) -> String {
    let age = intake
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let duration = match intake.duration.trim() {
        "" => "not specified",
        d => d,
    };

    template
        .replace("{description}", intake.description.trim())
        .replace("{age}", &age)
        .replace("{gender}", &intake.gender.to_string())
        .replace("{duration}", duration)
        .replace("{severity}", &intake.severity.to_string())
}

/// Parses and validates the model's output. Required fields are never defaulted.
pub fn parse_guidance(payload: Option<&str>) -> Result<GuidanceResult, GuidanceError> {
    let text = payload.map(strip_code_fence).unwrap_or_default();
    if text.is_empty() {
        return Err(GuidanceError::MalformedResponse(
            "the model returned an empty response".to_string(),
        ));
    }

    let guidance: GuidanceResult = serde_json::from_str(text)
        .map_err(|e| GuidanceError::MalformedResponse(e.to_string()))?;

    if let Some(problem) = guidance.completeness_error() {
        return Err(GuidanceError::MalformedResponse(problem));
    }

    let (guidance, removed) = guidance.without_prescription_only();
    for med in &removed {
        warn!("Dropped prescription-only suggestion '{}' from guidance.", med.name);
    }
    Ok(guidance)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .strip_prefix("json")
            .unwrap_or(rest)
            .trim_end_matches("```")
            .trim(),
        None => trimmed,
    }
}

/// Maps a provider error message onto the client-visible failure kinds.
pub fn classify_failure(message: &str) -> GuidanceError {
    if REGION_SIGNATURE.is_match(message) {
        GuidanceError::RegionRestricted
    } else if UNAUTHORIZED_SIGNATURE.is_match(message) {
        GuidanceError::Unauthorized
    } else if BUSY_SIGNATURE.is_match(message) {
        GuidanceError::ServiceUnavailable
    } else if message.trim().is_empty() {
        GuidanceError::UnknownFailure("unknown connection error".to_string())
    } else {
        GuidanceError::UnknownFailure(message.to_string())
    }
}

fn map_openai_error(err: OpenAIError) -> GuidanceError {
    match err {
        OpenAIError::ApiError(api) => {
            // Status names such as PERMISSION_DENIED arrive in `code` or `type`.
            let signature = format!(
                "{} {} {}",
                api.code.as_deref().unwrap_or_default(),
                api.r#type.as_deref().unwrap_or_default(),
                api.message
            );
            match classify_failure(&signature) {
                GuidanceError::UnknownFailure(_) => classify_failure(&api.message),
                known => known,
            }
        }
        // Error bodies that are not a bare `{"error": {..}}` object land here with the raw
        // body attached, e.g. array-wrapped errors or a numeric `code`.
        OpenAIError::JSONDeserialize(_, ref content) => match classify_failure(content) {
            GuidanceError::UnknownFailure(_) => GuidanceError::MalformedResponse(err.to_string()),
            known => known,
        },
        other => classify_failure(&other.to_string()),
    }
}

//=========================================================================================
// `GuidanceService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GuidanceService for OpenAiGuidanceAdapter {
    /// Issues exactly one schema-constrained completion for the intake.
    async fn request_guidance(
        &self,
        intake: &SymptomIntake,
    ) -> Result<GuidanceResult, GuidanceError> {
        let client = self
            .client
            .as_ref()
            .ok_or(GuidanceError::MissingCredential)?;

        let prompt = build_prompt(&self.prompt_template, intake);
        let request = self
            .build_request(prompt)
            .map_err(|e| GuidanceError::UnknownFailure(e.to_string()))?;

        info!(model = %self.model, severity = intake.severity, "Requesting guidance.");
        let response = client.chat().create(request).await.map_err(|e| {
            let mapped = map_openai_error(e);
            warn!("Guidance request failed: {}", mapped);
            mapped
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        parse_guidance(content.as_deref())
    }
}
