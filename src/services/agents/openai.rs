//! OpenAI Analysis Backend
//!
//! Calls the chat completions endpoint in JSON mode with a per-agent system
//! prompt and the rendered data summary as the user message.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use spend_arena_core::{AgentResult, AgentType, DataSummary, Recommendation, RiskLevel};

use super::backend::AnalysisBackend;
use super::strategy::system_prompt;
use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::format::format_money;

/// Longest error body echoed into logs and fallback reasons.
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub request_timeout: Duration,
}

impl OpenAiConfig {
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::config("OpenAI API key is not configured"))?;
        Ok(Self {
            api_key,
            model: config.openai_model.clone(),
            temperature: config.openai_temperature,
            base_url: config.openai_base_url.clone(),
            request_timeout: config.agent_timeout(),
        })
    }
}

pub struct OpenAiBackend {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request_body(
        &self,
        agent: AgentType,
        summary: &DataSummary,
        preferences: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_prompt(agent) },
                { "role": "user", "content": render_user_prompt(summary, preferences) },
            ],
        })
    }
}

#[async_trait]
impl AnalysisBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn analyze(
        &self,
        agent: AgentType,
        summary: &DataSummary,
        preferences: &str,
    ) -> AppResult<AgentResult> {
        tracing::info!(
            agent = %agent,
            model = %self.config.model,
            with_preferences = !preferences.is_empty(),
            "Calling OpenAI"
        );

        let body = self.build_request_body(agent, summary, preferences);
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::agent(format!("OpenAI request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(|e| AppError::agent(format!("Failed to read OpenAI response: {}", e)))?;

        if !(200..300).contains(&status) {
            let mut snippet = body_text;
            if snippet.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| snippet.is_char_boundary(*i))
                    .unwrap_or(0);
                snippet.truncate(cut);
            }
            return Err(AppError::agent(format!(
                "OpenAI returned HTTP {}: {}",
                status, snippet
            )));
        }

        let response: ChatResponse = serde_json::from_str(&body_text)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| AppError::agent("OpenAI response has no content"))?;

        parse_analysis(agent, &content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    recommendations: Vec<RawRecommendation>,
    total_savings: f64,
    summary: String,
}

fn default_risk() -> String {
    "medium".to_string()
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    id: String,
    title: String,
    description: String,
    estimated_savings: f64,
    confidence: f64,
    #[serde(default = "default_risk")]
    risk_level: String,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
}

/// Parse the model's JSON answer, normalising free-form risk levels.
///
/// Recommendations that still fail validation after normalising are dropped.
pub fn parse_analysis(agent: AgentType, content: &str) -> AppResult<AgentResult> {
    let raw: RawAnalysis = serde_json::from_str(content)
        .map_err(|e| AppError::agent(format!("Model answer is not a valid analysis: {}", e)))?;

    let recommendations = raw
        .recommendations
        .into_iter()
        .map(|r| Recommendation {
            id: r.id,
            title: r.title,
            description: r.description,
            estimated_savings: r.estimated_savings,
            confidence: r.confidence.clamp(0.0, 1.0),
            risk_level: RiskLevel::from_loose(&r.risk_level),
            pros: r.pros,
            cons: r.cons,
        })
        .filter(|rec| match rec.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(agent = %agent, error = %e, "Dropping invalid recommendation");
                false
            }
        })
        .collect();

    Ok(AgentResult {
        agent_type: agent,
        recommendations,
        total_savings: raw.total_savings,
        summary: raw.summary,
    })
}

fn money_lines<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> String {
    items
        .map(|(name, value)| format!("- {}: {}", name, format_money(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The user message: the data summary, then the preference context if any.
pub fn render_user_prompt(summary: &DataSummary, preferences: &str) -> String {
    let duplicates = if summary.duplicate_vendors.is_empty() {
        "None detected".to_string()
    } else {
        summary
            .duplicate_vendors
            .iter()
            .map(|d| format!("- {}", d))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut prompt = format!(
        "Procurement Spend Data Summary:
- Total Spend: {total}
- Transactions: {rows}
- Date Range: {range}

Top Vendors by Spend:
{vendors}

Spend by Category:
{categories}

Spend by Department:
{departments}

Monthly Trends:
{months}

Potential Duplicate Vendors Detected:
{duplicates}
",
        total = format_money(summary.total_spend),
        rows = summary.row_count,
        range = summary.date_range,
        vendors = money_lines(
            summary
                .top_vendors
                .iter()
                .map(|v| (v.vendor.as_str(), v.total_spend))
        ),
        categories = money_lines(
            summary
                .category_breakdown
                .iter()
                .map(|c| (c.category.as_str(), c.total_spend))
        ),
        departments = money_lines(
            summary
                .department_breakdown
                .iter()
                .map(|d| (d.department.as_str(), d.total_spend))
        ),
        months = money_lines(
            summary
                .monthly_trends
                .iter()
                .map(|m| (m.month.as_str(), m.total_spend))
        ),
        duplicates = duplicates,
    );

    if !preferences.is_empty() {
        prompt.push_str("\n\n--- USER PREFERENCES ---\n");
        prompt.push_str(preferences);
        prompt.push('\n');
    }
    prompt
}
