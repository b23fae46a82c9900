//! Wire Event Types
//!
//! Payloads carried by the analysis event stream. Every frame on the wire is a
//! single line `data: <json>` followed by a blank line:
//!
//! ```text
//! data: {"agent":"conservative","status":"thinking","step":"Reviewing...","progress":20}
//!
//! data: {"agent":"conservative","status":"complete","progress":100,"result":{...}}
//!
//! data: {"type":"done"}
//! ```
//!
//! Any JSON object parses: an event for an agent name the client does not
//! know, or with a field of the wrong type, still becomes an [`AgentEvent`]
//! and the reducer decides what to do with it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::{AgentResult, AgentType, DegradedNotice};
use crate::error::{CoreError, CoreResult};
use crate::lenient;

/// Prefix of every frame line carrying a payload.
pub const DATA_PREFIX: &str = "data: ";

/// `status` value for progress updates.
pub const STATUS_THINKING: &str = "thinking";
/// `status` value for the final result of an agent.
pub const STATUS_COMPLETE: &str = "complete";
/// `type` value of the terminal frame.
pub const TYPE_DONE: &str = "done";
/// `type` value of a gateway-level failure frame.
pub const TYPE_ERROR: &str = "error";

fn is_false(value: &bool) -> bool {
    !*value
}

/// One non-terminal payload from the event stream.
///
/// Decoding never fails on a field of the wrong type; such a field reads as
/// absent. Only a payload that is not a JSON object is rejected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentEvent {
    /// Frame type for events that are not addressed to an agent (`"error"`)
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub agent: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub progress: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::typed",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<AgentResult>,
    /// Set when `result` is a fallback substitution
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        skip_serializing_if = "is_false"
    )]
    pub mock: bool,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub mock_reason: Option<String>,
    /// Human-readable detail of a gateway-level failure
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<String>,
}

/// Typed view of an [`AgentEvent`] addressed to a known agent.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentUpdate<'a> {
    Thinking {
        agent: AgentType,
        step: Option<&'a str>,
        progress: Option<f64>,
    },
    Complete {
        agent: AgentType,
        result: &'a AgentResult,
        degraded: Option<DegradedNotice>,
    },
}

impl AgentUpdate<'_> {
    pub fn agent(&self) -> AgentType {
        match self {
            AgentUpdate::Thinking { agent, .. } | AgentUpdate::Complete { agent, .. } => *agent,
        }
    }
}

impl AgentEvent {
    /// A progress update for one agent.
    pub fn thinking(agent: AgentType, step: impl Into<String>, progress: u8) -> Self {
        Self {
            agent: Some(agent.as_str().to_string()),
            status: Some(STATUS_THINKING.to_string()),
            step: Some(step.into()),
            progress: Some(f64::from(progress)),
            ..Default::default()
        }
    }

    /// The final, authoritative result of one agent.
    pub fn complete(result: AgentResult) -> Self {
        Self {
            agent: Some(result.agent_type.as_str().to_string()),
            status: Some(STATUS_COMPLETE.to_string()),
            progress: Some(100.0),
            result: Some(result),
            ..Default::default()
        }
    }

    /// A completion carrying substituted fallback results.
    pub fn degraded(result: AgentResult, reason: impl Into<String>) -> Self {
        Self {
            mock: true,
            mock_reason: Some(reason.into()),
            ..Self::complete(result)
        }
    }

    /// A failure of the stream as a whole, not attributable to one agent.
    pub fn gateway_error(detail: impl Into<String>) -> Self {
        Self {
            kind: Some(TYPE_ERROR.to_string()),
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// The addressed agent, if the name is one of the known three.
    pub fn agent_type(&self) -> Option<AgentType> {
        self.agent.as_deref().and_then(|name| name.parse().ok())
    }

    /// Whether the completion is a fallback substitution.
    pub fn is_degraded(&self) -> bool {
        self.mock
    }

    /// Classify the event. `None` for anything the reducer must ignore:
    /// unknown or absent agent, unknown status, or a completion without result.
    pub fn update(&self) -> Option<AgentUpdate<'_>> {
        let agent = self.agent_type()?;
        match self.status.as_deref()? {
            STATUS_THINKING => Some(AgentUpdate::Thinking {
                agent,
                step: self.step.as_deref(),
                progress: self.progress,
            }),
            STATUS_COMPLETE => {
                let result = self.result.as_ref()?;
                let degraded = self.mock.then(|| DegradedNotice {
                    reason: self.mock_reason.clone(),
                });
                Some(AgentUpdate::Complete {
                    agent,
                    result,
                    degraded,
                })
            }
            _ => None,
        }
    }
}

/// One logical frame of the event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// Terminal frame: every agent has finished.
    Done,
    /// Any other payload object.
    Event(AgentEvent),
}

impl StreamFrame {
    /// Parse the JSON text that follows the `data: ` prefix.
    ///
    /// The payload must be a single JSON object.
    pub fn from_payload(payload: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(payload)?;
        if !value.is_object() {
            return Err(CoreError::parse(format!(
                "frame payload is not a JSON object: {}",
                payload
            )));
        }
        if value.get("type").and_then(Value::as_str) == Some(TYPE_DONE) {
            return Ok(StreamFrame::Done);
        }
        Ok(StreamFrame::Event(serde_json::from_value(value)?))
    }

    /// The JSON payload of this frame.
    pub fn to_json(&self) -> CoreResult<String> {
        match self {
            StreamFrame::Done => Ok(serde_json::json!({ "type": TYPE_DONE }).to_string()),
            StreamFrame::Event(event) => Ok(serde_json::to_string(event)?),
        }
    }

    /// The full wire encoding: `data: <json>\n\n`.
    pub fn encode(&self) -> CoreResult<String> {
        Ok(format!("{}{}\n\n", DATA_PREFIX, self.to_json()?))
    }
}
