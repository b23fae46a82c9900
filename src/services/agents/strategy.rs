//! Agent Strategies
//!
//! Per-agent thinking steps and system prompts.

use spend_arena_core::AgentType;

const CONSERVATIVE_STEPS: [&str; 4] = [
    "Reviewing overall spend patterns...",
    "Identifying vendor consolidation opportunities...",
    "Analyzing contract renegotiation potential...",
    "Calculating conservative savings estimates...",
];

const AGGRESSIVE_STEPS: [&str; 4] = [
    "Scanning for inefficiencies and waste...",
    "Evaluating vendor switching opportunities...",
    "Modeling aggressive renegotiation scenarios...",
    "Identifying automation and elimination targets...",
];

const BALANCED_STEPS: [&str; 4] = [
    "Analyzing spend distribution across categories...",
    "Weighing risk vs. reward for each opportunity...",
    "Identifying quick wins and strategic plays...",
    "Building balanced recommendation portfolio...",
];

/// Fixed thinking steps reported before the analysis result.
pub fn thinking_steps(agent: AgentType) -> &'static [&'static str] {
    match agent {
        AgentType::Conservative => &CONSERVATIVE_STEPS,
        AgentType::Aggressive => &AGGRESSIVE_STEPS,
        AgentType::Balanced => &BALANCED_STEPS,
    }
}

/// Progress reported with step `index` out of `total`; the final result owns 100.
pub fn step_progress(index: usize, total: usize) -> u8 {
    ((index + 1) * 100 / (total + 1)) as u8
}

const RESPONSE_SCHEMA: &str = r#"IMPORTANT: Respond with a JSON object matching this exact schema:
{
  "recommendations": [
    {
      "id": "{prefix}1",
      "title": "Brief title",
      "description": "Detailed explanation",
      "estimated_savings": 12000.00,
      "confidence": 0.8,
      "risk_level": "low",
      "pros": ["pro1", "pro2"],
      "cons": ["con1"]
    }
  ],
  "total_savings": 25000.00,
  "summary": "One paragraph executive summary"
}"#;

fn persona(agent: AgentType) -> &'static str {
    match agent {
        AgentType::Conservative => {
            "You are a CONSERVATIVE procurement analyst. Your approach:
- Focus on LOW-RISK, proven strategies with high confidence
- Prioritize vendor consolidation and contract renegotiation
- Only recommend changes you're highly confident will succeed
- Avoid anything disruptive to existing operations
- Prefer incremental improvements over radical changes
- Emphasize stability and reliability"
        }
        AgentType::Aggressive => {
            "You are an AGGRESSIVE procurement analyst. Your approach:
- Go BOLD: recommend switching vendors, eliminating redundancies
- Challenge the status quo and question every existing contract
- Maximize potential savings even if the approach carries risk
- Recommend renegotiating everything from a position of strength
- Suggest modern alternatives to legacy vendors
- Push for digital transformation and automation"
        }
        AgentType::Balanced => {
            "You are a BALANCED procurement analyst. Your approach:
- Weigh risk versus reward for every recommendation
- Mix safe bets with a few bold strategic moves
- Provide the most nuanced and thorough analysis
- Consider both short-term wins and long-term strategy
- Account for organizational change management
- Balance cost savings with service quality"
        }
    }
}

fn guidance(agent: AgentType) -> &'static str {
    match agent {
        AgentType::Conservative => {
            "Provide 3-5 recommendations. Keep estimated_savings realistic. Confidence should be 0.7-0.95. Risk levels should mostly be \"low\"."
        }
        AgentType::Aggressive => {
            "Provide 4-6 recommendations. Be ambitious with savings estimates. Confidence can range 0.4-0.8. Include some \"high\" risk recommendations."
        }
        AgentType::Balanced => {
            "Provide 4-5 recommendations. Mix risk levels. Confidence should vary (0.5-0.9). Provide the most balanced analysis."
        }
    }
}

/// Recommendation id prefix (`c1`, `a1`, `b1`, ...).
pub fn id_prefix(agent: AgentType) -> &'static str {
    match agent {
        AgentType::Conservative => "c",
        AgentType::Aggressive => "a",
        AgentType::Balanced => "b",
    }
}

/// Full system prompt for one agent.
pub fn system_prompt(agent: AgentType) -> String {
    format!(
        "{}\n\nYou will receive procurement spend data. Analyze it and provide recommendations.\n\n{}\n\n{}",
        persona(agent),
        RESPONSE_SCHEMA.replace("{prefix}", id_prefix(agent)),
        guidance(agent)
    )
}
