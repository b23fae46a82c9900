//! Canned Analysis Results
//!
//! Fixed per-agent results used in mock mode and as the fallback when the
//! live backend is unavailable.

use async_trait::async_trait;
use spend_arena_core::{AgentResult, AgentType, DataSummary, Recommendation, RiskLevel};

use super::backend::AnalysisBackend;
use crate::utils::error::AppResult;

#[allow(clippy::too_many_arguments)]
fn rec(
    id: &str,
    title: &str,
    description: &str,
    estimated_savings: f64,
    confidence: f64,
    risk_level: RiskLevel,
    pros: &[&str],
    cons: &[&str],
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        estimated_savings,
        confidence,
        risk_level,
        pros: pros.iter().map(|s| s.to_string()).collect(),
        cons: cons.iter().map(|s| s.to_string()).collect(),
    }
}

fn conservative() -> AgentResult {
    AgentResult {
        agent_type: AgentType::Conservative,
        recommendations: vec![
            rec(
                "c1",
                "Consolidate Office Supply Vendors",
                "Merge purchases from Staples, Staples Express, Office Depot, and Office Depot Online into a single preferred vendor agreement. This reduces administrative overhead and qualifies for volume discounts.",
                8500.0,
                0.92,
                RiskLevel::Low,
                &["Minimal disruption", "Volume discounts", "Simplified procurement"],
                &["Vendor lock-in risk", "Requires contract negotiation"],
            ),
            rec(
                "c2",
                "Renegotiate Cloud Service Contracts",
                "Cloud spending shows a steady monthly increase of ~5%. Lock in current rates with a 1-year commitment to AWS or Azure to prevent further price creep.",
                12000.0,
                0.85,
                RiskLevel::Low,
                &["Predictable costs", "Price protection", "Common industry practice"],
                &["Reduced flexibility", "Commitment required"],
            ),
            rec(
                "c3",
                "Eliminate Duplicate Software Licenses",
                "Both Zoom and Zoom Video, and Slack and Slack Technologies appear as separate vendors, likely duplicate licenses across departments. Consolidate to single enterprise agreements.",
                6000.0,
                0.88,
                RiskLevel::Low,
                &["Direct cost reduction", "Better license management", "Easy to implement"],
                &["Requires cross-department coordination"],
            ),
        ],
        total_savings: 26500.0,
        summary: "Conservative analysis identifies $26,500 in low-risk savings through vendor consolidation, cloud contract renegotiation, and duplicate license elimination. All recommendations maintain existing vendor relationships and minimize operational disruption.".to_string(),
    }
}

fn aggressive() -> AgentResult {
    AgentResult {
        agent_type: AgentType::Aggressive,
        recommendations: vec![
            rec(
                "a1",
                "Switch to Single Cloud Provider",
                "Consolidate all cloud spending to a single provider (AWS) and negotiate enterprise pricing. Currently spending across AWS, Azure, Google Cloud, and DigitalOcean. A single provider deal with committed spend could yield 30-40% savings.",
                45000.0,
                0.55,
                RiskLevel::High,
                &["Massive cost reduction", "Simplified architecture", "Better support tier"],
                &["Migration risk", "Single point of failure", "Engineering effort required"],
            ),
            rec(
                "a2",
                "Replace Big-4 Consulting with Boutique Firms",
                "Consulting spend with Deloitte, McKinsey, and PwC is extremely high. Replace with specialized boutique consulting firms at 40-60% lower rates.",
                65000.0,
                0.50,
                RiskLevel::High,
                &["Dramatic cost reduction", "More specialized expertise", "Better engagement"],
                &["Relationship risk", "Unproven vendors", "Possible quality variance"],
            ),
            rec(
                "a3",
                "Automate Office Supply Procurement",
                "Implement automated procurement platform to replace all 5 office supply vendors. Use Amazon Business or similar with auto-approval workflows.",
                15000.0,
                0.65,
                RiskLevel::Medium,
                &["Process automation", "Price transparency", "Reduced admin costs"],
                &["Implementation effort", "Change management needed"],
            ),
            rec(
                "a4",
                "Eliminate Non-Essential Travel",
                "Mandate virtual-first policy and cut travel budget by 60%. With modern video conferencing already in place (Zoom), most travel is unnecessary.",
                35000.0,
                0.60,
                RiskLevel::Medium,
                &["Immediate savings", "Environmental benefit", "Already have tools"],
                &["Client relationship impact", "Employee satisfaction", "Cultural pushback"],
            ),
            rec(
                "a5",
                "Consolidate Marketing to In-House",
                "Bring Google Ads and Facebook Ads management in-house instead of through agencies. Hire one specialist to replace external spend.",
                20000.0,
                0.45,
                RiskLevel::High,
                &["Long-term cost control", "Faster iteration", "Better data ownership"],
                &["Hiring risk", "Transition period", "Loss of agency expertise"],
            ),
        ],
        total_savings: 180000.0,
        summary: "Aggressive analysis identifies $180,000 in potential savings through bold moves: cloud consolidation, consulting firm replacement, procurement automation, travel elimination, and marketing in-housing. High reward requires accepting higher risk and significant organizational change.".to_string(),
    }
}

fn balanced() -> AgentResult {
    AgentResult {
        agent_type: AgentType::Balanced,
        recommendations: vec![
            rec(
                "b1",
                "Strategic Office Supply Consolidation",
                "Reduce from 5 office supply vendors to 2 preferred vendors. Keep Staples as primary and Office Depot as backup. Negotiate volume pricing while maintaining competitive tension.",
                10000.0,
                0.88,
                RiskLevel::Low,
                &["Volume discounts", "Maintains competition", "Easy implementation"],
                &["Moderate savings", "Still some fragmentation"],
            ),
            rec(
                "b2",
                "Cloud Cost Optimization Program",
                "Address the 5% monthly cost creep in cloud services through reserved instances, rightsizing, and spending alerts. Don't switch providers but optimize within each.",
                25000.0,
                0.78,
                RiskLevel::Medium,
                &["No migration risk", "Addresses root cause", "Scalable approach"],
                &["Requires ongoing monitoring", "Engineering involvement needed"],
            ),
            rec(
                "b3",
                "Software License Audit & Consolidation",
                "Eliminate confirmed duplicate licenses (Zoom/Zoom Video, Slack/Slack Technologies) and audit actual usage of all software. Right-size licenses based on usage data.",
                12000.0,
                0.82,
                RiskLevel::Low,
                &["Clear ROI", "Improved visibility", "Compliance benefit"],
                &["Audit takes time", "Some departmental pushback"],
            ),
            rec(
                "b4",
                "Selective Consulting Renegotiation",
                "Renegotiate the top 2 consulting engagements by spend. Use competitive bids from boutique firms as leverage but don't necessarily switch. Target 15-20% rate reduction.",
                30000.0,
                0.65,
                RiskLevel::Medium,
                &["Significant savings", "Keeps relationships", "Market-based pricing"],
                &["Negotiation effort", "May strain relationships"],
            ),
        ],
        total_savings: 77000.0,
        summary: "Balanced analysis identifies $77,000 in savings mixing low-risk quick wins with strategic medium-risk plays. Recommends office supply consolidation, cloud optimization, license audit, and selective consulting renegotiation. Approach balances savings potential with operational stability.".to_string(),
    }
}

/// The canned result for `agent`.
pub fn mock_result(agent: AgentType) -> AgentResult {
    match agent {
        AgentType::Conservative => conservative(),
        AgentType::Aggressive => aggressive(),
        AgentType::Balanced => balanced(),
    }
}

/// Backend that always answers with [`mock_result`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

#[async_trait]
impl AnalysisBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_mock(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        agent: AgentType,
        _summary: &DataSummary,
        _preferences: &str,
    ) -> AppResult<AgentResult> {
        Ok(mock_result(agent))
    }
}
