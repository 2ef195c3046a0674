//! Prompts for brand research, placement scoring and executive summaries.

use std::fmt::Write as _;

use sponsorlens_analysis::{ScoringRequest, SummaryRequest, WebSnippet};

pub(crate) const RESEARCH_SYSTEM: &str =
    "You are a market research analyst. Provide factual, accurate information about companies.";
pub(crate) const SCORING_SYSTEM: &str =
    "You are a brand sponsorship analytics expert. Always return valid JSON.";
pub(crate) const SUMMARY_SYSTEM: &str =
    "You are a C-level brand strategy consultant specializing in sports sponsorship ROI.";

const RESEARCH_TOPICS: &str = "\
1. Company overview and history
2. Industry and market segment
3. Target audience demographics
4. Brand values and positioning
5. Recent developments and market position
6. Typical sponsorship activities
7. Main competitors
8. Marketing strategy insights";

const RESEARCH_FORMAT: &str = r#"Return ONLY valid JSON in this exact format:
{
  "company_overview": "Brief overview",
  "industry": "Industry sector",
  "target_audience": "Demographics and psychographics",
  "brand_values": "Core values and positioning",
  "typical_sponsorships": "Types of events/sports they sponsor",
  "competitors": ["competitor1", "competitor2"],
  "marketing_focus": "Key marketing strategies"
}"#;

const SNIPPET_PREVIEW_CHARS: usize = 200;
const MAX_SNIPPETS_IN_PROMPT: usize = 5;

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_PREVIEW_CHARS).collect();
    if text.chars().count() > SNIPPET_PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

pub(crate) fn background_prompt(brand: &str, snippets: &[WebSnippet]) -> String {
    let mut prompt = if snippets.is_empty() {
        format!(
            "Provide comprehensive information about {brand} based on your knowledge:\n\n\
             {RESEARCH_TOPICS}\n\n\
             Note: real-time web data was not available, so this is based on general knowledge.\n\n"
        )
    } else {
        let mut web = String::new();
        for s in snippets.iter().take(MAX_SNIPPETS_IN_PROMPT) {
            let _ = writeln!(web, "- {}: {}", s.source, preview(&s.content));
        }
        format!(
            "Based on the following real web data about {brand}, provide comprehensive analysis:\n\n\
             WEB SEARCH RESULTS:\n{web}\n\
             Analyze and structure this information to provide:\n{RESEARCH_TOPICS}\n\n\
             Enhance the web data with your knowledge but prioritize the real search results.\n\n"
        )
    };
    prompt.push_str(RESEARCH_FORMAT);
    prompt
}

const SCORING_FORMAT: &str = r#"Return ONLY valid JSON in this exact format:
{
  "placement_effectiveness_score": <float 0-100>,
  "roi_assessment": {
    "value_rating": "<excellent/good/fair/poor>",
    "cost_efficiency": <float 0-10>,
    "exposure_quality": <float 0-10>,
    "audience_reach": <float 0-10>
  },
  "placement_analysis": {
    "optimal_placements": "<description of well-placed ads>",
    "suboptimal_placements": "<description of poorly-placed ads>",
    "missed_opportunities": ["<specific moment where ad should have appeared>"],
    "timing_effectiveness": "<assessment of when ads appeared>"
  },
  "recommendations": {
    "immediate_actions": ["<specific action to improve current campaign>"],
    "future_strategy": ["<long-term placement strategy recommendation>"],
    "optimal_moments": ["<type of moment to target, e.g. post-goal replays>"],
    "avoid_these": ["<type of placement to avoid>"]
  },
  "competitive_insights": {
    "market_position": "<how this placement positions brand vs competitors>",
    "unique_advantages": "<what this placement achieved that competitors didn't>",
    "gaps_to_address": "<where competitors may have advantage>"
  },
  "roi_projection": {
    "estimated_impressions": <number>,
    "cost_per_impression": "<estimated value>",
    "brand_recall_likelihood": "<high/medium/low>",
    "purchase_intent_impact": "<positive/neutral/negative>",
    "overall_roi_rating": <float 0-10>
  },
  "executive_summary": "<2-3 sentences for advertiser decision-makers>"
}"#;

pub(crate) fn scoring_prompt(request: &ScoringRequest) -> Result<String, serde_json::Error> {
    let background = serde_json::to_string_pretty(&request.background)?;
    let placement = serde_json::to_string_pretty(&request.placement)?;
    let appearances = serde_json::to_string_pretty(&request.appearances)?;
    let share = sponsorlens_core::share_percent(request.total_exposure, request.video_duration);

    Ok(format!(
        "You are an expert advertising effectiveness consultant specializing in sports sponsorship ROI analysis.

Analyze this brand placement from an ADVERTISER'S perspective to determine if their investment was well-placed.

BRAND: {brand}

BRAND INFORMATION:
{background}

VIDEO CONTEXT:
- Type: sports event
- Duration: {minutes:.1} minutes
- Total brand exposure: {exposure} seconds ({share:.1}% of video)

PLACEMENT EFFECTIVENESS METRICS:
{placement}

BRAND APPEARANCES:
{appearances}

Assess placement quality, value for money, audience reach, competitive positioning, and give actionable recommendations.

{SCORING_FORMAT}",
        brand = request.brand,
        minutes = request.video_duration / 60.0,
        exposure = request.total_exposure,
    ))
}

const SUMMARY_FORMAT: &str = r#"Return valid JSON in this format:
{
  "key_findings": ["<finding 1>", "<finding 2>", "<finding 3>"],
  "strategic_recommendations": ["<recommendation 1>", "<recommendation 2>", "<recommendation 3>"],
  "market_positioning": "<assessment>",
  "future_opportunities": ["<opportunity 1>", "<opportunity 2>"],
  "risk_mitigation": ["<risk and mitigation 1>", "<risk and mitigation 2>"],
  "executive_summary": "<2-3 sentence executive summary>",
  "roi_projection": {
    "current_value_estimate": <float>,
    "optimization_potential": "<percentage>",
    "competitive_advantage": "<assessment>"
  }
}"#;

pub(crate) fn summary_prompt(request: &SummaryRequest) -> Result<String, serde_json::Error> {
    let metrics = serde_json::to_string_pretty(request)?;
    Ok(format!(
        "As a senior brand sponsorship strategist, analyze this brand exposure data and provide executive-level insights:

{metrics}

Generate:
1. 3-5 key findings about brand performance and opportunities
2. 3-4 strategic recommendations for maximizing sponsorship ROI
3. Market positioning assessment compared to industry standards
4. Predicted trends and future opportunities
5. Risk factors and mitigation strategies

Focus on actionable, data-driven insights that C-level executives would value.

{SUMMARY_FORMAT}"
    ))
}
