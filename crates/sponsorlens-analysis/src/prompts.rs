//! Prompts sent to the vision service.

/// Asks for a plain comma-separated list of commercial brands in the video.
pub const BRAND_DISCOVERY_PROMPT: &str = "\
Analyze this video and identify ONLY commercial brands, companies, and corporate sponsors.

INCLUDE:
- Corporate brand names (e.g., Ford, Nike, Coca-Cola)
- Business sponsors visible on logos, jerseys, signage
- Product brands and commercial companies
- Corporate sponsors of the venue/event
- Radio/TV station sponsors that are commercial entities

DO NOT INCLUDE:
- Team names or school names (e.g., \"Snowflake High School Football\")
- Player or person names
- Geographic locations or cities
- Generic descriptive terms
- Event names or competition names
- Non-commercial entities like schools or colleges

Return ONLY a comma-separated list of verified commercial brand names.
Be conservative - only include if you're certain it's a commercial brand.
Example format: Ford, Nike, Coca-Cola";

/// Builds the per-appearance detection prompt focused on `brands`.
///
/// An empty brand list asks the model for any brands it can find.
#[must_use]
pub fn brand_analysis_prompt(brands: &[String]) -> String {
    let focus = if brands.is_empty() {
        "any brands you can find".to_string()
    } else {
        brands.join(", ")
    };

    format!(
        "\
Analyze this sports/entertainment video for comprehensive brand sponsorship measurement.

Focus on these specific brands: {focus}

Categorize each brand appearance into one of two sponsorship categories:

1. AD PLACEMENTS (\"ad_placement\"): CTV commercials that interrupt content, digital
   overlays added in post-production, squeeze ads, commercial breaks and sponsored
   segments, broadcast sponsor messages and transitions.
2. IN-GAME PLACEMENTS (\"in_game_placement\"): logos on jerseys, uniforms and
   equipment, stadium signage and LED boards, product placements in the scene,
   venue naming rights, brand mentions in commentary.

For EACH brand appearance provide:
- timeline: [start_time, end_time] in seconds
- brand: exact brand name
- type: \"logo\", \"jersey_sponsor\", \"stadium_signage\", \"digital_overlay\", \"audio_mention\", \"product_placement\", \"commercial\", \"ctv_ad\", \"overlay_ad\", \"squeeze_ad\"
- sponsorship_category: \"ad_placement\" or \"in_game_placement\"
- location: [x%, y%, width%, height%] for visual elements
- prominence: \"primary\", \"secondary\" or \"background\"
- context: \"game_action\", \"replay\", \"celebration\", \"interview\", \"crowd_shot\", \"commercial\", \"transition\"
- description: detailed description including associated athletes and the specific moment
- sentiment_context: \"positive\", \"neutral\" or \"negative\"
- viewer_attention: \"high\", \"medium\" or \"low\"

Return ONLY a JSON array, no other text:
[
  {{
    \"timeline\": [start, end],
    \"brand\": \"brand_name\",
    \"type\": \"type\",
    \"sponsorship_category\": \"ad_placement|in_game_placement\",
    \"location\": [x, y, width, height],
    \"prominence\": \"level\",
    \"context\": \"context_type\",
    \"description\": \"detailed description\",
    \"sentiment_context\": \"sentiment\",
    \"viewer_attention\": \"attention_level\"
  }}
]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_requested_brands() {
        let prompt = brand_analysis_prompt(&["Nike".to_string(), "Ford".to_string()]);
        assert!(prompt.contains("Focus on these specific brands: Nike, Ford"));
        assert!(prompt.contains("\"timeline\": [start, end]"));
    }

    #[test]
    fn empty_brand_list_asks_for_any_brand() {
        assert!(brand_analysis_prompt(&[]).contains("any brands you can find"));
    }
}
