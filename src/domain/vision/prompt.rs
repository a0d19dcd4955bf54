//! Fishing-spot prompts and response templates

/// Instruction sent with every image to the primary provider
pub const FISHING_SPOT_PROMPT: &str = "You are an expert fishing guide and angler with decades of experience. Analyze this fishing spot image and provide detailed recommendations.

Please provide:
1. **Structure Analysis**: Identify visible underwater structures, cover, vegetation, shoreline features
2. **Fish Habitat Assessment**: What types of fish might be present based on the environment
3. **Casting Recommendations**: Best spots to cast and why
4. **Bait/Lure Suggestions**: What baits or lures would work best in this spot
5. **Technique Tips**: Fishing techniques that would be most effective
6. **Best Times**: When this spot would fish best (time of day, weather conditions)
7. **Confidence Score**: Rate this spot 1-10 for fishing potential

Format your response in a clear, actionable way that helps an angler succeed at this location.";

/// Wrap a plain image caption in generic fishing advice.
///
/// The secondary provider only returns a short caption, so the advice around
/// it is fixed.
pub fn enhance_caption(caption: &str) -> String {
    format!(
        "**Image Analysis**: {caption}

**Fishing Recommendations**:
Based on the visible features in this image, here are some fishing suggestions:

1. **Structure Analysis**: Look for areas with natural cover and varying depths
2. **Casting Strategy**: Target areas near visible structure or vegetation
3. **Bait Selection**: Consider the water clarity and structure type
4. **Technique**: Adapt your approach based on the environment shown

**Confidence Score**: 7/10 - Good fishing potential based on visible features

Note: This analysis is based on image recognition. For best results, consider local fishing reports and conditions."
    )
}
