//! Prompt templates, one per stage.

/// Marker replaced with the stage input.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Research stage prompt.
pub const RESEARCH: &str = "Research and provide comprehensive information about: {input}
Include:
- Key findings
- Relevant data points
- Sources and references";

/// Analysis stage prompt.
pub const ANALYSIS: &str = "Analyze the following information and provide:
{input}

Include:
- Key insights
- Pattern identification
- Recommendations
- Risk assessment";

/// Writer stage prompt.
pub const WRITER: &str = "Create a professional report based on:
{input}

Format:
- Executive Summary
- Detailed Findings
- Conclusions
- Next Steps";

/// Review stage prompt.
pub const REVIEW: &str = "Review the following content and provide quality assessment:
{input}

Evaluate:
- Accuracy
- Clarity
- Completeness
- Professionalism

Provide improvement suggestions.";
