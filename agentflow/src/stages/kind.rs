//! The four stage kinds and everything that varies between them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::prompts;

/// Characters of input echoed back by the analysis stage.
pub const INPUT_SUMMARY_CHARS: usize = 200;
/// Fixed confidence attached to every analysis result.
pub const ANALYSIS_CONFIDENCE: f64 = 0.85;
/// Fixed placeholder score attached to every review result.
pub const REVIEW_QUALITY_SCORE: f64 = 0.92;

/// A pipeline stage kind, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Gathers information on the topic.
    Research,
    /// Derives insights from the research findings.
    Analysis,
    /// Writes a report from the insights.
    Writer,
    /// Reviews the report.
    Review,
}

/// Agent name aliases accepted by [`StageKind::from_agent_name`].
///
/// Matching is case-insensitive. The writer's metric key says "writing",
/// so that spelling is listed explicitly.
const AGENT_NAME_TABLE: &[(&str, StageKind)] = &[
    ("research", StageKind::Research),
    ("researchagent", StageKind::Research),
    ("analysis", StageKind::Analysis),
    ("analysisagent", StageKind::Analysis),
    ("writer", StageKind::Writer),
    ("writeragent", StageKind::Writer),
    ("writing", StageKind::Writer),
    ("review", StageKind::Review),
    ("reviewagent", StageKind::Review),
];

impl StageKind {
    /// All stage kinds in pipeline order.
    pub const ALL: [Self; 4] = [Self::Research, Self::Analysis, Self::Writer, Self::Review];

    /// Short stage name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Research => "Research",
            Self::Analysis => "Analysis",
            Self::Writer => "Writer",
            Self::Review => "Review",
        }
    }

    /// Agent name used in telemetry.
    #[must_use]
    pub fn agent_name(&self) -> &'static str {
        match self {
            Self::Research => "ResearchAgent",
            Self::Analysis => "AnalysisAgent",
            Self::Writer => "WriterAgent",
            Self::Review => "ReviewAgent",
        }
    }

    /// One-line description of the agent's job.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Research => "Gathers and researches information on given topics",
            Self::Analysis => "Analyzes gathered information and identifies patterns",
            Self::Writer => "Creates well-structured written reports and documents",
            Self::Review => "Reviews and verifies quality of outputs",
        }
    }

    /// The result field forwarded to the next stage.
    #[must_use]
    pub fn primary_field(&self) -> &'static str {
        match self {
            Self::Research => "findings",
            Self::Analysis => "insights",
            Self::Writer => "content",
            Self::Review => "quality_assessment",
        }
    }

    /// Key under which this stage's elapsed time is stored.
    #[must_use]
    pub fn metric_key(&self) -> &'static str {
        match self {
            Self::Research => "research_time_ms",
            Self::Analysis => "analysis_time_ms",
            Self::Writer => "writing_time_ms",
            Self::Review => "review_time_ms",
        }
    }

    /// Tracing span name for the stage inside a workflow.
    #[must_use]
    pub fn span_name(&self) -> &'static str {
        match self {
            Self::Research => "research_stage",
            Self::Analysis => "analysis_stage",
            Self::Writer => "writing_stage",
            Self::Review => "review_stage",
        }
    }

    /// Position in the pipeline, starting at 1.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::Research => 1,
            Self::Analysis => 2,
            Self::Writer => 3,
            Self::Review => 4,
        }
    }

    /// Resolves a human-readable agent name or metric prefix to a kind.
    #[must_use]
    pub fn from_agent_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_ascii_lowercase();
        AGENT_NAME_TABLE
            .iter()
            .find(|(alias, _)| *alias == needle)
            .map(|(_, kind)| *kind)
    }

    /// Renders the prompt sent to the completion client.
    #[must_use]
    pub fn render_prompt(&self, input: &str) -> String {
        let template = match self {
            Self::Research => prompts::RESEARCH,
            Self::Analysis => prompts::ANALYSIS,
            Self::Writer => prompts::WRITER,
            Self::Review => prompts::REVIEW,
        };
        template.replace(prompts::INPUT_PLACEHOLDER, input)
    }

    /// Builds the result fields from the stage input and generated text.
    #[must_use]
    pub fn shape(&self, input: &str, text: &str) -> Map<String, Value> {
        let value = match self {
            Self::Research => json!({
                "topic": input,
                "findings": text,
                "research_type": "comprehensive",
            }),
            Self::Analysis => json!({
                "input_summary": input.chars().take(INPUT_SUMMARY_CHARS).collect::<String>(),
                "insights": text,
                "confidence_score": ANALYSIS_CONFIDENCE,
            }),
            Self::Writer => json!({
                "report_type": "professional",
                "content": text,
                "word_count": word_count(text),
                "status": "completed",
            }),
            Self::Review => json!({
                "status": "reviewed",
                "quality_assessment": text,
                "quality_score": REVIEW_QUALITY_SCORE,
                "approved": true,
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Structural check: an object carrying this kind's primary field.
    #[must_use]
    pub fn validate(&self, output: &Value) -> bool {
        output
            .as_object()
            .is_some_and(|map| map.contains_key(self.primary_field()))
    }
}

/// Counts whitespace-separated words.
///
/// Besides Unicode whitespace, the ASCII file, group, record and unit
/// separators (U+001C..=U+001F) also split words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
        .filter(|word| !word.is_empty())
        .count()
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
