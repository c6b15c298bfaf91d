//! View model over an [`AnalysisResult`]: score band, tab membership, the
//! work-experience carve-out, card layout and phrase highlighting.

use regex::Regex;

use crate::models::{AnalysisResult, Category, Correction, DetailedPoint, Status, SummaryUpgrade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Strengths,
    Weaknesses,
    Suggestions,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Strengths, Tab::Weaknesses, Tab::Suggestions];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Strengths => "strengths",
            Tab::Weaknesses => "weaknesses",
            Tab::Suggestions => "suggestions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Strengths => "Strengths",
            Tab::Weaknesses => "Weaknesses",
            Tab::Suggestions => "Suggestions",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Tab::ALL.into_iter().find(|tab| tab.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl From<Category> for Tab {
    fn from(category: Category) -> Self {
        match category {
            Category::Strength => Tab::Strengths,
            Category::Weakness => Tab::Weaknesses,
            Category::Suggestion => Tab::Suggestions,
        }
    }
}

impl From<Status> for Tab {
    fn from(status: Status) -> Self {
        match status {
            Status::Green => Tab::Strengths,
            Status::Red => Tab::Weaknesses,
            Status::Yellow => Tab::Suggestions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::High
        } else if score >= 60 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Critical,
    Improve,
    Strong,
}

impl StatusBadge {
    pub fn label(self) -> &'static str {
        match self {
            StatusBadge::Critical => "Critical",
            StatusBadge::Improve => "Improve",
            StatusBadge::Strong => "Strong",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StatusBadge::Critical => "badge-red",
            StatusBadge::Improve => "badge-yellow",
            StatusBadge::Strong => "badge-green",
        }
    }
}

impl From<Status> for StatusBadge {
    fn from(status: Status) -> Self {
        match status {
            Status::Red => StatusBadge::Critical,
            Status::Yellow => StatusBadge::Improve,
            Status::Green => StatusBadge::Strong,
        }
    }
}

/// Category wins; status is the fallback when the category is missing.
pub fn tab_for(point: &DetailedPoint) -> Option<Tab> {
    point
        .category
        .map(Tab::from)
        .or_else(|| point.status.map(Tab::from))
}

pub fn needs_fix(point: &DetailedPoint) -> bool {
    matches!(tab_for(point), Some(Tab::Weaknesses | Tab::Suggestions))
        || matches!(point.status, Some(Status::Red | Status::Yellow))
}

/// Experience bullets that need a rewrite get their own STAR panel.
pub fn is_experience_fix(point: &DetailedPoint) -> bool {
    point.section.to_lowercase().contains("experience") && needs_fix(point)
}

/// Points shown in `tab`, excluding the ones moved to the experience panel.
pub fn points_for_tab(points: &[DetailedPoint], tab: Tab) -> Vec<&DetailedPoint> {
    points
        .iter()
        .filter(|point| !is_experience_fix(point))
        .filter(|point| tab_for(point) == Some(tab))
        .collect()
}

pub fn experience_points(points: &[DetailedPoint]) -> Vec<&DetailedPoint> {
    points.iter().filter(|point| is_experience_fix(point)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody<'a> {
    /// Before/after rewrite with the reasoning.
    Comparison {
        before: &'a str,
        after: &'a str,
        explanation: &'a str,
    },
    /// Nothing to rewrite: positive-toned explanation only.
    Explanation { explanation: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCard<'a> {
    pub badge: Option<StatusBadge>,
    pub section: &'a str,
    pub issue: &'a str,
    pub highlights: &'a [String],
    pub body: CardBody<'a>,
}

pub fn card_for(point: &DetailedPoint) -> PointCard<'_> {
    let body = match (&point.correction, point.category) {
        (_, Some(Category::Strength)) => CardBody::Explanation {
            explanation: &point.explanation,
        },
        (Correction::Rewrite(after), _) => CardBody::Comparison {
            before: point.original_phrase.as_deref().unwrap_or(&point.issue),
            after,
            explanation: &point.explanation,
        },
        (Correction::Missing | Correction::NotApplicable, _) => CardBody::Explanation {
            explanation: &point.explanation,
        },
    };

    PointCard {
        badge: point.status.map(StatusBadge::from),
        section: &point.section,
        issue: &point.issue,
        highlights: &point.weak_highlights,
        body,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// Splits `text` into plain and emphasized runs. Phrases match
/// case-insensitively on token boundaries, longest phrase first; the
/// original casing of `text` is preserved.
pub fn highlight_segments<'a>(text: &'a str, phrases: &[String]) -> Vec<Segment<'a>> {
    let plain = || {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment { text, emphasized: false }]
        }
    };

    let mut phrases: Vec<&str> = phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if phrases.is_empty() {
        return plain();
    }
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    phrases.dedup();

    let alternatives: Vec<String> = phrases.iter().map(|p| token_pattern(p)).collect();
    let pattern = match Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))) {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::debug!("Highlight pattern rejected: {}", e);
            return plain();
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(text) {
        if found.start() > cursor {
            segments.push(Segment {
                text: &text[cursor..found.start()],
                emphasized: false,
            });
        }
        segments.push(Segment {
            text: found.as_str(),
            emphasized: true,
        });
        cursor = found.end();
    }
    if cursor < text.len() {
        segments.push(Segment {
            text: &text[cursor..],
            emphasized: false,
        });
    }
    segments
}

fn token_pattern(phrase: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let starts_word = phrase.chars().next().is_some_and(is_word);
    let ends_word = phrase.chars().last().is_some_and(is_word);
    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(phrase),
        if ends_word { r"\b" } else { "" },
    )
}

/// Summary upgrade to show, only when the model found a summary.
pub fn visible_summary_upgrade(analysis: &AnalysisResult) -> Option<&SummaryUpgrade> {
    analysis.summary_upgrade.as_ref().filter(|upgrade| upgrade.found)
}
