//! Data models for community rollups.
//!
//! This module contains the per-user snapshot consumed by the aggregator,
//! the published and suppressed result shapes, and the cached record that
//! wraps a result with its window and date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Confidence attached to a persona assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaConfidence {
    High,
    Medium,
    Low,
}

impl PersonaConfidence {
    /// All levels, highest first.
    pub const ALL: [PersonaConfidence; 3] = [
        PersonaConfidence::High,
        PersonaConfidence::Medium,
        PersonaConfidence::Low,
    ];
}

impl fmt::Display for PersonaConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaConfidence::High => write!(f, "High"),
            PersonaConfidence::Medium => write!(f, "Medium"),
            PersonaConfidence::Low => write!(f, "Low"),
        }
    }
}

/// One of the six behavioral axes scored 0-100 per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKey {
    AutomationHeaviness,
    GuardrailStrength,
    IterationLoopIntensity,
    PlanningSignal,
    SurfaceAreaPerChange,
    ShippingRhythm,
}

impl AxisKey {
    /// All axes, in publication order.
    pub const ALL: [AxisKey; 6] = [
        AxisKey::AutomationHeaviness,
        AxisKey::GuardrailStrength,
        AxisKey::IterationLoopIntensity,
        AxisKey::PlanningSignal,
        AxisKey::SurfaceAreaPerChange,
        AxisKey::ShippingRhythm,
    ];

    /// Wire name of the axis.
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisKey::AutomationHeaviness => "automation_heaviness",
            AxisKey::GuardrailStrength => "guardrail_strength",
            AxisKey::IterationLoopIntensity => "iteration_loop_intensity",
            AxisKey::PlanningSignal => "planning_signal",
            AxisKey::SurfaceAreaPerChange => "surface_area_per_change",
            AxisKey::ShippingRhythm => "shipping_rhythm",
        }
    }

    /// Human-readable label used in Markdown output.
    pub fn label(&self) -> &'static str {
        match self {
            AxisKey::AutomationHeaviness => "Automation Heaviness",
            AxisKey::GuardrailStrength => "Guardrail Strength",
            AxisKey::IterationLoopIntensity => "Iteration Loop Intensity",
            AxisKey::PlanningSignal => "Planning Signal",
            AxisKey::SurfaceAreaPerChange => "Surface Area per Change",
            AxisKey::ShippingRhythm => "Shipping Rhythm",
        }
    }
}

impl fmt::Display for AxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user behavioral summary fed into the community rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySnapshot {
    /// Opaque user identifier, unique within one computation.
    pub user_id: String,
    /// Commits analyzed for this user.
    pub total_commits: u64,
    /// Repositories analyzed for this user.
    pub total_repos: u64,
    /// Assigned persona label.
    pub persona_id: String,
    /// Confidence in the persona assignment.
    pub persona_confidence: PersonaConfidence,
    pub automation_heaviness: f64,
    pub guardrail_strength: f64,
    pub iteration_loop_intensity: f64,
    pub planning_signal: f64,
    pub surface_area_per_change: f64,
    pub shipping_rhythm: f64,
    /// Share of commits attributed to AI tooling, in [0, 1].
    /// `None` when AI-tool detection did not run.
    #[serde(default)]
    pub ai_collaboration_rate: Option<f64>,
    /// Number of distinct AI tools detected.
    #[serde(default)]
    pub ai_tool_diversity: Option<u32>,
    /// Whether any AI tooling was detected.
    #[serde(default)]
    pub ai_tools_detected: Option<bool>,
}

impl CommunitySnapshot {
    /// Returns the score for the given axis.
    pub fn axis_score(&self, axis: AxisKey) -> f64 {
        match axis {
            AxisKey::AutomationHeaviness => self.automation_heaviness,
            AxisKey::GuardrailStrength => self.guardrail_strength,
            AxisKey::IterationLoopIntensity => self.iteration_loop_intensity,
            AxisKey::PlanningSignal => self.planning_signal,
            AxisKey::SurfaceAreaPerChange => self.surface_area_per_change,
            AxisKey::ShippingRhythm => self.shipping_rhythm,
        }
    }
}

/// Why a rollup was withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionReason {
    /// Fewer eligible profiles than the global threshold.
    InsufficientData,
}

impl SuppressionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuppressionReason::InsufficientData => "insufficient_data",
        }
    }
}

/// Result returned when the cohort is too small to publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStatsSuppressed {
    pub reason: SuppressionReason,
    /// Number of eligible profiles that were available.
    pub eligible_profiles: usize,
    /// Minimum number of profiles required to publish.
    pub threshold: usize,
}

/// Share of the community assigned to one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaShare {
    pub id: String,
    /// Display name for the persona.
    pub name: String,
    /// Percentage of eligible profiles, one decimal place.
    pub pct: f64,
}

/// Persona confidence split, as percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceShares {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl ConfidenceShares {
    /// Share for one confidence level.
    pub fn get(&self, level: PersonaConfidence) -> f64 {
        match level {
            PersonaConfidence::High => self.high,
            PersonaConfidence::Medium => self.medium,
            PersonaConfidence::Low => self.low,
        }
    }
}

/// Quartiles of one axis across the community.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisQuartiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Percentage of a cohort falling into a named bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketShare {
    pub bucket: String,
    pub pct: f64,
}

/// Distribution of AI collaboration among profiles with detected AI tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiToolsDistribution {
    /// Size of the sub-cohort the buckets are computed over.
    pub eligible_profiles: usize,
    pub collaboration_rate: Vec<BucketShare>,
    pub tool_diversity: Vec<BucketShare>,
}

/// Provenance of a published rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupMeta {
    /// Rollup window label, e.g. "30d".
    pub window: String,
    /// Payload format version.
    pub version: String,
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
}

/// Published community statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStatsPayload {
    pub eligible_profiles: usize,
    pub eligible_repos: u64,
    pub total_analyzed_commits: u64,
    /// Personas meeting the bucket threshold, highest share first.
    pub personas: Vec<PersonaShare>,
    pub persona_confidence: ConfidenceShares,
    pub axes: BTreeMap<AxisKey, AxisQuartiles>,
    /// `None` when the AI-tool sub-cohort is below the bucket threshold.
    pub ai_tools: Option<AiToolsDistribution>,
    pub meta: RollupMeta,
}

/// Outcome of a community rollup.
///
/// Serialized with a boolean `suppressed` discriminator alongside the
/// variant's own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CommunityStats {
    Suppressed(CommunityStatsSuppressed),
    Published(CommunityStatsPayload),
}

impl CommunityStats {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, CommunityStats::Suppressed(_))
    }

    /// Number of eligible profiles the result was computed from.
    pub fn eligible_profiles(&self) -> usize {
        match self {
            CommunityStats::Suppressed(s) => s.eligible_profiles,
            CommunityStats::Published(p) => p.eligible_profiles,
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    suppressed: bool,
    #[serde(flatten)]
    body: &'a T,
}

impl Serialize for CommunityStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CommunityStats::Suppressed(body) => Tagged {
                suppressed: true,
                body,
            }
            .serialize(serializer),
            CommunityStats::Published(body) => Tagged {
                suppressed: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CommunityStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let suppressed = value
            .get("suppressed")
            .and_then(serde_json::Value::as_bool)
            .ok_or_else(|| de::Error::missing_field("suppressed"))?;

        if suppressed {
            serde_json::from_value(value)
                .map(CommunityStats::Suppressed)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(CommunityStats::Published)
                .map_err(de::Error::custom)
        }
    }
}

/// A rollup result keyed by window and date, as written to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRecord {
    pub window: String,
    pub as_of: NaiveDate,
    pub stats: CommunityStats,
}
