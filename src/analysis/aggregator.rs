//! Community rollup aggregation.
//!
//! Turns a list of eligible snapshots into publishable community
//! statistics. Small cohorts are suppressed globally, and individual
//! breakdown buckets are dropped when too few profiles support them.

use crate::config::RollupConfig;
use crate::models::{
    AiToolsDistribution, AxisKey, AxisQuartiles, BucketShare, CommunitySnapshot, CommunityStats,
    CommunityStatsPayload, CommunityStatsSuppressed, ConfidenceShares, PersonaConfidence,
    PersonaShare, RollupMeta, SuppressionReason,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Collaboration-rate buckets, in publication order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaborationBucket {
    None,
    Light,
    Moderate,
    Heavy,
    AiNative,
}

impl CollaborationBucket {
    pub const ALL: [CollaborationBucket; 5] = [
        CollaborationBucket::None,
        CollaborationBucket::Light,
        CollaborationBucket::Moderate,
        CollaborationBucket::Heavy,
        CollaborationBucket::AiNative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CollaborationBucket::None => "none",
            CollaborationBucket::Light => "light",
            CollaborationBucket::Moderate => "moderate",
            CollaborationBucket::Heavy => "heavy",
            CollaborationBucket::AiNative => "ai-native",
        }
    }
}

/// Tool-diversity buckets, in publication order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiversityBucket {
    Zero,
    One,
    Two,
    ThreePlus,
}

impl DiversityBucket {
    pub const ALL: [DiversityBucket; 4] = [
        DiversityBucket::Zero,
        DiversityBucket::One,
        DiversityBucket::Two,
        DiversityBucket::ThreePlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DiversityBucket::Zero => "0",
            DiversityBucket::One => "1",
            DiversityBucket::Two => "2",
            DiversityBucket::ThreePlus => "3+",
        }
    }
}

/// Whether a snapshot has enough activity to be counted.
pub fn is_eligible(snapshot: &CommunitySnapshot, config: &RollupConfig) -> bool {
    snapshot.total_commits >= config.eligible_min_commits
}

/// Percentage of `total`, rounded to one decimal place.
pub fn round_pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 1000.0).round() / 10.0
}

/// Percentile `p` (0-100) of an ascending slice.
///
/// Interpolates linearly between the neighbouring order statistics and
/// rounds interpolated values to the nearest integer. Exact hits return
/// the element unchanged. An empty slice yields 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let index = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let weight = index - lower as f64;
    (sorted[lower] + (sorted[upper] - sorted[lower]) * weight).round()
}

/// Bucket for an AI collaboration rate. First match wins.
pub fn collaboration_bucket(rate: f64) -> CollaborationBucket {
    if rate == 0.0 {
        CollaborationBucket::None
    } else if rate <= 0.1 {
        CollaborationBucket::Light
    } else if rate <= 0.3 {
        CollaborationBucket::Moderate
    } else if rate <= 0.6 {
        CollaborationBucket::Heavy
    } else {
        CollaborationBucket::AiNative
    }
}

/// Bucket for a count of distinct AI tools.
pub fn diversity_bucket(count: u32) -> DiversityBucket {
    match count {
        0 => DiversityBucket::Zero,
        1 => DiversityBucket::One,
        2 => DiversityBucket::Two,
        _ => DiversityBucket::ThreePlus,
    }
}

/// Compute the community rollup, stamping it with `now`.
pub fn compute_community_rollup(
    snapshots: &[CommunitySnapshot],
    config: &RollupConfig,
    now: DateTime<Utc>,
) -> CommunityStats {
    compute_community_rollup_as_of(snapshots, config, now.date_naive(), now)
}

/// Compute the community rollup for an explicit `as_of` date.
///
/// The input is trusted to be eligible already; see [`is_eligible`].
pub fn compute_community_rollup_as_of(
    snapshots: &[CommunitySnapshot],
    config: &RollupConfig,
    as_of: NaiveDate,
    generated_at: DateTime<Utc>,
) -> CommunityStats {
    let total = snapshots.len();

    if total < config.global_threshold {
        debug!(
            "Suppressing rollup: {} eligible profiles, {} required",
            total, config.global_threshold
        );
        return CommunityStats::Suppressed(CommunityStatsSuppressed {
            reason: SuppressionReason::InsufficientData,
            eligible_profiles: total,
            threshold: config.global_threshold,
        });
    }

    let eligible_repos = snapshots.iter().map(|s| s.total_repos).sum();
    let total_analyzed_commits = snapshots.iter().map(|s| s.total_commits).sum();

    CommunityStats::Published(CommunityStatsPayload {
        eligible_profiles: total,
        eligible_repos,
        total_analyzed_commits,
        personas: persona_distribution(snapshots, config),
        persona_confidence: confidence_distribution(snapshots),
        axes: axis_quartiles(snapshots),
        ai_tools: ai_tools_distribution(snapshots, config),
        meta: RollupMeta {
            window: config.window.clone(),
            version: config.version.clone(),
            as_of,
            generated_at,
        },
    })
}

/// Persona shares, omitting personas below the bucket threshold.
pub fn persona_distribution(
    snapshots: &[CommunitySnapshot],
    config: &RollupConfig,
) -> Vec<PersonaShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for snapshot in snapshots {
        *counts.entry(snapshot.persona_id.as_str()).or_default() += 1;
    }

    let total = snapshots.len();
    let mut omitted = 0;
    let mut shares: Vec<PersonaShare> = Vec::new();

    for (id, count) in counts {
        if count < config.bucket_threshold {
            omitted += 1;
            continue;
        }
        shares.push(PersonaShare {
            id: id.to_string(),
            name: config.persona_display_name(id).to_string(),
            pct: round_pct(count, total),
        });
    }

    if omitted > 0 {
        debug!(
            "Omitted {} persona buckets below threshold {}",
            omitted, config.bucket_threshold
        );
    }

    // Stable sort keeps ascending id order among equal shares
    shares.sort_by(|a, b| b.pct.total_cmp(&a.pct));
    shares
}

/// High/medium/low confidence shares. All three are always present.
pub fn confidence_distribution(snapshots: &[CommunitySnapshot]) -> ConfidenceShares {
    let (mut high, mut medium, mut low) = (0, 0, 0);
    for snapshot in snapshots {
        match snapshot.persona_confidence {
            PersonaConfidence::High => high += 1,
            PersonaConfidence::Medium => medium += 1,
            PersonaConfidence::Low => low += 1,
        }
    }

    let total = snapshots.len();
    ConfidenceShares {
        high: round_pct(high, total),
        medium: round_pct(medium, total),
        low: round_pct(low, total),
    }
}

/// p25/p50/p75 for every axis. Non-finite scores are skipped.
pub fn axis_quartiles(snapshots: &[CommunitySnapshot]) -> BTreeMap<AxisKey, AxisQuartiles> {
    AxisKey::ALL
        .iter()
        .map(|&axis| {
            let mut values: Vec<f64> = snapshots
                .iter()
                .map(|s| s.axis_score(axis))
                .filter(|v| v.is_finite())
                .collect();
            values.sort_by(|a, b| a.total_cmp(b));

            let quartiles = AxisQuartiles {
                p25: percentile(&values, 25.0),
                p50: percentile(&values, 50.0),
                p75: percentile(&values, 75.0),
            };
            (axis, quartiles)
        })
        .collect()
}

/// AI-tool breakdown over profiles with detected tooling and a known
/// collaboration rate. `None` when that sub-cohort is below the bucket
/// threshold.
///
/// A missing tool-diversity count is bucketed as zero tools.
pub fn ai_tools_distribution(
    snapshots: &[CommunitySnapshot],
    config: &RollupConfig,
) -> Option<AiToolsDistribution> {
    let cohort: Vec<(f64, Option<u32>)> = snapshots
        .iter()
        .filter(|s| s.ai_tools_detected == Some(true))
        .filter_map(|s| s.ai_collaboration_rate.map(|rate| (rate, s.ai_tool_diversity)))
        .collect();

    if cohort.len() < config.bucket_threshold {
        debug!(
            "Suppressing AI tools breakdown: {} profiles, {} required",
            cohort.len(),
            config.bucket_threshold
        );
        return None;
    }

    let mut rate_counts = [0usize; 5];
    let mut diversity_counts = [0usize; 4];
    let mut unknown_diversity = 0;

    for &(rate, diversity) in &cohort {
        rate_counts[collaboration_bucket(rate) as usize] += 1;
        if diversity.is_none() {
            unknown_diversity += 1;
        }
        diversity_counts[diversity_bucket(diversity.unwrap_or(0)) as usize] += 1;
    }

    if unknown_diversity > 0 {
        debug!(
            "{} AI tool profiles have no diversity count, bucketed as 0",
            unknown_diversity
        );
    }

    let total = cohort.len();
    Some(AiToolsDistribution {
        eligible_profiles: total,
        collaboration_rate: CollaborationBucket::ALL
            .iter()
            .map(|bucket| BucketShare {
                bucket: bucket.label().to_string(),
                pct: round_pct(rate_counts[*bucket as usize], total),
            })
            .collect(),
        tool_diversity: DiversityBucket::ALL
            .iter()
            .map(|bucket| BucketShare {
                bucket: bucket.label().to_string(),
                pct: round_pct(diversity_counts[*bucket as usize], total),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(index: usize, persona: &str) -> CommunitySnapshot {
        CommunitySnapshot {
            user_id: format!("user-{}", index),
            total_commits: 100,
            total_repos: 2,
            persona_id: persona.to_string(),
            persona_confidence: PersonaConfidence::High,
            automation_heaviness: 50.0,
            guardrail_strength: 50.0,
            iteration_loop_intensity: 50.0,
            planning_signal: 50.0,
            surface_area_per_change: 50.0,
            shipping_rhythm: 50.0,
            ai_collaboration_rate: None,
            ai_tool_diversity: None,
            ai_tools_detected: None,
        }
    }

    fn cohort(count: usize, persona: &str) -> Vec<CommunitySnapshot> {
        (0..count).map(|i| snapshot(i, persona)).collect()
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn published(stats: CommunityStats) -> CommunityStatsPayload {
        match stats {
            CommunityStats::Published(payload) => payload,
            CommunityStats::Suppressed(s) => panic!("unexpected suppression: {:?}", s),
        }
    }

    fn assert_sums_to_100(values: &[f64]) {
        let sum: f64 = values.iter().sum();
        assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum was {}", sum);
    }

    #[test]
    fn test_suppressed_below_global_threshold() {
        let config = RollupConfig::default();
        for n in 0..10 {
            let stats = compute_community_rollup(&cohort(n, "prompt_sprinter"), &config, fixed_now());
            assert_eq!(
                stats,
                CommunityStats::Suppressed(CommunityStatsSuppressed {
                    reason: SuppressionReason::InsufficientData,
                    eligible_profiles: n,
                    threshold: 10,
                })
            );
        }
    }

    #[test]
    fn test_nine_snapshots_suppressed() {
        let stats = compute_community_rollup(
            &cohort(9, "balanced_builder"),
            &RollupConfig::default(),
            fixed_now(),
        );
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["suppressed"], true);
        assert_eq!(value["reason"], "insufficient_data");
        assert_eq!(value["eligible_profiles"], 9);
    }

    #[test]
    fn test_ten_identical_snapshots_hide_persona() {
        let payload = published(compute_community_rollup(
            &cohort(10, "prompt_sprinter"),
            &RollupConfig::default(),
            fixed_now(),
        ));

        assert_eq!(payload.eligible_profiles, 10);
        assert!(payload.personas.is_empty());
        assert_eq!(payload.persona_confidence.high, 100.0);
    }

    #[test]
    fn test_coverage_totals_are_exact_sums() {
        let mut snapshots = cohort(12, "balanced_builder");
        for (i, s) in snapshots.iter_mut().enumerate() {
            s.total_commits = 80 + i as u64 * 7;
            s.total_repos = 1 + i as u64;
        }
        let expected_commits: u64 = snapshots.iter().map(|s| s.total_commits).sum();

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));
        assert_eq!(payload.total_analyzed_commits, expected_commits);
        assert_eq!(payload.eligible_repos, (1..=12).sum::<u64>());
    }

    #[test]
    fn test_small_persona_buckets_are_omitted() {
        let mut snapshots = cohort(25, "balanced_builder");
        snapshots.extend((25..30).map(|i| snapshot(i, "rapid_risk_taker")));

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));

        assert_eq!(
            payload.personas,
            vec![PersonaShare {
                id: "balanced_builder".to_string(),
                name: "Balanced Builder".to_string(),
                pct: 83.3,
            }]
        );
        let listed: f64 = payload.personas.iter().map(|p| p.pct).sum();
        assert!(listed < 100.0);
    }

    #[test]
    fn test_personas_sorted_by_share() {
        let mut snapshots = cohort(30, "prompt_sprinter");
        snapshots.extend((30..70).map(|i| snapshot(i, "spec_first_director")));
        snapshots.extend((70..100).map(|i| snapshot(i, "fix_loop_hacker")));

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));

        let ids: Vec<&str> = payload.personas.iter().map(|p| p.id.as_str()).collect();
        // Equal shares fall back to id order
        assert_eq!(
            ids,
            vec!["spec_first_director", "fix_loop_hacker", "prompt_sprinter"]
        );
        assert_eq!(payload.personas[0].pct, 40.0);
        assert_sums_to_100(&payload.personas.iter().map(|p| p.pct).collect::<Vec<_>>());
    }

    #[test]
    fn test_bucket_threshold_comes_from_config() {
        let config = RollupConfig {
            bucket_threshold: 5,
            ..RollupConfig::default()
        };
        let mut snapshots = cohort(25, "balanced_builder");
        snapshots.extend((25..30).map(|i| snapshot(i, "rapid_risk_taker")));

        let payload = published(compute_community_rollup(&snapshots, &config, fixed_now()));
        assert_eq!(payload.personas.len(), 2);
        assert_eq!(payload.personas[1].id, "rapid_risk_taker");
        assert_eq!(payload.personas[1].pct, 16.7);
    }

    #[test]
    fn test_global_threshold_comes_from_config() {
        let config = RollupConfig {
            global_threshold: 3,
            ..RollupConfig::default()
        };

        assert_eq!(
            compute_community_rollup(&cohort(2, "balanced_builder"), &config, fixed_now()),
            CommunityStats::Suppressed(CommunityStatsSuppressed {
                reason: SuppressionReason::InsufficientData,
                eligible_profiles: 2,
                threshold: 3,
            })
        );

        let payload = published(compute_community_rollup(
            &cohort(3, "balanced_builder"),
            &config,
            fixed_now(),
        ));
        assert_eq!(payload.eligible_profiles, 3);
    }

    #[test]
    fn test_confidence_always_has_three_shares() {
        let mut snapshots = cohort(30, "balanced_builder");
        for (i, s) in snapshots.iter_mut().enumerate() {
            s.persona_confidence = match i % 3 {
                0 => PersonaConfidence::High,
                1 => PersonaConfidence::Medium,
                _ => PersonaConfidence::Low,
            };
        }

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));
        let shares = payload.persona_confidence;
        assert_eq!(shares.high, 33.3);
        assert_eq!(shares.medium, 33.3);
        assert_eq!(shares.low, 33.3);
        assert_sums_to_100(&[shares.high, shares.medium, shares.low]);

        let value = serde_json::to_value(&payload.persona_confidence).unwrap();
        assert_eq!(value.as_object().map(|o| o.len()), Some(3));
    }

    #[test]
    fn test_percentile_interpolation() {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&values, 25.0), 18.0);
        assert_eq!(percentile(&values, 50.0), 25.0);
        assert_eq!(percentile(&values, 75.0), 33.0);
        assert_eq!(percentile(&values, 0.0), 10.0);
        assert_eq!(percentile(&values, 100.0), 40.0);
    }

    #[test]
    fn test_percentile_exact_index_returns_element() {
        let values = [1.5, 2.5, 3.5, 4.5, 5.5];
        assert_eq!(percentile(&values, 25.0), 2.5);
        assert_eq!(percentile(&values, 50.0), 3.5);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[42.0], 75.0), 42.0);
    }

    #[test]
    fn test_axis_quartiles_are_ordered() {
        let mut snapshots = cohort(11, "balanced_builder");
        for (i, s) in snapshots.iter_mut().enumerate() {
            s.automation_heaviness = ((i * 37) % 100) as f64;
            s.shipping_rhythm = 100.0 - (i * 9) as f64;
            s.planning_signal = f64::NAN;
        }

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));

        assert_eq!(payload.axes.len(), 6);
        for (axis, q) in &payload.axes {
            assert!(q.p25 <= q.p50 && q.p50 <= q.p75, "{} out of order", axis);
        }
        // Only non-finite values on this axis
        assert_eq!(
            payload.axes[&AxisKey::PlanningSignal],
            AxisQuartiles::default()
        );
    }

    #[test]
    fn test_axis_example_values() {
        let mut snapshots = cohort(10, "balanced_builder");
        let values = [10.0, 20.0, 30.0, 40.0];
        for (i, s) in snapshots.iter_mut().enumerate() {
            s.automation_heaviness = values[i % 4];
        }
        // Sorted: 10,10,10,20,20,20,30,30,40,40
        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));
        let q = payload.axes[&AxisKey::AutomationHeaviness];
        assert_eq!(q.p25, 13.0);
        assert_eq!(q.p50, 20.0);
        assert_eq!(q.p75, 30.0);
    }

    #[test]
    fn test_collaboration_buckets() {
        assert_eq!(collaboration_bucket(0.0), CollaborationBucket::None);
        assert_eq!(collaboration_bucket(0.05), CollaborationBucket::Light);
        assert_eq!(collaboration_bucket(0.1), CollaborationBucket::Light);
        assert_eq!(collaboration_bucket(0.3), CollaborationBucket::Moderate);
        assert_eq!(collaboration_bucket(0.6), CollaborationBucket::Heavy);
        assert_eq!(collaboration_bucket(0.61), CollaborationBucket::AiNative);
        assert_eq!(collaboration_bucket(1.0), CollaborationBucket::AiNative);
    }

    #[test]
    fn test_diversity_buckets() {
        assert_eq!(diversity_bucket(0).label(), "0");
        assert_eq!(diversity_bucket(1).label(), "1");
        assert_eq!(diversity_bucket(2).label(), "2");
        assert_eq!(diversity_bucket(3).label(), "3+");
        assert_eq!(diversity_bucket(9).label(), "3+");
    }

    fn with_ai(mut s: CommunitySnapshot, rate: f64, diversity: Option<u32>) -> CommunitySnapshot {
        s.ai_tools_detected = Some(true);
        s.ai_collaboration_rate = Some(rate);
        s.ai_tool_diversity = diversity;
        s
    }

    #[test]
    fn test_ai_tools_suppressed_below_threshold() {
        let mut snapshots: Vec<CommunitySnapshot> = (0..24)
            .map(|i| with_ai(snapshot(i, "prompt_sprinter"), 0.5, Some(1)))
            .collect();
        // Detected but without a rate, so not part of the sub-cohort
        let mut no_rate = snapshot(24, "prompt_sprinter");
        no_rate.ai_tools_detected = Some(true);
        snapshots.push(no_rate);
        // Has a rate but detection flag is false
        let mut not_detected = with_ai(snapshot(25, "prompt_sprinter"), 0.2, Some(1));
        not_detected.ai_tools_detected = Some(false);
        snapshots.push(not_detected);

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));
        assert!(payload.ai_tools.is_none());

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["ai_tools"].is_null());
    }

    #[test]
    fn test_ai_tools_buckets() {
        let rates = [0.0, 0.05, 0.2, 0.5, 0.9];
        let diversities = [None, Some(0), Some(1), Some(2), Some(5)];
        let snapshots: Vec<CommunitySnapshot> = (0..25)
            .map(|i| with_ai(snapshot(i, "prompt_sprinter"), rates[i % 5], diversities[i / 5]))
            .collect();

        let payload = published(compute_community_rollup(
            &snapshots,
            &RollupConfig::default(),
            fixed_now(),
        ));
        let ai = payload.ai_tools.expect("ai tools published");

        assert_eq!(ai.eligible_profiles, 25);
        let rate_labels: Vec<&str> = ai.collaboration_rate.iter().map(|b| b.bucket.as_str()).collect();
        assert_eq!(rate_labels, vec!["none", "light", "moderate", "heavy", "ai-native"]);
        assert!(ai.collaboration_rate.iter().all(|b| b.pct == 20.0));

        // Missing diversity counts land in the "0" bucket
        let diversity: Vec<(&str, f64)> = ai
            .tool_diversity
            .iter()
            .map(|b| (b.bucket.as_str(), b.pct))
            .collect();
        assert_eq!(
            diversity,
            vec![("0", 40.0), ("1", 20.0), ("2", 20.0), ("3+", 20.0)]
        );
        assert_sums_to_100(&ai.collaboration_rate.iter().map(|b| b.pct).collect::<Vec<_>>());
        assert_sums_to_100(&ai.tool_diversity.iter().map(|b| b.pct).collect::<Vec<_>>());
    }

    #[test]
    fn test_rollup_is_idempotent_apart_from_timestamps() {
        let mut snapshots = cohort(40, "balanced_builder");
        for (i, s) in snapshots.iter_mut().enumerate() {
            s.guardrail_strength = (i * 3) as f64;
            if i % 2 == 0 {
                s.ai_tools_detected = Some(true);
                s.ai_collaboration_rate = Some(i as f64 / 40.0);
            }
        }
        let config = RollupConfig {
            bucket_threshold: 20,
            ..RollupConfig::default()
        };

        let first = published(compute_community_rollup(&snapshots, &config, fixed_now()));
        let second = published(compute_community_rollup(&snapshots, &config, Utc::now()));

        assert_eq!(first.personas, second.personas);
        assert_eq!(first.persona_confidence, second.persona_confidence);
        assert_eq!(first.axes, second.axes);
        assert_eq!(first.ai_tools, second.ai_tools);
        assert!(first.ai_tools.is_some());
    }

    #[test]
    fn test_meta_block() {
        let config = RollupConfig {
            window: "7d".to_string(),
            ..RollupConfig::default()
        };
        let as_of = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
        let payload = published(compute_community_rollup_as_of(
            &cohort(10, "balanced_builder"),
            &config,
            as_of,
            fixed_now(),
        ));

        assert_eq!(payload.meta.window, "7d");
        assert_eq!(payload.meta.version, "v1");
        assert_eq!(payload.meta.as_of, as_of);
        assert_eq!(payload.meta.generated_at, fixed_now());
    }

    #[test]
    fn test_is_eligible() {
        let config = RollupConfig::default();
        let mut s = snapshot(0, "balanced_builder");
        s.total_commits = 79;
        assert!(!is_eligible(&s, &config));
        s.total_commits = 80;
        assert!(is_eligible(&s, &config));
    }

    #[test]
    fn test_round_pct() {
        assert_eq!(round_pct(25, 30), 83.3);
        assert_eq!(round_pct(1, 3), 33.3);
        assert_eq!(round_pct(2, 3), 66.7);
        assert_eq!(round_pct(0, 0), 0.0);
    }
}
