//! Report generation.
//!
//! Renders a rollup as the JSON payload served to clients, or as a
//! Markdown summary for humans.

use crate::models::{
    AiToolsDistribution, BucketShare, CommunityStats, CommunityStatsPayload,
    CommunityStatsSuppressed, PersonaConfidence, RollupRecord,
};
use anyhow::Result;

/// Generate the JSON payload for a rollup result.
pub fn generate_json_report(stats: &CommunityStats) -> Result<String> {
    serde_json::to_string_pretty(stats).map_err(Into::into)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(record: &RollupRecord) -> String {
    let mut output = String::new();

    output.push_str("# Community Vibe Rollup\n\n");
    output.push_str(&format!(
        "- **Window:** {}\n- **As Of:** {}\n",
        record.window,
        record.as_of.format("%Y-%m-%d")
    ));

    match &record.stats {
        CommunityStats::Suppressed(suppressed) => {
            output.push_str("\n");
            output.push_str(&generate_suppressed_section(suppressed));
        }
        CommunityStats::Published(payload) => {
            output.push_str(&format!(
                "- **Generated:** {}\n- **Version:** {}\n\n",
                payload.meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                payload.meta.version
            ));
            output.push_str(&generate_coverage_section(payload));
            output.push_str(&generate_personas_section(payload));
            output.push_str(&generate_confidence_section(payload));
            output.push_str(&generate_axes_section(payload));
            output.push_str(&generate_ai_tools_section(payload.ai_tools.as_ref()));
        }
    }

    output
}

fn generate_suppressed_section(suppressed: &CommunityStatsSuppressed) -> String {
    format!(
        "## Suppressed\n\nNot enough eligible profiles to publish community statistics \
         ({} of {} required, reason: `{}`).\n",
        suppressed.eligible_profiles,
        suppressed.threshold,
        suppressed.reason.as_str()
    )
}

fn generate_coverage_section(payload: &CommunityStatsPayload) -> String {
    let mut section = String::new();

    section.push_str("## Coverage\n\n");
    section.push_str("| Profiles | Repositories | Commits |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        payload.eligible_profiles, payload.eligible_repos, payload.total_analyzed_commits
    ));

    section
}

fn generate_personas_section(payload: &CommunityStatsPayload) -> String {
    let mut section = String::new();

    section.push_str("## Personas\n\n");
    if payload.personas.is_empty() {
        section.push_str("No persona has enough profiles to be shown.\n\n");
        return section;
    }

    section.push_str("| Persona | Share |\n");
    section.push_str("|:---|:---:|\n");
    for persona in &payload.personas {
        section.push_str(&format!("| {} | {:.1}% |\n", persona.name, persona.pct));
    }
    section.push_str("\n");

    section
}

fn generate_confidence_section(payload: &CommunityStatsPayload) -> String {
    let shares = payload.persona_confidence;
    let mut header = String::from("|");
    let mut divider = String::from("|");
    let mut row = String::from("|");
    for level in PersonaConfidence::ALL {
        header.push_str(&format!(" {} |", level));
        divider.push_str(":---:|");
        row.push_str(&format!(" {:.1}% |", shares.get(level)));
    }

    format!(
        "## Persona Confidence\n\n{}\n{}\n{}\n\n",
        header, divider, row
    )
}

fn generate_axes_section(payload: &CommunityStatsPayload) -> String {
    let mut section = String::new();

    section.push_str("## Axes\n\n");
    section.push_str("| Axis | p25 | p50 | p75 |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    for (axis, q) in &payload.axes {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            axis.label(),
            q.p25,
            q.p50,
            q.p75
        ));
    }
    section.push_str("\n");

    section
}

fn generate_ai_tools_section(ai_tools: Option<&AiToolsDistribution>) -> String {
    let mut section = String::new();

    section.push_str("## AI Tools\n\n");
    let Some(ai) = ai_tools else {
        section.push_str("Not enough profiles with detected AI tooling to be shown.\n\n");
        return section;
    };

    section.push_str(&format!("*Based on {} profiles.*\n\n", ai.eligible_profiles));
    section.push_str(&bucket_table("Collaboration Rate", &ai.collaboration_rate));
    section.push_str(&bucket_table("Distinct Tools", &ai.tool_diversity));

    section
}

fn bucket_table(title: &str, buckets: &[BucketShare]) -> String {
    let mut table = format!("### {}\n\n| Bucket | Share |\n|:---|:---:|\n", title);
    for bucket in buckets {
        table.push_str(&format!("| {} | {:.1}% |\n", bucket.bucket, bucket.pct));
    }
    table.push_str("\n");
    table
}
