//! Household snapshot export helpers shared by client surfaces.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::{Chore, Completion, Household, Member, Reward};

/// Export output format shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Active records of one household gathered for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    pub household: Household,
    pub members: Vec<Member>,
    pub chores: Vec<Chore>,
    pub rewards: Vec<Reward>,
    pub completions: Vec<Completion>,
}

/// Render a snapshot as pretty-printed JSON.
pub fn render_json_export(snapshot: &HouseholdSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Render a snapshot as a Markdown summary.
#[must_use]
pub fn render_markdown_export(snapshot: &HouseholdSnapshot) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", snapshot.household.name);
    let _ = writeln!(output);
    let _ = writeln!(output, "Invite code: `{}`", snapshot.household.invite_code);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Members");
    for member in &snapshot.members {
        let _ = writeln!(
            output,
            "- {} ({:?}) — {} points",
            member.display_name, member.role, member.points_balance
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Chores");
    for chore in &snapshot.chores {
        let _ = writeln!(output, "- {} — {} points", chore.title, chore.points);
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Rewards");
    for reward in &snapshot.rewards {
        match reward.quantity {
            Some(remaining) => {
                let _ = writeln!(
                    output,
                    "- {} — {} points ({remaining} left)",
                    reward.title, reward.cost
                );
            }
            None => {
                let _ = writeln!(output, "- {} — {} points", reward.title, reward.cost);
            }
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Completions");
    for completion in &snapshot.completions {
        let _ = writeln!(
            output,
            "- chore {} by {} — {:?}, {} points",
            completion.chore_id, completion.member_id, completion.status, completion.points_awarded
        );
    }

    output
}

/// Render a snapshot based on selected export format.
pub fn render_export(
    snapshot: &HouseholdSnapshot,
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(snapshot),
        ExportFormat::Markdown => Ok(render_markdown_export(snapshot)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("hearth-export-{timestamp_ms}.{}", format.extension())
}
