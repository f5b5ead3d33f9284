use std::path::Path;

use hearth_core::models::{Completion, Member};
use hearth_core::Chore;
use serde::Serialize;

use crate::commands::common::{
    format_relative_time, normalize_title, now_ms, open_store, resolve_by_prefix,
    resolve_household, short_id,
};
use crate::error::CliError;

pub async fn run_chore_add(
    title: &str,
    points: i64,
    assign: Option<&str>,
    due: Option<i64>,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let title = normalize_title(title)?;

    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;

    let mut chore = Chore::new(household.id, title, points);
    chore.due_at = due;
    if let Some(member_query) = assign {
        let member: Member = resolve_by_prefix(&store, member_query).await?;
        chore.assign(member.id);
    }

    let chore = store.insert(chore).await?;
    println!("{}", chore.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct ChoreListItem {
    id: String,
    title: String,
    points: i64,
    assigned_to: Option<String>,
    due_at: Option<i64>,
    relative_time: String,
}

pub async fn run_chore_list(
    as_json: bool,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;
    let chores: Vec<Chore> = store.find_by_household(&household.id.as_str()).await?;

    if as_json {
        let now = now_ms();
        let items = chores
            .iter()
            .map(|chore| ChoreListItem {
                id: chore.id.as_str(),
                title: chore.title.clone(),
                points: chore.points,
                assigned_to: chore.assigned_to.map(|member| member.as_str()),
                due_at: chore.due_at,
                relative_time: format_relative_time(chore.modified, now),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if chores.is_empty() {
        println!("No chores yet.");
        return Ok(());
    }

    let now = now_ms();
    for chore in &chores {
        let overdue = if chore.is_overdue(now) { "  OVERDUE" } else { "" };
        println!(
            "{:<13}  {:<30}  {:>4} pts  {}{overdue}",
            short_id(&chore.id.as_str()),
            chore.title,
            chore.points,
            format_relative_time(chore.modified, now)
        );
    }
    Ok(())
}

pub async fn run_chore_done(
    id: &str,
    member: &str,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let mut household = resolve_household(&store, household).await?;
    let chore: Chore = resolve_by_prefix(&store, id).await?;
    let member: Member = resolve_by_prefix(&store, member).await?;

    let completion = store.insert(Completion::new(&chore, member.id)).await?;
    household.touch_activity(completion.completed_at);
    store.upsert(household).await?;

    println!("{}", completion.id);
    Ok(())
}

pub async fn run_chore_delete(id: &str, hard: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let chore: Chore = resolve_by_prefix(&store, id).await?;
    store.remove::<Chore>(&chore.id.as_str(), hard).await?;
    println!("{}", chore.id);
    Ok(())
}
