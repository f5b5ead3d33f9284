use std::path::Path;

use hearth_core::models::{Household, Member, MemberRole, NotificationPreference};
use serde::Serialize;

use crate::commands::common::{
    format_relative_time, normalize_title, now_ms, open_store, resolve_household, short_id,
};
use crate::error::CliError;

pub async fn run_init(name: &str, admin: &str, db_path: &Path) -> Result<(), CliError> {
    let name = normalize_title(name)?;
    let admin = normalize_title(admin)?;

    let store = open_store(db_path)?;
    let household = store.insert(Household::new(name)).await?;
    let member = store
        .insert(Member::new(household.id, admin, MemberRole::Admin))
        .await?;
    store
        .insert(NotificationPreference::new(household.id, member.id))
        .await?;

    println!("Household {} created", household.id);
    println!("Invite code: {}", household.invite_code);
    println!("Admin member: {}", member.id);
    Ok(())
}

pub async fn run_member_add(
    name: &str,
    admin: bool,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let name = normalize_title(name)?;
    let role = if admin {
        MemberRole::Admin
    } else {
        MemberRole::Member
    };

    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;
    let member = store.insert(Member::new(household.id, name, role)).await?;
    store
        .insert(NotificationPreference::new(household.id, member.id))
        .await?;

    println!("{}", member.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct MemberListItem {
    id: String,
    display_name: String,
    role: MemberRole,
    points_balance: i64,
    relative_time: String,
}

pub async fn run_member_list(
    as_json: bool,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;
    let members: Vec<Member> = store.find_by_household(&household.id.as_str()).await?;

    if as_json {
        let now = now_ms();
        let items = members
            .iter()
            .map(|member| MemberListItem {
                id: member.id.as_str(),
                display_name: member.display_name.clone(),
                role: member.role,
                points_balance: member.points_balance,
                relative_time: format_relative_time(member.modified, now),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if members.is_empty() {
        println!("No members yet.");
        return Ok(());
    }

    for member in &members {
        let role = if member.is_admin() { "admin" } else { "member" };
        println!(
            "{:<13}  {:<20}  {:<6}  {:>5} pts",
            short_id(&member.id.as_str()),
            member.display_name,
            role,
            member.points_balance
        );
    }
    Ok(())
}
