use std::path::Path;

use hearth_core::models::{Member, PointAdjustment, Redemption};
use hearth_core::Reward;
use serde::Serialize;

use crate::commands::common::{
    format_relative_time, normalize_title, now_ms, open_store, resolve_by_prefix,
    resolve_household, short_id,
};
use crate::error::CliError;

pub async fn run_reward_add(
    title: &str,
    cost: i64,
    quantity: Option<u32>,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let title = normalize_title(title)?;

    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;

    let mut reward = Reward::new(household.id, title, cost);
    reward.quantity = quantity;
    let reward = store.insert(reward).await?;

    println!("{}", reward.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct RewardListItem {
    id: String,
    title: String,
    cost: i64,
    quantity: Option<u32>,
    relative_time: String,
}

pub async fn run_reward_list(
    as_json: bool,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;
    let rewards: Vec<Reward> = store.find_by_household(&household.id.as_str()).await?;

    if as_json {
        let now = now_ms();
        let items = rewards
            .iter()
            .map(|reward| RewardListItem {
                id: reward.id.as_str(),
                title: reward.title.clone(),
                cost: reward.cost,
                quantity: reward.quantity,
                relative_time: format_relative_time(reward.modified, now),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if rewards.is_empty() {
        println!("No rewards yet.");
        return Ok(());
    }

    let now = now_ms();
    for reward in &rewards {
        let stock = reward
            .quantity
            .map_or_else(String::new, |remaining| format!("  {remaining} left"));
        println!(
            "{:<13}  {:<30}  {:>4} pts  {}{stock}",
            short_id(&reward.id.as_str()),
            reward.title,
            reward.cost,
            format_relative_time(reward.modified, now)
        );
    }
    Ok(())
}

/// Redeem a reward: records the redemption and a negative point adjustment,
/// and decrements limited stock optimistically. The server is authoritative
/// for balance checks and quantity limits; offline redemptions reconcile on
/// the next sync.
pub async fn run_reward_redeem(id: &str, member: &str, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let mut reward: Reward = resolve_by_prefix(&store, id).await?;
    let member: Member = resolve_by_prefix(&store, member).await?;

    if !reward.is_available() {
        return Err(CliError::RewardUnavailable(reward.title));
    }

    let redemption = store.insert(Redemption::new(&reward, member.id)).await?;
    store
        .insert(PointAdjustment::new(
            reward.household_id,
            member.id,
            -reward.cost,
            format!("Redeemed {}", reward.title),
        ))
        .await?;

    if let Some(remaining) = reward.quantity {
        reward.quantity = Some(remaining.saturating_sub(1));
        store.upsert(reward).await?;
    }

    println!("{}", redemption.id);
    Ok(())
}
