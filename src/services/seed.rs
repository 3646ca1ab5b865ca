use anyhow::{Context, Result};
use chrono::Datelike;
use serde_json::json;
use tracing::info;

use crate::auth;
use crate::models::{Admin, Holiday, LeaveSettings, OrganizationSettings};
use crate::services::{calendar, holidays};
use crate::state::AppState;

/// Startup bootstrap: schema, default admin, singleton settings and this year's holidays.
///
/// Every step only fills in what is missing, so it is safe on every start.
pub async fn run(state: &AppState) -> Result<()> {
    state.store.ensure_schema().await.context("creating document schema")?;

    let now = state.now();
    let admins = state.repo::<Admin>();
    if admins.count(json!({})).await? == 0 {
        let seed = &state.config.seed;
        let hash = auth::hash_password(&seed.admin_password, state.config.security.bcrypt_cost)?;
        admins
            .insert(&Admin::new(seed.admin_name.clone(), seed.admin_email.to_lowercase(), hash, now))
            .await?;
        info!("Created default admin {}", seed.admin_email);
    }

    let leave_settings = state.repo::<LeaveSettings>();
    if leave_settings.count(json!({ "id": LeaveSettings::SINGLETON_ID })).await? == 0 {
        leave_settings.insert(&LeaveSettings::defaults(now)).await?;
        info!("Created default leave settings");
    }

    let org_settings = state.repo::<OrganizationSettings>();
    if org_settings.count(json!({ "id": OrganizationSettings::SINGLETON_ID })).await? == 0 {
        org_settings.insert(&OrganizationSettings::defaults(now)).await?;
        info!("Created default organization settings");
    }

    let year = state.today().year();
    if let Some((first, last)) = calendar::year_bounds(year) {
        let holiday_repo = state.repo::<Holiday>();
        let existing = holiday_repo
            .count(json!({ "date": { "$gte": first, "$lte": last } }))
            .await?;
        if existing == 0 {
            let defaults = holidays::default_holidays(year, now);
            for holiday in &defaults {
                holiday_repo.insert(holiday).await?;
            }
            info!("Seeded {} default holidays for {}", defaults.len(), year);
        }
    }

    Ok(())
}
