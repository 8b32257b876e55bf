// Skincare core - local profile and collection store
// Entry point: loads the stored data, reports what is there, shuts down cleanly

use anyhow::Context;
use skincare_core::app::AppState;
use skincare_core::config::StoreConfig;
use skincare_core::models::RoutineType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skincare_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting skincare core");

    let config = StoreConfig::from_env().context("invalid configuration")?;
    let (state, report) = AppState::setup(&config)
        .await
        .context("failed to set up application state")?;

    if !report.failed.is_empty() {
        tracing::warn!("Slots reset to defaults: {:?}", report.failed);
    }

    let snapshot = state.store.snapshot();
    let profile = &snapshot.user_profile;
    tracing::info!(
        "Profile: skin type {}, sensitivity {}, quiz {}",
        profile.skin_type.as_deref().unwrap_or("not specified"),
        profile.sensitivity.as_deref().unwrap_or("not specified"),
        if profile.is_completed() { "completed" } else { "pending" }
    );

    for routine_type in [RoutineType::Morning, RoutineType::Evening] {
        for routine in state.store.routines_of_type(routine_type) {
            let unknown = routine
                .steps
                .iter()
                .filter(|s| s.descriptor().is_none())
                .count();
            tracing::info!(
                "{} routine '{}': {}/{} steps done, {} unrecognized",
                routine_type.label(),
                routine.name,
                routine.completed_steps(),
                routine.steps.len(),
                unknown
            );
        }
    }

    tracing::info!(
        "{} progress entries, {} wishlist items",
        snapshot.progress_entries.len(),
        snapshot.wishlist.len()
    );

    state.shutdown().await;
    Ok(())
}
