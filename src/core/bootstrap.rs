use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;

/// Seeds the options listed in MENTORLINK_DEFAULT_OPTIONS so a fresh install
/// has tracks to sign up against. Existing options are left untouched.
pub(crate) async fn ensure_default_options(state: &AppState) -> anyhow::Result<()> {
    let defaults = &state.settings().bootstrap().default_options;
    if defaults.is_empty() {
        tracing::warn!("MENTORLINK_DEFAULT_OPTIONS not configured; skipping option seeding");
        return Ok(());
    }

    let now = primitive_now_utc();
    for name in defaults {
        let existing = repositories::options::find_by_name(state.db(), name).await?;
        if existing.is_some() {
            continue;
        }

        repositories::options::create(state.db(), &Uuid::new_v4().to_string(), name, now).await?;
        tracing::info!(option = %name, "Seeded default option");
    }

    Ok(())
}
