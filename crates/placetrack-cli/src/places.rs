//! Seeding commands for places and tracked keywords.

use sqlx::PgPool;

pub(crate) async fn run_place_add(
    pool: &PgPool,
    name: &str,
    external_id: Option<&str>,
) -> anyhow::Result<()> {
    let external_id = external_id.map(str::trim).filter(|id| !id.is_empty());
    let place = placetrack_db::insert_place(pool, name.trim(), external_id).await?;
    println!(
        "added place {} ({}){}",
        place.id,
        place.name,
        place
            .external_id
            .as_deref()
            .map(|id| format!(" listing {id}"))
            .unwrap_or_default()
    );
    Ok(())
}

/// Track `keyword` (optionally region-qualified) for a place.
///
/// # Errors
///
/// Returns an error if the place does not exist or the insert fails.
pub(crate) async fn run_keyword_track(
    pool: &PgPool,
    place_id: i64,
    keyword: &str,
    region: Option<&str>,
) -> anyhow::Result<()> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        anyhow::bail!("keyword must not be blank");
    }
    if placetrack_db::get_place(pool, place_id).await?.is_none() {
        anyhow::bail!("place {place_id} not found");
    }

    let region = region.map(str::trim).filter(|r| !r.is_empty());
    let id = placetrack_db::track_keyword(pool, place_id, keyword, region).await?;
    println!(
        "tracking keyword {id}: \"{keyword}\"{} for place {place_id}",
        region.map(|r| format!(" in {r}")).unwrap_or_default()
    );
    Ok(())
}

pub(crate) async fn run_keyword_set_active(
    pool: &PgPool,
    id: i64,
    active: bool,
) -> anyhow::Result<()> {
    match placetrack_db::set_tracked_keyword_active(pool, id, active).await {
        Ok(()) => {
            println!(
                "tracked keyword {id} {}",
                if active { "activated" } else { "deactivated" }
            );
            Ok(())
        }
        Err(placetrack_db::DbError::NotFound) => anyhow::bail!("tracked keyword {id} not found"),
        Err(e) => Err(e.into()),
    }
}
