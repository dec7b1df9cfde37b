use crate::state;
use crate::error;

pub async fn cleanup(state: state::ArcShared) -> error::Result<()> {
    let now = chrono::Utc::now();
    let conn = state.pool().get().await?;

    let count = conn.execute(
        "delete from auth_otp where expires <= $1",
        &[&now]
    ).await?;

    tracing::info!("dropped {count} expired one time codes");

    Ok(())
}
