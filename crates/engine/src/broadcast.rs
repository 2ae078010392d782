use teamsync_core::errors::SyncResult;
use teamsync_core::render;
use tracing::{info, warn};

use crate::context::SyncContext;

/// Post an update announcement to the update log channel of every community that has one.
///
/// Returns how many channels received it. A failing community does not stop the others.
pub async fn broadcast_update(ctx: &SyncContext, text: &str) -> SyncResult<usize> {
    let document = ctx.load_config().await?;
    let message = render::update_announcement(text);

    let mut reached = 0;
    for (community_id, community) in &document.communities {
        let Some(channel_id) = community.update_logs_channel else {
            continue;
        };
        match ctx.send(channel_id, &message).await {
            Ok(_) => reached += 1,
            Err(e) => warn!(
                "Could not post update to community {} channel {}: {}",
                community_id, channel_id, e
            ),
        }
    }

    info!("Update announcement reached {} channels", reached);
    Ok(reached)
}
