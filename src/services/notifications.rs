use crate::models::{new_id, Notification};
use crate::state::AppState;

/// Stores a notification for `user_id`.
///
/// A failed write is logged and swallowed; the triggering action has already succeeded.
pub async fn notify(state: &AppState, user_id: &str, title: &str, message: &str, kind: &str) {
    let notification = Notification {
        id: new_id(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind: kind.to_string(),
        read: false,
        created_at: state.now(),
    };

    if let Err(e) = state.repo::<Notification>().insert(&notification).await {
        tracing::warn!("Failed to store {} notification for {}: {}", kind, user_id, e);
    }
}
