/// Database models
///
/// - `user`: user accounts, profile fields, avatar storage
/// - `task`: per-user tasks with filtered, ownership-scoped retrieval
/// - `session`: the per-user list of active session tokens

pub mod session;
pub mod task;
pub mod user;

/// Checks a partial-update body against a field whitelist.
///
/// The check is all-or-nothing: one unknown key rejects the entire update
/// before anything is applied.
///
/// # Returns
///
/// `Ok(())` when every key is allowed, `Err` naming the first offender
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::validate_update_keys;
/// use serde_json::json;
///
/// let body = json!({ "description": "x", "completed": true });
/// let map = body.as_object().unwrap();
/// assert!(validate_update_keys(map, &["description", "completed"]).is_ok());
/// ```
pub fn validate_update_keys(
    body: &serde_json::Map<String, serde_json::Value>,
    allowed: &[&str],
) -> Result<(), String> {
    for key in body.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(format!("Invalid update field: {}", key));
        }
    }
    Ok(())
}
