/// API route handlers
///
/// - `health`: liveness and database connectivity
/// - `users`: signup, sessions, profile, avatar
/// - `tasks`: ownership-scoped task CRUD

pub mod health;
pub mod tasks;
pub mod users;
