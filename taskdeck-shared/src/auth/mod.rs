/// Authentication primitives
///
/// - `password`: Argon2id password hashing and the signup strength rule
/// - `token`: signed session tokens issued at signup/login

pub mod password;
pub mod token;
