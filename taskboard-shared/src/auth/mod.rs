/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Session token generation and signed cookie values
/// - [`authorization`]: Ownership checks along user → project → task
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::auth::session::{generate_session_token, sign_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("password123")?;
/// assert!(verify_password("password123", &hash)?);
///
/// let token = generate_session_token();
/// let cookie_value = sign_token(&token, "a-secret-key-of-at-least-32-bytes!!");
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod password;
pub mod session;
