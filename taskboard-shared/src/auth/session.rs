/// Session tokens and signed cookie values
///
/// A session is identified by an opaque random token stored server-side (see
/// [`crate::session`]). The browser only ever receives the token together
/// with an HMAC-SHA256 signature over it, so a cookie that was not issued by
/// this server is rejected before the session store is consulted.
///
/// - **Token**: 32 random base62 characters
/// - **Cookie value**: `{token}.{hex(hmac_sha256(secret, token))}`
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::session::{generate_session_token, sign_token, verify_signed_token};
///
/// let secret = "a-secret-key-of-at-least-32-bytes!!";
/// let token = generate_session_token();
/// let cookie = sign_token(&token, secret);
///
/// assert_eq!(verify_signed_token(&cookie, secret), Some(token));
/// assert_eq!(verify_signed_token("forged.value", secret), None);
/// ```

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a session token (characters)
pub const SESSION_TOKEN_LENGTH: usize = 32;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a new random session token
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();

    (0..SESSION_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}

/// Checks that a token has the shape produced by [`generate_session_token`]
pub fn is_valid_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

fn mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

/// Produces the cookie value for `token`
pub fn sign_token(token: &str, secret: &str) -> String {
    let mut mac = mac(secret);
    mac.update(token.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    format!("{}.{}", token, signature)
}

/// Extracts the token from a cookie value if its signature is valid
///
/// Signature comparison is constant-time.
pub fn verify_signed_token(value: &str, secret: &str) -> Option<String> {
    let (token, signature) = value.split_once('.')?;
    if !is_valid_token_format(token) {
        return None;
    }

    let signature = hex::decode(signature).ok()?;

    let mut mac = mac(secret);
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(token.to_string())
}
