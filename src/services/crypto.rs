use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 for refresh tokens and return as hexadecimal string
pub fn hmac_sha256_token(key: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    let result = mac.finalize();
    format!("{:x}", result.into_bytes())
}

/// Generate a temporary password for administrative resets
///
/// Format: `TEMP-` followed by 8 characters drawn from a charset without
/// confusable glyphs (no 0/O, 1/I), using a cryptographically secure
/// random number generator. The value is handed back to the administrator
/// once and stored only as a hash.
pub fn generate_temp_password() -> String {
    const SUFFIX_LENGTH: usize = 8;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("TEMP-{}", suffix)
}
