use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Create a new session token for the auth cookie.
/// The raw value is only returned to set the cookie; the store keeps a hash.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Hash a session token so raw values never touch the store.
#[must_use]
pub fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_32_bytes_url_safe() -> Result<()> {
        let token = generate_session_token()?;
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        let decoded = Base64UrlUnpadded::decode_vec(&token)
            .map_err(|err| anyhow::anyhow!("decode failed: {err}"))?;
        assert_eq!(decoded.len(), 32);
        Ok(())
    }

    #[test]
    fn generated_tokens_differ() -> Result<()> {
        assert_ne!(generate_session_token()?, generate_session_token()?);
        Ok(())
    }

    #[test]
    fn hash_session_token_stable() {
        let first = hash_session_token("token");
        let second = hash_session_token("token");
        let different = hash_session_token("other");
        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 32);
    }
}
