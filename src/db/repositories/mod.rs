pub mod pharmacy;
pub mod region;
pub mod scan_event;
pub mod user;

use rand::Rng;

/// Alphabet for public tokens: the URL-safe base64 character set.
const PUBLIC_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Token length; matches the entropy of 8 random bytes encoded as base64url.
const PUBLIC_ID_LEN: usize = 11;

/// Generate the opaque public token carried by regions and pharmacies.
///
/// Tokens are random, carry no information about the entity they identify,
/// and are safe to embed in QR codes.
#[must_use]
pub fn generate_public_id() -> String {
    let mut rng = rand::rng();

    (0..PUBLIC_ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..PUBLIC_ID_ALPHABET.len());
            PUBLIC_ID_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn public_ids_are_url_safe() {
        let id = generate_public_id();
        assert_eq!(id.len(), PUBLIC_ID_LEN);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn public_ids_do_not_collide_in_a_reasonable_sample() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_public_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
