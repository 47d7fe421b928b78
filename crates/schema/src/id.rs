//! Short random identifiers.

use rand::Rng;

/// URL-safe alphabet, 64 symbols (6 bits of entropy per character).
const ALPHABET: &[u8; 64] = b"_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const USER_ID_LEN: usize = 12;
pub const CONVERSATION_ID_LEN: usize = 14;
pub const EVENT_ID_LEN: usize = 18;

/// Generate a random identifier of `size` characters.
pub fn generate(size: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..size)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn user_id() -> String {
    generate(USER_ID_LEN)
}

pub fn conversation_id() -> String {
    generate(CONVERSATION_ID_LEN)
}

pub fn event_id() -> String {
    generate(EVENT_ID_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(user_id().len(), 12);
        assert_eq!(conversation_id().len(), 14);
        assert_eq!(event_id().len(), 18);
    }

    #[test]
    fn test_url_safe() {
        let id = generate(256);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_distinct() {
        assert_ne!(event_id(), event_id());
    }
}
