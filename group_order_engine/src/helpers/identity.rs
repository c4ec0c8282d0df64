//! Derivation of the presentation-only identity fields that get stamped onto a lobby and its participants at
//! creation/join time: public lobby ids, share tokens, avatar initials and colour tags.
use std::env;

use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::db_types::GroupOrderId;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://cribnosh.app";

const SHARE_TOKEN_LEN: usize = 24;

/// The avatar colour palette. Participants are assigned a colour from this palette, keyed by their join order.
const COLOR_PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E9", "#F8C471",
];

/// Generates a new public lobby identifier, e.g. `GRP-1722500000000-9XKQ2F`. The timestamp prefix keeps ids roughly
/// sortable; the random suffix makes collisions within a millisecond vanishingly unlikely.
pub fn new_group_order_id() -> GroupOrderId {
    let suffix: String =
        thread_rng().sample_iter(&Alphanumeric).take(6).map(|c| (c as char).to_ascii_uppercase()).collect();
    GroupOrderId(format!("GRP-{}-{suffix}", Utc::now().timestamp_millis()))
}

/// Generates a fresh share token. The token is the capability for joining a lobby, so it must be unguessable.
pub fn new_share_token() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(SHARE_TOKEN_LEN).map(char::from).collect()
}

/// Builds the public invite URL for a share token. The base URL comes from `CN_SHARE_BASE_URL` when set.
pub fn share_link_for_token(token: &str) -> String {
    let base = env::var("CN_SHARE_BASE_URL").unwrap_or_else(|_| DEFAULT_SHARE_BASE_URL.to_string());
    format!("{base}/group-order/{token}")
}

/// Derives up-to-two-letter avatar initials from a display name. Falls back to "U" for empty names.
pub fn derive_initials(display_name: &str) -> String {
    let initials: String = display_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect();
    if initials.is_empty() {
        "U".to_string()
    } else {
        initials
    }
}

/// Picks an avatar colour for the participant joining at position `join_index` (0-based).
pub fn color_tag_for_join_index(join_index: usize) -> String {
    COLOR_PALETTE[join_index % COLOR_PALETTE.len()].to_string()
}

/// The default lobby title when the creator doesn't supply one.
pub fn default_lobby_title(creator_name: &str, restaurant_name: &str) -> String {
    format!("{creator_name}'s group order from {restaurant_name}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initials_from_full_names() {
        assert_eq!(derive_initials("Maria Okafor"), "MO");
        assert_eq!(derive_initials("maria"), "M");
        assert_eq!(derive_initials("Maria Anne Okafor"), "MA");
        assert_eq!(derive_initials(""), "U");
        assert_eq!(derive_initials("   "), "U");
    }

    #[test]
    fn colors_cycle_through_the_palette() {
        assert_eq!(color_tag_for_join_index(0), "#FF6B6B");
        assert_eq!(color_tag_for_join_index(9), "#F8C471");
        assert_eq!(color_tag_for_join_index(10), color_tag_for_join_index(0));
    }

    #[test]
    fn group_order_ids_are_unique() {
        let a = new_group_order_id();
        let b = new_group_order_id();
        assert!(a.as_str().starts_with("GRP-"));
        assert_ne!(a, b);
    }

    #[test]
    fn share_tokens_are_long_enough() {
        let token = new_share_token();
        assert_eq!(token.len(), 24);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn default_title() {
        assert_eq!(default_lobby_title("Maria", "Maria's Kitchen"), "Maria's group order from Maria's Kitchen");
    }
}
