mod identity;
mod totals;

pub use identity::{color_tag_for_join_index, default_lobby_title, derive_initials, new_group_order_id, new_share_token, share_link_for_token, DEFAULT_SHARE_BASE_URL};
pub use totals::{group_discount_percent, LobbyTotals, GROUP_DISCOUNT_PERCENT};
