pub mod lobby_flow_api;
pub mod lobby_objects;
