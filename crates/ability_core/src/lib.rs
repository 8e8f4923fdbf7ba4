pub mod core_api;
pub mod game_data;
pub mod link_text;
pub mod markup;
pub mod stat_block;
