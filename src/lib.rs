pub mod arg_parser;
pub mod card_config;
pub mod controls;
pub mod diagram;
pub mod discovery;
pub mod entity_state;
pub mod errors;
pub mod heat_curve;
pub mod heat_curve_view;
pub mod layout;
pub mod logger;
