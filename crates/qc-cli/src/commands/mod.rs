pub mod check_names;
pub mod dispatch;
pub mod list_checks;
pub mod mute;
pub mod schema;
pub mod stats;
pub mod update_checks;
