pub mod overview;
pub mod plans;
pub mod settings;
pub mod users;
