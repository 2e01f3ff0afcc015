pub mod profile;
pub mod profile_store;
pub mod prompt;
pub mod shortcut;
pub mod upstream;
