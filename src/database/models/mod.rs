pub mod client;
pub mod project;
pub mod user;
