pub mod auth;
pub mod recipes;
pub mod users;
