pub mod auth_service;
pub mod collection_service;
pub mod recipe_service;
pub mod reference_service;
pub mod user_service;
