pub mod community;
pub mod health;
