// HTTP routes
pub mod auth;
pub mod health;
pub mod items;

pub use auth::*;
pub use health::*;
pub use items::*;
