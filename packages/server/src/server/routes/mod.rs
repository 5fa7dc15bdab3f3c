// HTTP routes
pub mod admin;
pub mod directory;
pub mod health;
pub mod news;

pub use admin::*;
pub use directory::*;
pub use health::*;
pub use news::*;
