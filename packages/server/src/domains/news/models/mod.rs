pub mod category;
pub mod news_document;
pub mod taxonomy;

pub use category::NewsCategory;
pub use news_document::NewsDocument;
pub use taxonomy::{CategoryRow, TagRow};
