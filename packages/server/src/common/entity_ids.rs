//! Typed ID definitions for all domain entities.

pub use super::id::Id;

/// Marker type for directory entries (business cards).
pub struct DirectoryEntry;

/// Marker type for news documents.
pub struct NewsDocument;

/// Marker type for news category rows.
pub struct NewsCategoryRow;

/// Marker type for news tag rows.
pub struct NewsTag;

pub type EntryId = Id<DirectoryEntry>;

pub type NewsId = Id<NewsDocument>;

pub type CategoryId = Id<NewsCategoryRow>;

pub type TagId = Id<NewsTag>;
