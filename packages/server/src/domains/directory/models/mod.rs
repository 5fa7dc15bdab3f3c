pub mod entry;

pub use entry::{
    DirectoryEntry, EntryTier, NewDirectoryEntry, MAX_EXPOSURE_WEIGHT, MIN_EXPOSURE_WEIGHT,
};
