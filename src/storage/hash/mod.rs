pub mod bucket;
pub mod directory;
pub mod extendible;

pub use extendible::ExtendibleHash;
