pub mod collection;
pub mod measure;
pub mod summary;
