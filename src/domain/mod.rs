pub mod candidate;
pub mod field_extractor;
pub mod keyword;
pub mod product;
pub mod ranking;
