pub mod geometry;
pub mod review;
pub mod scoring;

pub use review::{GameResult, SectionStatus};
