pub mod level;
pub mod prefabs;

pub use level::{load_level, LevelSummary};
