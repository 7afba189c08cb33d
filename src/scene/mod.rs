pub mod demo_level;
pub mod prefabs;
