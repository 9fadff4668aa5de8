pub mod item;
pub mod meta;
