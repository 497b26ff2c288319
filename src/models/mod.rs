pub mod entry;
pub mod item;

pub use entry::LogEntry;
pub use item::{Category, Interaction, InteractionEffect, LifestyleItem};
