pub mod aniworld;

pub use aniworld::AniworldExtractor;
