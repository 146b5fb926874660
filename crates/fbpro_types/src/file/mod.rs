//! File type support for `fbpro-rs` project.

mod error;

pub mod anim;

// Re-export error types
pub use error::{DecodeError, FormatError, HeaderMismatchError, StreamDecodeError};

// Re-export main file types
pub use anim::{
	AnimationData, AnimationDatabase, AnimationEntry, ColorTable, ColorTableBank, ColorTableId,
	DecodedSprite, LoadConfig, RemapMode, RenderableSprite, SpriteCache, SpriteId,
	SpriteReference, load_database,
};
