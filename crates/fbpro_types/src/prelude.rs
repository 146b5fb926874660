//! Prelude module for `fbpro_types`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```no_run
//! use fbpro_types::prelude::*;
//!
//! let bank = ColorTableBank::standard();
//! assert_eq!(bank.get(ColorTableId::Outline).non_zero_count(), 2);
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Database types
	AnimationData,
	AnimationDatabase,
	AnimationEntry,

	// Color types
	ColorTable,
	ColorTableBank,
	ColorTableId,

	// Errors
	DecodeError,
	DecodedSprite,
	FormatError,
	HeaderMismatchError,
	LoadConfig,
	RemapMode,
	RenderableSprite,

	// Cache
	SpriteCache,
	SpriteId,
	SpriteReference,
	StreamDecodeError,

	load_database,
};

#[doc(inline)]
pub use crate::file::anim::{assemble, decode_sprite, fill_isolated_gaps};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
