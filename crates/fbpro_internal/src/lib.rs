//! This module is separated into its own crate to keep the public facade thin, and should not be used directly.

/// `use fbpro::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export fbpro_types for convenience
pub use fbpro_types;

// Re-export commonly used types at crate root
pub use fbpro_types::file::{
	AnimationDatabase, DecodeError, FormatError, SpriteCache, SpriteId, load_database,
};
