//! `ANIM.DAT` sprite animation support.
//!
//! `ANIM.DAT` bundles every on-field animation of the game (players, ball,
//! referee, end-zone celebrations). Each animation is a grid of frames × views,
//! each cell pointing at a compressed 8-bit indexed bitmap.
//!
//! # File Structure Overview
//!
//! ```text
//! [u16 LE count N]
//! [(N + 1) x 14-byte index entries]        see index
//! [animation block]...
//!
//! animation block:
//! [u8 frames][u8 views][2 reserved]        see header
//! [frames * views x 4-byte references]
//! [sprite offset table: u16 LE each]       see offsets
//! [sprite bitmap blocks]                   see decode
//! ```
//!
//! # Decoding pipeline
//!
//! 1. [`IndexTable`] splits the file into per-animation windows
//! 2. [`AnimationHeader`] and [`SpriteOffsetTable`] are parsed per animation;
//!    a bad animation is excluded, the rest still load
//! 3. [`decode_sprite`] decompresses one bitmap into column-major indices
//! 4. [`assemble`] remaps through a [`ColorTable`], transposes and mirrors
//! 5. [`SpriteCache`] memoizes steps 3 and 4 for concurrent callers
//!
//! # Usage Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fbpro_types::file::anim::{AnimationDatabase, ColorTableId, SpriteCache};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let database = Arc::new(AnimationDatabase::open("ANIM.DAT")?);
//! let cache = SpriteCache::new(Arc::clone(&database));
//!
//! let run = database.animation("RUN").ok_or("no RUN animation")?;
//! let reference = run.sprite_reference(0, 3).ok_or("no such view")?;
//! let sprite = cache.renderable(
//! 	run.sprite_id(reference.sprite_id),
//! 	ColorTableId::TeamA,
//! 	reference.is_mirrored(),
//! )?;
//!
//! println!("{}x{} sprite", sprite.width(), sprite.height());
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading with a custom configuration
//!
//! ```no_run
//! use fbpro_types::file::anim::{LoadConfig, load_database_with_config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("ANIM.DAT")?;
//! let database = load_database_with_config(bytes, &LoadConfig::strict())?;
//!
//! for (name, reason) in database.excluded() {
//! 	eprintln!("{name}: {reason}");
//! }
//! # Ok(())
//! # }
//! ```

mod assemble;
mod bits;
mod cache;
mod color_table;
mod config;
mod database;
mod decode;
mod header;
mod index;
mod offsets;

pub mod constants;

pub use self::assemble::{RenderableSprite, assemble, fill_isolated_gaps, mirror_rows};
pub use self::bits::{BitReader, ByteCursor, Decision};
pub use self::cache::{CacheStats, SpriteCache};
pub use self::color_table::{ColorTable, ColorTableBank, ColorTableId};
pub use self::config::{LoadConfig, SpriteCountSource};
pub use self::database::{
	AnimationData, AnimationDatabase, SpriteId, load_database, load_database_with_config,
};
pub use self::decode::{
	BackReference, DecodedSprite, RemapMode, SpriteBitmapHeader, decode_sprite,
};
pub use self::header::{AnimationHeader, SpriteReference};
pub use self::index::{AnimationEntry, IndexTable};
pub use self::offsets::SpriteOffsetTable;
