//! This crate provides core data types and file format support for the `fbpro-rs` project.
//!
//! # File Formats
//!
//! - **ANIM.DAT**: Sprite animation bundle with per-view sprite references and
//!   LZ-compressed, team-recolorable 8-bit bitmaps
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use fbpro_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let database = AnimationDatabase::open("ANIM.DAT")?;
//! for animation in &database {
//! 	println!("{}: {} frames", animation.name(), animation.frame_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use fbpro_types::file::anim::{ColorTableBank, ColorTableId};
//!
//! let bank = ColorTableBank::standard();
//! let table = bank.get(ColorTableId::TeamA);
//! ```

pub mod file;

/// `use fbpro_types::prelude::*;` to import commonly used items.
pub mod prelude;
