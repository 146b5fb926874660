//! `ANIM.DAT` format constants.
//!
//! Offsets, record sizes and codec parameters shared by the parsers and the
//! sprite decoder.

/// Size of the animation count at the start of the file (u16 LE)
pub const COUNT_SIZE: usize = 2;

/// Size of one index table entry (14 bytes)
pub const INDEX_ENTRY_SIZE: usize = 14;

/// Length of the NUL-padded name field in an index entry
pub const NAME_SIZE: usize = 8;

/// Size of the per-animation header (frame count, view count, 2 reserved bytes)
pub const ANIMATION_HEADER_SIZE: usize = 4;

/// Size of one sprite reference record
pub const SPRITE_REFERENCE_SIZE: usize = 4;

/// Size of one sprite offset table entry (u16 LE)
pub const SPRITE_OFFSET_SIZE: usize = 2;

/// Size of the `(width, height)` header in front of each compressed stream
pub const BITMAP_HEADER_SIZE: usize = 2;

/// Size of the LZ stream header: `(group_count - 1)` u16 LE + `tail_bits` u8
pub const STREAM_HEADER_SIZE: usize = 3;

/// Decisions carried by one full flag byte
pub const DECISIONS_PER_GROUP: u8 = 8;

/// Added to the low nibble of a back-reference word to get the copy length
pub const COPY_LENGTH_BIAS: usize = 3;

/// Shortest back-reference copy
pub const MIN_COPY_LENGTH: usize = COPY_LENGTH_BIAS;

/// Longest back-reference copy
pub const MAX_COPY_LENGTH: usize = 0xF + COPY_LENGTH_BIAS;

/// Number of entries in a color table
pub const COLOR_TABLE_SIZE: usize = 64;

/// Number of color tables in the bank
pub const COLOR_TABLE_COUNT: usize = 5;

/// Palette index treated as transparent in assembled sprites
pub const TRANSPARENT_INDEX: u8 = 0;

/// Mask value for transparent pixels
pub const MASK_TRANSPARENT: u8 = 0x00;

/// Mask value for opaque pixels
pub const MASK_OPAQUE: u8 = 0xFF;
