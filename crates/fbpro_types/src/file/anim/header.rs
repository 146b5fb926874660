//! Per-animation header and sprite reference table.
//!
//! ```text
//! Offset  Size       Field
//! ------  ---------  ------------------------------------------
//! +0x00   1          frame count
//! +0x01   1          view count (8 compass directions, or 1)
//! +0x02   2          reserved
//! +0x04   4 * F * V  sprite references, frame-major
//!
//! Sprite reference (4 bytes):
//! +0x00   1          flag (0 = normal, non-zero = mirrored)
//! +0x01   1          sprite ID
//! +0x02   1          x offset (i8), relative to the feet anchor
//! +0x03   1          y offset (i8)
//! ```

use std::fmt;

use serde::Serialize;

use crate::file::HeaderMismatchError;

use super::{
	constants::{ANIMATION_HEADER_SIZE, SPRITE_REFERENCE_SIZE},
	index::AnimationEntry,
};

/// Which physical bitmap to draw for one `(frame, view)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpriteReference {
	/// Raw flag byte; any set bit means horizontally mirrored
	pub flag: u8,

	/// Sprite ID, indexes the animation's sprite offset table
	pub sprite_id: u8,

	/// Horizontal draw offset from the feet anchor
	pub x_offset: i8,

	/// Vertical draw offset from the feet anchor
	pub y_offset: i8,
}

impl SpriteReference {
	/// Parses a 4-byte reference record.
	pub fn from_bytes(bytes: [u8; SPRITE_REFERENCE_SIZE]) -> Self {
		Self {
			flag: bytes[0],
			sprite_id: bytes[1],
			x_offset: bytes[2] as i8,
			y_offset: bytes[3] as i8,
		}
	}

	/// Returns `true` if the bitmap is drawn mirrored left-to-right.
	///
	/// Views facing opposite directions often share one bitmap and differ
	/// only in this flag.
	#[inline]
	pub fn is_mirrored(&self) -> bool {
		self.flag != 0
	}
}

impl fmt::Display for SpriteReference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"sprite {:3} at ({:+}, {:+}){}",
			self.sprite_id,
			self.x_offset,
			self.y_offset,
			if self.is_mirrored() {
				" mirrored"
			} else {
				""
			}
		)
	}
}

/// Parsed animation header with its reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationHeader {
	/// Number of frames
	pub frame_count: u8,

	/// Number of views per frame
	pub view_count: u8,

	/// Reserved bytes, kept verbatim
	pub reserved: [u8; 2],

	/// `frame_count * view_count` references, frame-major
	pub references: Vec<SpriteReference>,
}

impl AnimationHeader {
	/// Parses the header of `entry` from `window`, the animation's byte range.
	///
	/// When `check_frame_count` is set, the header's frame count must match
	/// the index entry.
	///
	/// # Errors
	///
	/// Returns an error if the header or reference table runs past `window`,
	/// or if the frame counts disagree.
	pub fn parse(
		window: &[u8],
		entry: &AnimationEntry,
		check_frame_count: bool,
	) -> Result<Self, HeaderMismatchError> {
		if window.len() < ANIMATION_HEADER_SIZE {
			return Err(HeaderMismatchError::Truncated {
				name: entry.name.clone(),
				section: "animation header",
				expected: ANIMATION_HEADER_SIZE,
				actual: window.len(),
			});
		}

		let frame_count = window[0];
		let view_count = window[1];
		let reserved = [window[2], window[3]];

		if check_frame_count && u16::from(frame_count) != entry.frame_count {
			return Err(HeaderMismatchError::FrameCountMismatch {
				name: entry.name.clone(),
				expected: entry.frame_count,
				actual: frame_count,
			});
		}

		let reference_count = frame_count as usize * view_count as usize;
		let table_end = ANIMATION_HEADER_SIZE + reference_count * SPRITE_REFERENCE_SIZE;
		if window.len() < table_end {
			return Err(HeaderMismatchError::Truncated {
				name: entry.name.clone(),
				section: "sprite reference table",
				expected: table_end,
				actual: window.len(),
			});
		}

		let references = window[ANIMATION_HEADER_SIZE..table_end]
			.chunks_exact(SPRITE_REFERENCE_SIZE)
			.map(|chunk| SpriteReference::from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
			.collect();

		Ok(Self {
			frame_count,
			view_count,
			reserved,
			references,
		})
	}

	/// Size in bytes of the header plus reference table.
	pub fn size(&self) -> usize {
		ANIMATION_HEADER_SIZE + self.references.len() * SPRITE_REFERENCE_SIZE
	}

	/// Bounds-checked reference lookup.
	pub fn reference(&self, frame: usize, view: usize) -> Option<SpriteReference> {
		if frame >= self.frame_count as usize || view >= self.view_count as usize {
			return None;
		}
		self.references.get(frame * self.view_count as usize + view).copied()
	}

	/// Highest sprite ID referenced by any frame, if there are references.
	pub fn max_sprite_id(&self) -> Option<u8> {
		self.references.iter().map(|r| r.sprite_id).max()
	}
}
