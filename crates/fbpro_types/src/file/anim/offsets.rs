//! Sprite offset table.
//!
//! Directly follows the sprite reference table. Each entry is a u16 LE offset,
//! relative to the start of the table itself, to a compressed bitmap block:
//!
//! ```text
//! table_start ──► [off 0][off 1]...[off N-1][block 0][block 1]...
//!                     │                         ▲
//!                     └─────────────────────────┘  table_start + off 0
//! ```

use log::warn;

use crate::file::HeaderMismatchError;

use super::{
	config::{LoadConfig, SpriteCountSource},
	constants::SPRITE_OFFSET_SIZE,
	header::AnimationHeader,
	index::AnimationEntry,
};

/// Sprite ID to block offset mapping for one animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteOffsetTable {
	/// Offset of the table within the animation window
	start: usize,

	/// Offsets relative to `start`, indexed by sprite ID
	offsets: Vec<u16>,
}

impl SpriteOffsetTable {
	/// Parses the table at `start` inside `window`.
	///
	/// # Errors
	///
	/// Returns an error if the table runs past `window`, or if the
	/// sprite-count interpretations disagree and `config` demands agreement.
	pub fn parse(
		window: &[u8],
		start: usize,
		entry: &AnimationEntry,
		header: &AnimationHeader,
		config: &LoadConfig,
	) -> Result<Self, HeaderMismatchError> {
		let referenced = header.max_sprite_id().map_or(0, |id| id as usize + 1);
		if referenced == 0 {
			return Ok(Self {
				start,
				offsets: Vec::new(),
			});
		}

		let first = read_offset(window, start).ok_or_else(|| HeaderMismatchError::Truncated {
			name: entry.name.clone(),
			section: "sprite offset table",
			expected: start + SPRITE_OFFSET_SIZE,
			actual: window.len(),
		})?;
		let table_span = first as usize / SPRITE_OFFSET_SIZE;

		if table_span != referenced {
			if config.require_count_agreement {
				return Err(HeaderMismatchError::SpriteCountDisagreement {
					name: entry.name.clone(),
					referenced,
					table_span,
				});
			}
			warn!(
				"{}: offset table spans {} entries but {} sprites are referenced",
				entry.name, table_span, referenced
			);
		}

		let count = match config.sprite_count {
			SpriteCountSource::Referenced => referenced,
			SpriteCountSource::TableSpan => table_span,
		};

		let end = start + count * SPRITE_OFFSET_SIZE;
		if window.len() < end {
			return Err(HeaderMismatchError::Truncated {
				name: entry.name.clone(),
				section: "sprite offset table",
				expected: end,
				actual: window.len(),
			});
		}

		let offsets = window[start..end]
			.chunks_exact(SPRITE_OFFSET_SIZE)
			.map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
			.collect();

		Ok(Self {
			start,
			offsets,
		})
	}

	/// Offset of the table within its animation window.
	pub fn start(&self) -> usize {
		self.start
	}

	/// Raw relative offsets.
	pub fn offsets(&self) -> &[u16] {
		&self.offsets
	}

	/// Number of sprites in the table.
	pub fn len(&self) -> usize {
		self.offsets.len()
	}

	/// Returns `true` if the animation has no sprites.
	pub fn is_empty(&self) -> bool {
		self.offsets.is_empty()
	}

	/// Offset of a sprite's block within the animation window.
	pub fn block_start(&self, sprite_id: u8) -> Option<usize> {
		self.offsets.get(sprite_id as usize).map(|&offset| self.start + offset as usize)
	}
}

fn read_offset(window: &[u8], at: usize) -> Option<u16> {
	let bytes = window.get(at..at + SPRITE_OFFSET_SIZE)?;
	Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}
