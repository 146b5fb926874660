//! Top-level animation directory.
//!
//! ```text
//! Offset  Size        Field
//! ------  ----------  --------------------------------------------
//! 0x00    2           count N (u16 LE)
//! 0x02    14 * (N+1)  index entries, the last one a sentinel
//!
//! Index entry (14 bytes):
//! +0x00   8           name, NUL padded
//! +0x08   2           frame count (u16 BE)
//! +0x0A   4           data offset, absolute (u32 LE)
//! ```
//!
//! The sentinel entry has a frame count of 0 and a data offset equal to the
//! file length, so the table doubles as a list of block boundaries.

use std::fmt;

use serde::Serialize;

use crate::file::FormatError;

use super::constants::{COUNT_SIZE, INDEX_ENTRY_SIZE, NAME_SIZE};

/// One entry of the animation directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AnimationEntry {
	/// Animation name (at most 8 characters)
	pub name: String,

	/// Number of frames in the animation
	pub frame_count: u16,

	/// Absolute file offset of the animation block
	pub data_offset: u32,
}

impl AnimationEntry {
	/// Parses one 14-byte entry.
	pub fn from_bytes(bytes: &[u8; INDEX_ENTRY_SIZE]) -> Self {
		let raw_name = &bytes[..NAME_SIZE];
		let name_len = raw_name.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE);
		let name = String::from_utf8_lossy(&raw_name[..name_len]).into_owned();

		let frame_count = u16::from_be_bytes([bytes[8], bytes[9]]);
		let data_offset = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);

		Self {
			name,
			frame_count,
			data_offset,
		}
	}

	/// Returns `true` if this entry satisfies the sentinel invariant for a
	/// file of `file_len` bytes.
	pub fn is_sentinel_for(&self, file_len: usize) -> bool {
		self.frame_count == 0 && self.data_offset as usize == file_len
	}
}

impl fmt::Display for AnimationEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:<8} {:>4} frames @ 0x{:06X}", self.name, self.frame_count, self.data_offset)
	}
}

/// The parsed animation directory, sentinel included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
	entries: Vec<AnimationEntry>,
}

impl IndexTable {
	/// Parses the directory at the start of `data`.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - `data` is shorter than `2 + 14 * (N + 1)` bytes
	/// - the last entry is not a sentinel for `data.len()`
	pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
		if data.len() < COUNT_SIZE {
			return Err(FormatError::InsufficientData {
				expected: COUNT_SIZE,
				actual: data.len(),
			});
		}

		let count = u16::from_le_bytes([data[0], data[1]]) as usize;
		let table_size = Self::table_size(count);
		if data.len() < table_size {
			return Err(FormatError::InsufficientData {
				expected: table_size,
				actual: data.len(),
			});
		}

		let entries: Vec<AnimationEntry> = data[COUNT_SIZE..table_size]
			.chunks_exact(INDEX_ENTRY_SIZE)
			.map(|chunk| {
				let mut raw = [0u8; INDEX_ENTRY_SIZE];
				raw.copy_from_slice(chunk);
				AnimationEntry::from_bytes(&raw)
			})
			.collect();

		// count + 1 >= 1, so there is always a last entry
		let Some(sentinel) = entries.last() else {
			return Err(FormatError::InsufficientData {
				expected: table_size,
				actual: data.len(),
			});
		};
		if !sentinel.is_sentinel_for(data.len()) {
			return Err(FormatError::InvalidSentinel {
				frame_count: sentinel.frame_count,
				data_offset: sentinel.data_offset,
				file_len: data.len(),
			});
		}

		Ok(Self {
			entries,
		})
	}

	/// Size in bytes of a directory holding `count` animations.
	#[inline]
	pub fn table_size(count: usize) -> usize {
		COUNT_SIZE + INDEX_ENTRY_SIZE * (count + 1)
	}

	/// All entries including the sentinel.
	pub fn entries(&self) -> &[AnimationEntry] {
		&self.entries
	}

	/// Entries excluding the sentinel.
	pub fn animations(&self) -> &[AnimationEntry] {
		&self.entries[..self.entries.len() - 1]
	}

	/// The terminating sentinel entry.
	pub fn sentinel(&self) -> &AnimationEntry {
		&self.entries[self.entries.len() - 1]
	}

	/// Number of animations (sentinel excluded).
	pub fn animation_count(&self) -> usize {
		self.entries.len() - 1
	}

	/// Byte window `[start, end)` of the animation at `index`.
	///
	/// The end is the next greater data offset anywhere in the directory, so
	/// entries need not be sorted. Returns `None` if `index` is out of range or
	/// the offset lies outside the file.
	pub fn window(&self, index: usize) -> Option<std::ops::Range<usize>> {
		let entry = self.animations().get(index)?;
		let start = entry.data_offset as usize;
		let file_len = self.sentinel().data_offset as usize;
		if start >= file_len {
			return None;
		}

		let end = self
			.entries
			.iter()
			.map(|e| e.data_offset as usize)
			.filter(|&offset| offset > start)
			.min()
			.unwrap_or(file_len);

		Some(start..end.min(file_len))
	}
}
