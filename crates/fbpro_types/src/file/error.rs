//! Error types for `ANIM.DAT` parsing and sprite decoding.
//!
//! Each enum matches one failure scope:
//! - [`FormatError`]: the whole file is unusable, nothing is loaded
//! - [`HeaderMismatchError`]: one animation is excluded, the rest still load
//! - [`StreamDecodeError`]: one compressed sprite stream is malformed
//! - [`DecodeError`]: a consumer-facing sprite lookup failed

use thiserror::Error;

/// Errors that abort loading of an entire animation file.
#[derive(Debug, Error)]
pub enum FormatError {
	/// Not enough data to parse the index table
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// The terminating index entry is not a valid sentinel
	#[error(
		"Invalid sentinel entry: frame count {frame_count} (expected 0), data offset {data_offset} (expected file length {file_len})"
	)]
	InvalidSentinel {
		/// Frame count stored in the last entry
		frame_count: u16,
		/// Data offset stored in the last entry
		data_offset: u32,
		/// Actual length of the file
		file_len: usize,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors scoped to a single animation block.
///
/// An animation that fails with one of these is left out of the database;
/// loading continues with the remaining animations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderMismatchError {
	/// Header frame count disagrees with the index table
	#[error("Animation {name}: index lists {expected} frames, header has {actual}")]
	FrameCountMismatch {
		/// Animation name
		name: String,
		/// Frame count from the index table
		expected: u16,
		/// Frame count from the animation header
		actual: u8,
	},

	/// Data offset points outside the file
	#[error("Animation {name}: data offset 0x{offset:06X} is beyond file length {file_len}")]
	OffsetOutOfRange {
		/// Animation name
		name: String,
		/// Offending data offset
		offset: u32,
		/// Length of the file
		file_len: usize,
	},

	/// A table runs past the end of the animation's data window
	#[error("Animation {name}: {section} needs {expected} bytes, only {actual} available")]
	Truncated {
		/// Animation name
		name: String,
		/// Which table was being read
		section: &'static str,
		/// Number of bytes required
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// The two sprite-count interpretations of the offset table disagree
	#[error(
		"Animation {name}: {referenced} sprites referenced but the offset table spans {table_span} entries"
	)]
	SpriteCountDisagreement {
		/// Animation name
		name: String,
		/// Highest referenced sprite ID + 1
		referenced: usize,
		/// Entry count implied by the first offset
		table_span: usize,
	},
}

/// Errors raised while decompressing a single sprite stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamDecodeError {
	/// A read ran past the end of the compressed block
	#[error("Unexpected end of stream at offset {offset}: needed {needed} bytes, {available} available")]
	UnexpectedEof {
		/// Offset within the block where the read started
		offset: usize,
		/// Number of bytes the read needed
		needed: usize,
		/// Number of bytes left in the block
		available: usize,
	},

	/// A back-reference points before the start of the output
	#[error("Back-reference distance {distance} exceeds decoded length {available}")]
	BackReferenceOutOfRange {
		/// Distance stored in the back-reference
		distance: usize,
		/// Output length at the time of the copy
		available: usize,
	},

	/// All flag decisions were consumed before the sprite was complete
	#[error("Stream ended early: decoded {actual} of {expected} bytes")]
	PrematureEnd {
		/// Expected output size (`width * height`)
		expected: usize,
		/// Number of bytes decoded
		actual: usize,
	},

	/// The trailing flag byte claims more than 8 decisions
	#[error("Invalid tail bit count {0} (must be 0-8)")]
	InvalidTailBits(u8),
}

/// Errors returned when resolving a sprite through the database or cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	/// No such animation or sprite ID
	#[error("Unknown sprite {sprite} in animation #{animation}")]
	UnknownSprite {
		/// Animation index in the database
		animation: usize,
		/// Sprite ID within the animation
		sprite: u8,
	},

	/// The sprite's offset points outside its animation window
	#[error("Sprite {sprite} in animation #{animation}: block offset 0x{offset:06X} is out of bounds")]
	BlockOutOfBounds {
		/// Animation index in the database
		animation: usize,
		/// Sprite ID within the animation
		sprite: u8,
		/// Absolute file offset of the block
		offset: usize,
	},

	/// The compressed stream is malformed
	#[error(transparent)]
	Stream(#[from] StreamDecodeError),
}
