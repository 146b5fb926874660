//! Sprite bitmap decompression.
//!
//! ## Block Layout
//!
//! | Offset | Size | Field             | Description                         |
//! |--------|------|-------------------|-------------------------------------|
//! | 0x00   | 1    | `width`           | Pixels, always a multiple of 8      |
//! | 0x01   | 1    | `height`          | Pixels, 18-39 in the shipped data   |
//! | 0x02   | 2    | `group_count - 1` | u16 LE                              |
//! | 0x04   | 1    | `tail_bits`       | Decisions in the trailing flag byte |
//! | 0x05   | ...  | stream body       | Flag bytes interleaved with data    |
//!
//! ## Stream Body
//!
//! An LZ77 variant. Each of the `group_count` flag bytes yields 8 decisions,
//! MSB first; one more flag byte yields the remaining `tail_bits` decisions.
//! Every decision is followed by its operand:
//!
//! - **Literal** (bit 0): one byte. In [`RemapMode::Inline`] bytes below 64
//!   are written through the color table, everything else is written as-is.
//! - **Back-reference** (bit 1): a u16 LE word. Low nibble + 3 is the copy
//!   length (3-18), the upper 12 bits the distance. Bytes are copied one at a
//!   time from `output[len - distance - 1]`, so a run may read bytes it has
//!   just written.
//!
//! Decoding stops as soon as the output holds exactly `width * height` bytes;
//! leftover decisions in the last flag byte are ignored.
//!
//! ## Pixel Order
//!
//! The stream is column-major (`x0y0, x0y1, ..., x1y0, ...`). [`DecodedSprite`]
//! keeps that order; the assembler converts to row-major.
//!
//! ## Correctness Oracle
//!
//! The decoded length must equal `width * height` for every sprite. A
//! copy-length bias of 2 instead of 3 looks plausible but leaves every real
//! sprite short, so a length mismatch is always a decoder defect and is
//! reported as an error rather than returned.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::file::StreamDecodeError;

use super::{
	bits::{BitReader, ByteCursor, Decision},
	color_table::ColorTable,
	constants::{COPY_LENGTH_BIAS, DECISIONS_PER_GROUP},
};

/// `(width, height)` header in front of each compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpriteBitmapHeader {
	/// Width in pixels
	pub width: u8,

	/// Height in pixels
	pub height: u8,
}

impl SpriteBitmapHeader {
	/// Reads the header from the first two bytes of a block.
	pub fn from_bytes(block: &[u8]) -> Option<Self> {
		match block {
			[width, height, ..] => Some(Self {
				width: *width,
				height: *height,
			}),
			_ => None,
		}
	}

	/// Number of pixels (`width * height`).
	#[inline]
	pub fn pixel_count(&self) -> usize {
		self.width as usize * self.height as usize
	}
}

impl fmt::Display for SpriteBitmapHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

/// Where color-table remapping happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RemapMode {
	/// Remap each literal while decoding
	Inline,

	/// Decode raw indices; the assembler remaps the whole buffer
	#[default]
	Deferred,
}

/// A decoded back-reference word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackReference {
	/// Bytes to copy (3-18)
	pub length: usize,

	/// Distance back from the last written byte
	pub distance: usize,
}

impl BackReference {
	/// Splits a back-reference word into length and distance.
	#[inline]
	pub fn from_word(word: u16) -> Self {
		Self {
			length: (word & 0x0F) as usize + COPY_LENGTH_BIAS,
			distance: (word >> 4) as usize,
		}
	}

	#[cfg(test)]
	fn with_bias(word: u16, bias: usize) -> Self {
		Self {
			length: (word & 0x0F) as usize + bias,
			distance: (word >> 4) as usize,
		}
	}
}

/// A decompressed sprite: palette indices in stream (column-major) order.
///
/// The buffer length always equals `width * height`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedSprite {
	header: SpriteBitmapHeader,
	mode: RemapMode,
	pixels: Vec<u8>,
}

impl DecodedSprite {
	/// Bitmap header.
	pub fn header(&self) -> SpriteBitmapHeader {
		self.header
	}

	/// Width in pixels.
	#[inline]
	pub fn width(&self) -> u8 {
		self.header.width
	}

	/// Height in pixels.
	#[inline]
	pub fn height(&self) -> u8 {
		self.header.height
	}

	/// Remap mode the sprite was decoded with.
	pub fn mode(&self) -> RemapMode {
		self.mode
	}

	/// Palette indices in column-major order.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Palette index at `(x, y)`.
	pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
		let height = self.height() as usize;
		if x >= self.width() as usize || y >= height {
			return None;
		}
		self.pixels.get(x * height + y).copied()
	}

	/// Copies the pixels into row-major order.
	pub fn to_row_major(&self) -> Vec<u8> {
		let width = self.width() as usize;
		let height = self.height() as usize;
		let mut rows = vec![0u8; self.pixels.len()];
		for (x, column) in self.pixels.chunks_exact(height.max(1)).enumerate() {
			for (y, &value) in column.iter().enumerate() {
				rows[y * width + x] = value;
			}
		}
		rows
	}
}

/// Decoder state for one compressed block.
#[derive(Debug)]
struct DecoderState<'a> {
	cursor: ByteCursor<'a>,
	flags: BitReader,
	output: Vec<u8>,
	target: usize,
	mode: RemapMode,
	table: &'a ColorTable,
	#[cfg(test)]
	copy_bias: usize,
}

impl<'a> DecoderState<'a> {
	/// Reads both headers and prepares the flag reader.
	fn new(
		block: &'a [u8],
		mode: RemapMode,
		table: &'a ColorTable,
	) -> Result<(SpriteBitmapHeader, Self), StreamDecodeError> {
		let mut cursor = ByteCursor::new(block);
		let header = SpriteBitmapHeader {
			width: cursor.read_u8()?,
			height: cursor.read_u8()?,
		};

		let group_count = u32::from(cursor.read_u16_le()?) + 1;
		let tail_bits = cursor.read_u8()?;
		if tail_bits > DECISIONS_PER_GROUP {
			return Err(StreamDecodeError::InvalidTailBits(tail_bits));
		}

		let target = header.pixel_count();
		Ok((
			header,
			Self {
				cursor,
				flags: BitReader::new(group_count, tail_bits),
				output: Vec::with_capacity(target),
				target,
				mode,
				table,
				#[cfg(test)]
				copy_bias: COPY_LENGTH_BIAS,
			},
		))
	}

	/// Decision bit 0: one byte from the stream.
	#[inline(always)]
	fn literal(&mut self) -> Result<(), StreamDecodeError> {
		let value = self.cursor.read_u8()?;
		let value = match self.mode {
			RemapMode::Inline => self.table.remap(value),
			RemapMode::Deferred => value,
		};
		self.output.push(value);
		Ok(())
	}

	/// Decision bit 1: copy a run from earlier output.
	///
	/// Copies byte by byte so overlapping runs repeat freshly written bytes.
	fn back_reference(&mut self) -> Result<(), StreamDecodeError> {
		let word = self.cursor.read_u16_le()?;
		#[cfg(not(test))]
		let reference = BackReference::from_word(word);
		#[cfg(test)]
		let reference = BackReference::with_bias(word, self.copy_bias);

		let available = self.output.len();
		if reference.distance >= available {
			return Err(StreamDecodeError::BackReferenceOutOfRange {
				distance: reference.distance,
				available,
			});
		}

		let source = available - reference.distance - 1;
		for i in 0..reference.length {
			if self.output.len() == self.target {
				break;
			}
			let value = self.output[source + i];
			self.output.push(value);
		}

		Ok(())
	}

	fn run(mut self) -> Result<Vec<u8>, StreamDecodeError> {
		while self.output.len() < self.target {
			let Some(decision) = self.flags.next_decision(&mut self.cursor)? else {
				return Err(StreamDecodeError::PrematureEnd {
					expected: self.target,
					actual: self.output.len(),
				});
			};

			match decision {
				Decision::Literal => self.literal()?,
				Decision::BackReference => self.back_reference()?,
			}
		}

		Ok(self.output)
	}
}

/// Decompresses one sprite block (`(width, height)` header + LZ stream).
///
/// `table` is only consulted in [`RemapMode::Inline`].
///
/// # Errors
///
/// Returns a [`StreamDecodeError`] if a read runs past `block`, a
/// back-reference reaches before the start of the output, or the stream runs
/// out of decisions before `width * height` bytes are produced.
pub fn decode_sprite(
	block: &[u8],
	mode: RemapMode,
	table: &ColorTable,
) -> Result<DecodedSprite, StreamDecodeError> {
	let (header, state) = DecoderState::new(block, mode, table)?;
	let pixels = state.run().inspect_err(|e| {
		debug!("Sprite {header} failed to decode: {e}");
	})?;

	Ok(DecodedSprite {
		header,
		mode,
		pixels,
	})
}
