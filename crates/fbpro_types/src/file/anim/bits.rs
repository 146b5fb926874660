//! Byte and flag-bit readers for the sprite stream.
//!
//! Flag bytes are interleaved with the data they describe, so both readers
//! share one [`ByteCursor`]. The [`BitReader`] hands out `group_count` full
//! flag bytes of 8 decisions each (MSB first), then one trailing flag byte
//! holding `tail_bits` decisions.

use crate::file::StreamDecodeError;

use super::constants::DECISIONS_PER_GROUP;

/// Bounds-checked little-endian reader over a compressed block.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> ByteCursor<'a> {
	/// Creates a cursor positioned at the start of `data`.
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
		}
	}

	/// Current read offset.
	#[inline]
	pub fn position(&self) -> usize {
		self.position
	}

	/// Bytes left to read.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	fn take(&mut self, count: usize) -> Result<&'a [u8], StreamDecodeError> {
		if self.remaining() < count {
			return Err(StreamDecodeError::UnexpectedEof {
				offset: self.position,
				needed: count,
				available: self.remaining(),
			});
		}

		let bytes = &self.data[self.position..self.position + count];
		self.position += count;
		Ok(bytes)
	}

	/// Reads one byte.
	pub fn read_u8(&mut self) -> Result<u8, StreamDecodeError> {
		Ok(self.take(1)?[0])
	}

	/// Reads a little-endian 16-bit word.
	pub fn read_u16_le(&mut self) -> Result<u16, StreamDecodeError> {
		let bytes = self.take(2)?;
		Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
	}
}

/// One literal/back-reference decision from a flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	/// Flag bit 0: copy one byte from the stream
	Literal,
	/// Flag bit 1: copy a run from the already decoded output
	BackReference,
}

/// Yields the decision bits of a sprite stream.
#[derive(Debug, Clone)]
pub struct BitReader {
	groups_remaining: u32,
	tail_bits: u8,
	flag: u8,
	bits_left: u8,
}

impl BitReader {
	/// Creates a reader for `group_count` full flag bytes followed by a
	/// trailing flag byte with `tail_bits` decisions.
	///
	/// The trailing byte is only read from the stream when `tail_bits > 0`.
	pub fn new(group_count: u32, tail_bits: u8) -> Self {
		Self {
			groups_remaining: group_count,
			tail_bits,
			flag: 0,
			bits_left: 0,
		}
	}

	/// Total number of decisions this reader will produce.
	pub fn total_decisions(&self) -> u64 {
		u64::from(self.groups_remaining) * u64::from(DECISIONS_PER_GROUP)
			+ u64::from(self.tail_bits)
			+ u64::from(self.bits_left)
	}

	/// Returns the next decision, loading a new flag byte from `cursor` when
	/// the current one is spent.
	///
	/// Returns `Ok(None)` once every group and the tail have been consumed.
	pub fn next_decision(
		&mut self,
		cursor: &mut ByteCursor<'_>,
	) -> Result<Option<Decision>, StreamDecodeError> {
		if self.bits_left == 0 {
			if self.groups_remaining > 0 {
				self.groups_remaining -= 1;
				self.flag = cursor.read_u8()?;
				self.bits_left = DECISIONS_PER_GROUP;
			} else if self.tail_bits > 0 {
				self.flag = cursor.read_u8()?;
				self.bits_left = self.tail_bits;
				self.tail_bits = 0;
			} else {
				return Ok(None);
			}
		}

		let bit = self.flag & 0x80;
		self.flag <<= 1;
		self.bits_left -= 1;

		Ok(Some(if bit == 0 {
			Decision::Literal
		} else {
			Decision::BackReference
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn drain(reader: &mut BitReader, cursor: &mut ByteCursor<'_>) -> Vec<Decision> {
		let mut out = Vec::new();
		while let Some(decision) = reader.next_decision(cursor).unwrap() {
			out.push(decision);
		}
		out
	}

	#[test]
	fn test_msb_first() {
		let data = [0b1000_0001];
		let mut cursor = ByteCursor::new(&data);
		let mut reader = BitReader::new(1, 0);

		let decisions = drain(&mut reader, &mut cursor);
		assert_eq!(decisions.len(), 8);
		assert_eq!(decisions[0], Decision::BackReference);
		assert!(decisions[1..7].iter().all(|d| *d == Decision::Literal));
		assert_eq!(decisions[7], Decision::BackReference);
	}

	#[test]
	fn test_tail_byte_partial() {
		// one full group, then 3 decisions from the tail byte
		let data = [0x00, 0b0101_1111];
		let mut cursor = ByteCursor::new(&data);
		let mut reader = BitReader::new(1, 3);
		assert_eq!(reader.total_decisions(), 11);

		let decisions = drain(&mut reader, &mut cursor);
		assert_eq!(decisions.len(), 11);
		assert_eq!(
			&decisions[8..],
			&[Decision::Literal, Decision::BackReference, Decision::Literal]
		);
		assert_eq!(cursor.remaining(), 0);
	}

	#[test]
	fn test_no_tail_byte_read_when_zero() {
		let data = [0x00];
		let mut cursor = ByteCursor::new(&data);
		let mut reader = BitReader::new(1, 0);
		assert_eq!(drain(&mut reader, &mut cursor).len(), 8);
		assert_eq!(cursor.position(), 1);
	}

	#[test]
	fn test_missing_flag_byte() {
		let data: [u8; 0] = [];
		let mut cursor = ByteCursor::new(&data);
		let mut reader = BitReader::new(1, 0);
		assert!(matches!(
			reader.next_decision(&mut cursor),
			Err(StreamDecodeError::UnexpectedEof {
				offset: 0,
				needed: 1,
				available: 0
			})
		));
	}

	#[test]
	fn test_cursor_u16_le() {
		let data = [0x34, 0x12, 0xFF];
		let mut cursor = ByteCursor::new(&data);
		assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
		assert!(cursor.read_u16_le().is_err());
		assert_eq!(cursor.read_u8().unwrap(), 0xFF);
	}
}
