//! Benchmark helper utilities for fbpro-rs
//!
//! This module provides utilities for generating synthetic `ANIM.DAT` data and
//! common benchmark helpers for the fbpro-rs project.
//!
//! The library itself never encodes sprites, so the greedy LZ encoder used to
//! build test streams lives here. It produces streams the decoder accepts; it
//! makes no attempt to match the compression ratio of the game's own tool.

use fbpro_types::file::anim::constants::{
	BITMAP_HEADER_SIZE, MAX_COPY_LENGTH as MAX_COPY, MIN_COPY_LENGTH as MIN_COPY,
	STREAM_HEADER_SIZE,
};

/// Largest distance field (12 bits)
const MAX_DISTANCE: usize = 0x0FFF;

enum Token {
	Literal(u8),
	Copy {
		length: usize,
		distance: usize,
	},
}

/// Generates a sprite-like column-major bitmap.
///
/// Transparent margins, a skin band, two jersey bands and a sprinkle of
/// pseudo-random shading, roughly what a player sprite compresses like.
pub fn generate_sprite_pixels(width: u8, height: u8, seed: u32) -> Vec<u8> {
	let (w, h) = (width as usize, height as usize);
	let mut state = seed.wrapping_mul(2_654_435_761).max(1);
	let mut pixels = Vec::with_capacity(w * h);

	for x in 0..w {
		for y in 0..h {
			let margin = x < w / 8 || x >= w - w / 8 || y == 0;
			let value = if margin {
				0
			} else if y < h / 5 {
				16 + (y % 4) as u8
			} else if y < h / 2 {
				32 + ((y / 3) % 12) as u8
			} else {
				48 + ((y / 3) % 12) as u8
			};

			// xorshift, occasional shading pixel
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			let shaded = value != 0 && state % 11 == 0;
			pixels.push(if shaded {
				46
			} else {
				value
			});
		}
	}

	pixels
}

/// Compresses column-major `pixels` into a complete sprite block.
pub fn encode_sprite(width: u8, height: u8, pixels: &[u8]) -> Vec<u8> {
	assert_eq!(pixels.len(), width as usize * height as usize);

	let tokens = tokenize(pixels);
	let groups = tokens.len() / 8;
	let tail = tokens.len() % 8;
	// the stream always declares at least one group
	let (group_count, tail_bits) = if groups == 0 {
		(1, 0)
	} else {
		(groups, tail)
	};

	let mut out = Vec::with_capacity(BITMAP_HEADER_SIZE + STREAM_HEADER_SIZE + pixels.len());
	out.extend_from_slice(&[width, height]);
	out.extend_from_slice(&((group_count - 1) as u16).to_le_bytes());
	out.push(tail_bits as u8);

	for chunk in tokens.chunks(8) {
		let mut flag = 0u8;
		for (i, token) in chunk.iter().enumerate() {
			if matches!(token, Token::Copy { .. }) {
				flag |= 0x80 >> i;
			}
		}
		out.push(flag);

		for token in chunk {
			match *token {
				Token::Literal(value) => out.push(value),
				Token::Copy {
					length,
					distance,
				} => {
					let word = ((distance as u16) << 4) | (length - MIN_COPY) as u16;
					out.extend_from_slice(&word.to_le_bytes());
				}
			}
		}
	}

	out
}

/// Greedy longest-match tokenizer.
fn tokenize(pixels: &[u8]) -> Vec<Token> {
	let mut tokens = Vec::new();
	let mut pos = 0;

	while pos < pixels.len() {
		let mut best = (0, 0);
		for distance in 0..pos.min(MAX_DISTANCE + 1) {
			let source = pos - distance - 1;
			let mut length = 0;
			// source < pos, so overlapping matches read already-produced bytes
			while length < MAX_COPY
				&& pos + length < pixels.len()
				&& pixels[source + length] == pixels[pos + length]
			{
				length += 1;
			}
			if length > best.0 {
				best = (length, distance);
				if length == MAX_COPY {
					break;
				}
			}
		}

		if best.0 >= MIN_COPY {
			tokens.push(Token::Copy {
				length: best.0,
				distance: best.1,
			});
			pos += best.0;
		} else {
			tokens.push(Token::Literal(pixels[pos]));
			pos += 1;
		}
	}

	tokens
}

/// Builds a complete `ANIM.DAT` image.
///
/// Each animation has `frames` x 8 views; views 4-7 mirror views 0-3, so each
/// frame owns four bitmaps of `size`.
pub fn generate_test_anim_file(animations: usize, frames: u8, size: (u8, u8)) -> Vec<u8> {
	const VIEWS: u8 = 8;
	const BITMAPS_PER_FRAME: u8 = 4;

	let blocks: Vec<Vec<u8>> = (0..animations)
		.map(|a| {
			let mut block = vec![frames, VIEWS, 0, 0];
			for frame in 0..frames {
				for view in 0..VIEWS {
					let sprite = frame * BITMAPS_PER_FRAME + view % BITMAPS_PER_FRAME;
					let flag = u8::from(view >= BITMAPS_PER_FRAME);
					block.extend_from_slice(&[flag, sprite, 0xF8, 0xE0]);
				}
			}

			let bitmaps: Vec<Vec<u8>> = (0..frames as u32 * BITMAPS_PER_FRAME as u32)
				.map(|i| {
					let pixels = generate_sprite_pixels(size.0, size.1, a as u32 * 1000 + i);
					encode_sprite(size.0, size.1, &pixels)
				})
				.collect();

			let mut offset = bitmaps.len() * 2;
			for bitmap in &bitmaps {
				block.extend_from_slice(&(offset as u16).to_le_bytes());
				offset += bitmap.len();
			}
			for bitmap in bitmaps {
				block.extend_from_slice(&bitmap);
			}
			block
		})
		.collect();

	let mut offset = 2 + 14 * (animations + 1);
	let total = offset + blocks.iter().map(Vec::len).sum::<usize>();

	let mut data = Vec::with_capacity(total);
	data.extend_from_slice(&(animations as u16).to_le_bytes());
	for (i, block) in blocks.iter().enumerate() {
		let mut name = [0u8; 8];
		let label = format!("ANIM{i:04}");
		name.copy_from_slice(&label.as_bytes()[..8]);
		data.extend_from_slice(&name);
		data.extend_from_slice(&u16::from(frames).to_be_bytes());
		data.extend_from_slice(&(offset as u32).to_le_bytes());
		offset += block.len();
	}
	// Sentinel
	data.extend_from_slice(&[0u8; 8]);
	data.extend_from_slice(&0u16.to_be_bytes());
	data.extend_from_slice(&(total as u32).to_le_bytes());

	for block in blocks {
		data.extend_from_slice(&block);
	}

	data
}

/// Common benchmark sprite sizes
pub mod sizes {
	/// Ball-sized sprite: 8x8
	pub const BALL: (u8, u8) = (8, 8);
	/// Small player sprite: 16x18
	pub const SMALL: (u8, u8) = (16, 18);
	/// Typical player sprite: 24x32
	pub const PLAYER: (u8, u8) = (24, 32);
	/// Largest observed sprite: 40x39
	pub const LARGE: (u8, u8) = (40, 39);
}

#[cfg(test)]
mod tests {
	use super::*;
	use fbpro_types::file::anim::{AnimationDatabase, ColorTable, RemapMode, decode_sprite};

	#[test]
	fn test_encode_decodes_back() {
		for &(w, h) in &[sizes::BALL, sizes::SMALL, sizes::PLAYER, sizes::LARGE] {
			let pixels = generate_sprite_pixels(w, h, 7);
			let block = encode_sprite(w, h, &pixels);
			let identity = ColorTable::identity();
			let decoded = decode_sprite(&block, RemapMode::Deferred, &identity).unwrap();
			assert_eq!(decoded.pixels(), pixels.as_slice());
		}
	}

	#[test]
	fn test_encoder_uses_back_references() {
		let pixels = vec![5u8; 64];
		let block = encode_sprite(8, 8, &pixels);
		assert!(block.len() < pixels.len());
	}

	#[test]
	fn test_generate_test_anim_file() {
		let data = generate_test_anim_file(3, 2, sizes::SMALL);
		let database = AnimationDatabase::from_bytes(data).unwrap();

		assert_eq!(database.len(), 3);
		assert!(database.excluded().is_empty());
		let animation = database.animation("ANIM0001").unwrap();
		assert_eq!(animation.sprite_count(), 8);
		assert!(animation.sprite_reference(0, 5).unwrap().is_mirrored());
	}
}
