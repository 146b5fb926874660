//! Sprite assembly: color remap, mirroring and transparency.
//!
//! Turns a [`DecodedSprite`] into a [`RenderableSprite`], a row-major buffer
//! of palette indices plus a transparency mask. No RGB conversion happens here;
//! callers look the indices up in their own palette.
//!
//! # Outline gaps
//!
//! Team tables zero the outline ranges, which leaves 1-pixel holes inside
//! some sprites. They are invisible at native resolution and show up as
//! banding when scaled. [`fill_isolated_gaps`] is an opt-in filter for
//! scaled renderers; [`assemble`] never applies it.

use std::fmt::Write as _;

use super::{
	color_table::ColorTable,
	constants::{MASK_OPAQUE, MASK_TRANSPARENT, TRANSPARENT_INDEX},
	decode::{DecodedSprite, RemapMode},
};

/// Row-major indexed sprite ready for drawing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderableSprite {
	width: usize,
	height: usize,

	/// Final palette indices, row-major
	pixels: Vec<u8>,

	/// `0xFF` where opaque, `0x00` where transparent
	mask: Vec<u8>,
}

impl RenderableSprite {
	/// Builds a sprite from row-major indices, deriving the mask from index 0.
	///
	/// Returns `None` if `pixels.len() != width * height`.
	pub fn from_indices(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
		if pixels.len() != width * height {
			return None;
		}
		let mask = build_mask(&pixels);
		Some(Self {
			width,
			height,
			pixels,
			mask,
		})
	}

	/// Width in pixels.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Palette indices, row-major.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Transparency mask, same layout as [`RenderableSprite::pixels`].
	pub fn mask(&self) -> &[u8] {
		&self.mask
	}

	/// Palette index at `(x, y)`.
	pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some(self.pixels[y * self.width + x])
	}

	/// Returns `true` if `(x, y)` is inside the sprite and opaque.
	pub fn is_opaque(&self, x: usize, y: usize) -> bool {
		x < self.width && y < self.height && self.mask[y * self.width + x] == MASK_OPAQUE
	}

	/// Iterates over pixel rows, top to bottom.
	pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
		self.pixels.chunks_exact(self.width.max(1))
	}

	/// Number of opaque pixels.
	pub fn opaque_count(&self) -> usize {
		self.mask.iter().filter(|&&m| m == MASK_OPAQUE).count()
	}

	/// Exports the mask as an ASCII PGM image.
	pub fn mask_to_pgm(&self) -> String {
		let mut pgm = format!("P2\n{} {}\n255\n", self.width, self.height);
		for row in self.mask.chunks_exact(self.width.max(1)) {
			let line: Vec<String> = row.iter().map(u8::to_string).collect();
			let _ = writeln!(pgm, "{}", line.join(" "));
		}
		pgm
	}
}

/// Assembles a decoded sprite.
///
/// - [`RemapMode::Deferred`]: `table` is applied to the whole buffer here
/// - [`RemapMode::Inline`]: the decoder already remapped, `table` is ignored
///
/// A sprite decoded with [`RemapMode::Inline`] is never remapped a second
/// time, whatever `mode` says.
///
/// `mirror` comes from the sprite reference's flag.
pub fn assemble(
	sprite: &DecodedSprite,
	table: &ColorTable,
	mirror: bool,
	mode: RemapMode,
) -> RenderableSprite {
	let width = sprite.width() as usize;
	let height = sprite.height() as usize;

	let mut pixels = sprite.to_row_major();
	if mode == RemapMode::Deferred && sprite.mode() == RemapMode::Deferred {
		table.remap_in_place(&mut pixels);
	}
	if mirror {
		pixels = mirror_rows(&pixels, width, height);
	}

	let mask = build_mask(&pixels);
	RenderableSprite {
		width,
		height,
		pixels,
		mask,
	}
}

/// Reverses every row of a row-major buffer: `out(x, y) = in(width - 1 - x, y)`.
pub fn mirror_rows(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
	debug_assert_eq!(pixels.len(), width * height);
	let mut out = Vec::with_capacity(pixels.len());
	for row in pixels.chunks_exact(width.max(1)) {
		out.extend(row.iter().rev());
	}
	out
}

fn build_mask(pixels: &[u8]) -> Vec<u8> {
	pixels
		.iter()
		.map(|&p| {
			if p == TRANSPARENT_INDEX {
				MASK_TRANSPARENT
			} else {
				MASK_OPAQUE
			}
		})
		.collect()
}

/// Fills transparent pixels whose four neighbours are all opaque.
///
/// Each filled pixel takes its left neighbour's index. Edge pixels are never
/// filled, and decisions use the unfiltered sprite so fills do not cascade.
/// Returns the number of pixels filled.
pub fn fill_isolated_gaps(sprite: &mut RenderableSprite) -> usize {
	let (width, height) = (sprite.width, sprite.height);
	if width < 3 || height < 3 {
		return 0;
	}

	let opaque = |mask: &[u8], x: usize, y: usize| mask[y * width + x] == MASK_OPAQUE;
	let source = sprite.mask.clone();
	let mut filled = 0;

	for y in 1..height - 1 {
		for x in 1..width - 1 {
			if opaque(&source, x, y) {
				continue;
			}
			if opaque(&source, x - 1, y)
				&& opaque(&source, x + 1, y)
				&& opaque(&source, x, y - 1)
				&& opaque(&source, x, y + 1)
			{
				let at = y * width + x;
				sprite.pixels[at] = sprite.pixels[at - 1];
				sprite.mask[at] = MASK_OPAQUE;
				filled += 1;
			}
		}
	}

	filled
}
