//! VGA palette loading.
//!
//! Two layouts are accepted: a bare 768-byte dump of 256 RGB triplets, and
//! the game's `.PAL` files, which put a 16-byte `PAL:` + `VGA:` chunk header
//! in front of the same triplets. Components are 6-bit.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};

/// Size of a full 256-color VGA palette
pub const VGA_PALETTE_SIZE: usize = 768;

/// Magic at the start of a `.PAL` file
const PAL_MAGIC: &[u8; 4] = b"PAL:";

/// `PAL:` chunk header plus `VGA:` chunk header
const PAL_HEADER_SIZE: usize = 16;

/// 256 colors expanded to 8-bit RGB.
pub type Palette = [[u8; 3]; 256];

/// Loads a palette file, expanding 6-bit components to 8 bits.
pub fn load_vga_palette(path: &Path) -> Result<Palette> {
	let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
	parse_vga_palette(&data).with_context(|| format!("Invalid palette {}", path.display()))
}

/// Parses either palette layout.
pub fn parse_vga_palette(data: &[u8]) -> Result<Palette> {
	let rgb = if data.starts_with(PAL_MAGIC) {
		data.get(PAL_HEADER_SIZE..).unwrap_or_default()
	} else {
		data
	};
	if rgb.len() < VGA_PALETTE_SIZE {
		bail!("{} bytes of color data, expected {}", rgb.len(), VGA_PALETTE_SIZE);
	}

	let mut palette = [[0u8; 3]; 256];
	for (color, triplet) in palette.iter_mut().zip(rgb.chunks_exact(3)) {
		for (out, &component) in color.iter_mut().zip(triplet) {
			let six = component & 0x3F;
			*out = (six << 2) | (six >> 4);
		}
	}
	Ok(palette)
}

/// RGB for a palette index; grayscale without a palette.
#[inline]
pub fn index_color(palette: Option<&Palette>, index: u8) -> [u8; 3] {
	match palette {
		Some(palette) => palette[index as usize],
		None => [index; 3],
	}
}
