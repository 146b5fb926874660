//! Sprite sheet and catalog rendering.
//!
//! A sheet lays one animation out as a grid with views as columns and frames
//! as rows. Every cell has a feet anchor at its bottom centre, and each
//! reference is drawn at that anchor plus its own offsets, mirrored when its
//! flag says so. The catalog shows one representative pose per animation.

use image::{ImageBuffer, Rgba, RgbaImage, imageops};
use log::warn;

use fbpro_rs::prelude::file::anim::{
	AnimationData, ColorTableId, RenderableSprite, SpriteCache, SpriteReference,
};

use crate::palette::{Palette, index_color};

/// Sheet cell size
pub const SHEET_CELL: (u32, u32) = (40, 48);

/// Catalog cell size
pub const CATALOG_CELL: (u32, u32) = (32, 48);

/// Animations per catalog row
pub const CATALOG_COLUMNS: u32 = 10;

/// Distance from the bottom of a cell to the feet anchor
const ANCHOR_MARGIN: u32 = 4;

/// Preferred catalog view; falls back to the last view
const CATALOG_VIEW: usize = 4;

const SHEET_BACKGROUND: Rgba<u8> = Rgba([32, 96, 32, 255]);
const CATALOG_BACKGROUND: Rgba<u8> = Rgba([32, 80, 32, 255]);

/// Colors and tables shared by every drawn sprite.
pub struct RenderOptions<'a> {
	/// Color table, `None` for raw indices
	pub table: Option<ColorTableId>,

	/// Palette for RGB output, `None` for grayscale
	pub palette: Option<&'a Palette>,
}

/// Feet anchor of the cell at `(column, row)`.
pub fn cell_anchor(cell: (u32, u32), column: u32, row: u32) -> (i64, i64) {
	let (width, height) = cell;
	(
		i64::from(column * width + width / 2),
		i64::from(row * height + height - ANCHOR_MARGIN),
	)
}

/// Draws the opaque pixels of `sprite` with its top-left corner at `origin`.
///
/// Pixels falling outside `img` are clipped.
pub fn draw_sprite(
	img: &mut RgbaImage,
	sprite: &RenderableSprite,
	origin: (i64, i64),
	palette: Option<&Palette>,
) {
	for (y, row) in sprite.rows().enumerate() {
		for (x, &index) in row.iter().enumerate() {
			if !sprite.is_opaque(x, y) {
				continue;
			}
			let px = origin.0 + x as i64;
			let py = origin.1 + y as i64;
			if px < 0 || py < 0 || px >= i64::from(img.width()) || py >= i64::from(img.height()) {
				continue;
			}
			let [r, g, b] = index_color(palette, index);
			img.put_pixel(px as u32, py as u32, Rgba([r, g, b, 255]));
		}
	}
}

/// Renders `reference` into the cell at `(column, row)`; undecodable sprites
/// are logged and left out.
fn draw_reference(
	img: &mut RgbaImage,
	cache: &SpriteCache,
	animation: &AnimationData,
	reference: SpriteReference,
	cell: ((u32, u32), u32, u32),
	options: &RenderOptions<'_>,
) {
	let id = animation.sprite_id(reference.sprite_id);
	let mirrored = reference.is_mirrored();
	let result = match options.table {
		Some(table) => cache.renderable(id, table, mirrored),
		None => cache.renderable_raw(id, mirrored),
	};

	match result {
		Ok(sprite) => {
			let (size, column, row) = cell;
			let (ax, ay) = cell_anchor(size, column, row);
			let origin = (ax + i64::from(reference.x_offset), ay + i64::from(reference.y_offset));
			draw_sprite(img, &sprite, origin, options.palette);
		}
		Err(e) => warn!("{} sprite {}: {e}", animation.name(), reference.sprite_id),
	}
}

/// Renders every frame and view of one animation.
pub fn render_sheet(
	cache: &SpriteCache,
	animation: &AnimationData,
	options: &RenderOptions<'_>,
) -> RgbaImage {
	let views = animation.view_count().max(1) as u32;
	let frames = animation.frame_count() as u32;
	let mut img = ImageBuffer::from_pixel(
		views * SHEET_CELL.0,
		frames * SHEET_CELL.1,
		SHEET_BACKGROUND,
	);

	for frame in 0..animation.frame_count() {
		for view in 0..animation.view_count() {
			if let Some(reference) = animation.sprite_reference(frame, view) {
				let cell = (SHEET_CELL, view as u32, frame as u32);
				draw_reference(&mut img, cache, animation, reference, cell, options);
			}
		}
	}

	img
}

/// Renders frame 0 of every animation in the cache's database.
pub fn render_catalog(cache: &SpriteCache, options: &RenderOptions<'_>) -> RgbaImage {
	let database = cache.database();
	let rows = (database.len() as u32).div_ceil(CATALOG_COLUMNS).max(1);
	let mut img = ImageBuffer::from_pixel(
		CATALOG_COLUMNS * CATALOG_CELL.0,
		rows * CATALOG_CELL.1,
		CATALOG_BACKGROUND,
	);

	for (i, animation) in database.iter().enumerate() {
		let view = CATALOG_VIEW.min(animation.view_count().saturating_sub(1));
		let Some(reference) = animation.sprite_reference(0, view) else {
			continue;
		};
		let i = i as u32;
		let cell = (CATALOG_CELL, i % CATALOG_COLUMNS, i / CATALOG_COLUMNS);
		draw_reference(&mut img, cache, animation, reference, cell, options);
	}

	img
}

/// Nearest-neighbour upscale; `scale <= 1` returns the image unchanged.
pub fn upscale(img: RgbaImage, scale: u32) -> RgbaImage {
	if scale <= 1 {
		return img;
	}
	imageops::resize(
		&img,
		img.width() * scale,
		img.height() * scale,
		imageops::FilterType::Nearest,
	)
}
