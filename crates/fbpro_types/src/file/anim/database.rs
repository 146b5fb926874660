//! Loaded animation database.
//!
//! The whole file is read once and parsed eagerly: directory, every animation
//! header, every sprite offset table. Sprite bitmaps are decoded lazily, see
//! [`AnimationDatabase::decode_sprite`] and [`super::SpriteCache`].

use std::{collections::HashMap, fmt, io::Read, ops::Range, path::Path};

use log::{debug, warn};
use serde::Serialize;

use crate::file::{DecodeError, FormatError, HeaderMismatchError};

use super::{
	color_table::ColorTable,
	config::LoadConfig,
	decode::{DecodedSprite, RemapMode, SpriteBitmapHeader, decode_sprite},
	header::{AnimationHeader, SpriteReference},
	index::{AnimationEntry, IndexTable},
	offsets::SpriteOffsetTable,
};

/// Identifies one physical bitmap.
///
/// Sprite IDs are local to an animation, so the key carries the animation's
/// position in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpriteId {
	/// Position of the animation in [`AnimationDatabase::iter`] order
	pub animation: usize,

	/// Sprite ID within the animation
	pub sprite: u8,
}

impl fmt::Display for SpriteId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}:{}", self.animation, self.sprite)
	}
}

/// One successfully parsed animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationData {
	position: usize,
	entry: AnimationEntry,
	window: Range<usize>,
	header: AnimationHeader,
	offsets: SpriteOffsetTable,
}

impl AnimationData {
	fn parse(
		data: &[u8],
		position: usize,
		entry: &AnimationEntry,
		window: Range<usize>,
		config: &LoadConfig,
	) -> Result<Self, HeaderMismatchError> {
		let bytes = &data[window.clone()];
		let header = AnimationHeader::parse(bytes, entry, config.check_frame_counts)?;
		let offsets = SpriteOffsetTable::parse(bytes, header.size(), entry, &header, config)?;

		Ok(Self {
			position,
			entry: entry.clone(),
			window,
			header,
			offsets,
		})
	}

	/// Animation name.
	pub fn name(&self) -> &str {
		&self.entry.name
	}

	/// Directory entry this animation was loaded from.
	pub fn entry(&self) -> &AnimationEntry {
		&self.entry
	}

	/// Parsed header, reference table included.
	pub fn header(&self) -> &AnimationHeader {
		&self.header
	}

	/// Number of frames.
	pub fn frame_count(&self) -> usize {
		self.header.frame_count as usize
	}

	/// Number of views per frame.
	pub fn view_count(&self) -> usize {
		self.header.view_count as usize
	}

	/// All sprite references, frame-major.
	pub fn references(&self) -> &[SpriteReference] {
		&self.header.references
	}

	/// Bounds-checked reference for `(frame, view)`.
	pub fn sprite_reference(&self, frame: usize, view: usize) -> Option<SpriteReference> {
		self.header.reference(frame, view)
	}

	/// The animation's sprite offset table.
	pub fn sprite_offsets(&self) -> &SpriteOffsetTable {
		&self.offsets
	}

	/// Number of physical bitmaps.
	pub fn sprite_count(&self) -> usize {
		self.offsets.len()
	}

	/// Absolute byte range of the animation in the file.
	pub fn window(&self) -> Range<usize> {
		self.window.clone()
	}

	/// Cache key for one of this animation's sprites.
	pub fn sprite_id(&self, sprite: u8) -> SpriteId {
		SpriteId {
			animation: self.position,
			sprite,
		}
	}
}

/// Immutable, fully indexed `ANIM.DAT`.
#[derive(Debug, Clone)]
pub struct AnimationDatabase {
	raw: Vec<u8>,
	index: IndexTable,
	animations: Vec<AnimationData>,
	by_name: HashMap<String, usize>,
	excluded: Vec<(String, HeaderMismatchError)>,
}

/// Loads a database with [`LoadConfig::default`].
///
/// # Errors
///
/// Returns a [`FormatError`] if the directory is malformed. Animations with
/// bad headers are excluded instead, see [`AnimationDatabase::excluded`].
pub fn load_database(bytes: impl Into<Vec<u8>>) -> Result<AnimationDatabase, FormatError> {
	load_database_with_config(bytes, &LoadConfig::default())
}

/// Loads a database with an explicit configuration.
///
/// # Errors
///
/// Returns a [`FormatError`] if the directory is malformed.
pub fn load_database_with_config(
	bytes: impl Into<Vec<u8>>,
	config: &LoadConfig,
) -> Result<AnimationDatabase, FormatError> {
	AnimationDatabase::from_bytes_with_config(bytes.into(), config)
}

impl AnimationDatabase {
	/// Opens and parses the file at `path`.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the directory is malformed.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, FormatError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(data)
	}

	/// Reads the whole of `reader` and parses it.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the directory is malformed.
	pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, FormatError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(data)
	}

	/// Parses an in-memory file with [`LoadConfig::default`].
	///
	/// # Errors
	///
	/// Returns an error if the directory is malformed.
	pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self, FormatError> {
		Self::from_bytes_with_config(data.into(), &LoadConfig::default())
	}

	/// Parses an in-memory file.
	///
	/// # Errors
	///
	/// Returns an error if the directory is malformed.
	pub fn from_bytes_with_config(raw: Vec<u8>, config: &LoadConfig) -> Result<Self, FormatError> {
		let index = IndexTable::from_bytes(&raw)?;

		let mut animations = Vec::with_capacity(index.animation_count());
		let mut by_name = HashMap::new();
		let mut excluded = Vec::new();

		for (i, entry) in index.animations().iter().enumerate() {
			let Some(window) = index.window(i) else {
				let error = HeaderMismatchError::OffsetOutOfRange {
					name: entry.name.clone(),
					offset: entry.data_offset,
					file_len: raw.len(),
				};
				warn!("Excluding animation: {error}");
				excluded.push((entry.name.clone(), error));
				continue;
			};

			match AnimationData::parse(&raw, animations.len(), entry, window, config) {
				Ok(animation) => {
					if by_name.contains_key(&entry.name) {
						warn!("Duplicate animation name {}, keeping the first", entry.name);
					} else {
						by_name.insert(entry.name.clone(), animations.len());
					}
					animations.push(animation);
				}
				Err(error) => {
					warn!("Excluding animation: {error}");
					excluded.push((entry.name.clone(), error));
				}
			}
		}

		debug!(
			"Loaded {} of {} animations ({} excluded, {} bytes)",
			animations.len(),
			index.animation_count(),
			excluded.len(),
			raw.len()
		);

		Ok(Self {
			raw,
			index,
			animations,
			by_name,
			excluded,
		})
	}

	/// Looks an animation up by name.
	pub fn animation(&self, name: &str) -> Option<&AnimationData> {
		self.by_name.get(name).map(|&i| &self.animations[i])
	}

	/// Animation at `position` in load order.
	pub fn animation_at(&self, position: usize) -> Option<&AnimationData> {
		self.animations.get(position)
	}

	/// Iterates over loaded animations in directory order.
	pub fn iter(&self) -> std::slice::Iter<'_, AnimationData> {
		self.animations.iter()
	}

	/// Number of loaded animations.
	pub fn len(&self) -> usize {
		self.animations.len()
	}

	/// Returns `true` if no animation was loaded.
	pub fn is_empty(&self) -> bool {
		self.animations.is_empty()
	}

	/// Animations left out of the database, with the reason.
	pub fn excluded(&self) -> &[(String, HeaderMismatchError)] {
		&self.excluded
	}

	/// The parsed directory, sentinel included.
	pub fn index(&self) -> &IndexTable {
		&self.index
	}

	/// Length of the underlying file.
	pub fn file_len(&self) -> usize {
		self.raw.len()
	}

	/// Compressed block of a sprite, running to the end of its animation window.
	///
	/// # Errors
	///
	/// Returns [`DecodeError::UnknownSprite`] if the animation or sprite does
	/// not exist, or [`DecodeError::BlockOutOfBounds`] if its offset lies
	/// outside the animation.
	pub fn sprite_block(&self, id: SpriteId) -> Result<&[u8], DecodeError> {
		let range = self.block_range(id)?;
		Ok(&self.raw[range])
	}

	/// Bitmap dimensions of a sprite without decoding it.
	///
	/// # Errors
	///
	/// Same as [`AnimationDatabase::sprite_block`], plus
	/// [`DecodeError::BlockOutOfBounds`] if the block is too short to hold a
	/// bitmap header.
	pub fn sprite_header(&self, id: SpriteId) -> Result<SpriteBitmapHeader, DecodeError> {
		let range = self.block_range(id)?;
		SpriteBitmapHeader::from_bytes(&self.raw[range.clone()]).ok_or(
			DecodeError::BlockOutOfBounds {
				animation: id.animation,
				sprite: id.sprite,
				offset: range.start,
			},
		)
	}

	fn block_range(&self, id: SpriteId) -> Result<Range<usize>, DecodeError> {
		let unknown = DecodeError::UnknownSprite {
			animation: id.animation,
			sprite: id.sprite,
		};
		let Some(animation) = self.animations.get(id.animation) else {
			return Err(unknown);
		};
		let Some(relative) = animation.offsets.block_start(id.sprite) else {
			return Err(unknown);
		};

		let window = animation.window();
		let start = window.start + relative;
		if start >= window.end {
			return Err(DecodeError::BlockOutOfBounds {
				animation: id.animation,
				sprite: id.sprite,
				offset: start,
			});
		}

		Ok(start..window.end)
	}

	/// Decodes one sprite, bypassing any cache.
	///
	/// # Errors
	///
	/// Returns an error if the sprite cannot be located or its stream is
	/// malformed.
	pub fn decode_sprite(
		&self,
		id: SpriteId,
		mode: RemapMode,
		table: &ColorTable,
	) -> Result<DecodedSprite, DecodeError> {
		let block = self.sprite_block(id)?;
		Ok(decode_sprite(block, mode, table)?)
	}
}

impl<'a> IntoIterator for &'a AnimationDatabase {
	type Item = &'a AnimationData;
	type IntoIter = std::slice::Iter<'a, AnimationData>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
