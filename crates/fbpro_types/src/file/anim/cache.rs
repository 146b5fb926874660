//! Two-level sprite cache.
//!
//! - decode level, keyed by [`SpriteId`]: color-independent, always decoded
//!   with [`RemapMode::Deferred`]
//! - render level, keyed by `(SpriteId, table, mirrored)`
//!
//! Both levels sit behind one mutex that stays locked for the whole
//! decode-and-assemble step, so a key is only ever computed once even when
//! several threads ask for it at the same time. Entries are never evicted.
//! Stream failures are permanent and memoized like successes.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex, PoisonError},
};

use log::trace;

use crate::file::DecodeError;

use super::{
	assemble::{RenderableSprite, assemble},
	color_table::{ColorTable, ColorTableBank, ColorTableId},
	database::{AnimationDatabase, SpriteId},
	decode::{DecodedSprite, RemapMode, decode_sprite},
};

/// `None` selects the identity table.
type RenderKey = (SpriteId, Option<ColorTableId>, bool);

/// Work counters, mostly useful in tests and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
	/// Streams decompressed
	pub decodes: usize,

	/// Sprites assembled
	pub assemblies: usize,

	/// Decode-level lookups served from cache
	pub decode_hits: usize,

	/// Render-level lookups served from cache
	pub render_hits: usize,
}

#[derive(Debug, Default)]
struct CacheState {
	decoded: HashMap<SpriteId, Result<Arc<DecodedSprite>, DecodeError>>,
	rendered: HashMap<RenderKey, Result<Arc<RenderableSprite>, DecodeError>>,
	stats: CacheStats,
}

/// Memoizing front end to an [`AnimationDatabase`].
#[derive(Debug)]
pub struct SpriteCache {
	database: Arc<AnimationDatabase>,
	bank: ColorTableBank,
	state: Mutex<CacheState>,
}

impl SpriteCache {
	/// Creates a cache using the standard color tables.
	pub fn new(database: Arc<AnimationDatabase>) -> Self {
		Self::with_bank(database, ColorTableBank::standard())
	}

	/// Creates a cache with a custom color table bank.
	pub fn with_bank(database: Arc<AnimationDatabase>, bank: ColorTableBank) -> Self {
		Self {
			database,
			bank,
			state: Mutex::new(CacheState::default()),
		}
	}

	/// The database backing this cache.
	pub fn database(&self) -> &Arc<AnimationDatabase> {
		&self.database
	}

	/// The color table bank used for rendering.
	pub fn bank(&self) -> &ColorTableBank {
		&self.bank
	}

	/// Decoded, un-remapped sprite.
	///
	/// # Errors
	///
	/// Returns an error if the sprite does not exist or its stream is malformed.
	pub fn decoded(&self, id: SpriteId) -> Result<Arc<DecodedSprite>, DecodeError> {
		let mut state = self.lock();
		self.decoded_locked(&mut state, id)
	}

	/// Sprite remapped through `table` and optionally mirrored.
	///
	/// # Errors
	///
	/// Returns an error if the sprite does not exist or its stream is malformed.
	pub fn renderable(
		&self,
		id: SpriteId,
		table: ColorTableId,
		mirrored: bool,
	) -> Result<Arc<RenderableSprite>, DecodeError> {
		self.render((id, Some(table), mirrored))
	}

	/// Sprite with raw palette indices (identity table), optionally mirrored.
	///
	/// # Errors
	///
	/// Returns an error if the sprite does not exist or its stream is malformed.
	pub fn renderable_raw(
		&self,
		id: SpriteId,
		mirrored: bool,
	) -> Result<Arc<RenderableSprite>, DecodeError> {
		self.render((id, None, mirrored))
	}

	/// Snapshot of the work counters.
	pub fn stats(&self) -> CacheStats {
		self.lock().stats
	}

	/// Number of render-level entries, failures included.
	pub fn len(&self) -> usize {
		self.lock().rendered.len()
	}

	/// Returns `true` if nothing has been rendered yet.
	pub fn is_empty(&self) -> bool {
		self.lock().rendered.is_empty()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
		// entries are inserted whole, a poisoned map is still consistent
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn render(&self, key: RenderKey) -> Result<Arc<RenderableSprite>, DecodeError> {
		let mut state = self.lock();
		if let Some(entry) = state.rendered.get(&key) {
			let entry = entry.clone();
			state.stats.render_hits += 1;
			trace!("Render cache hit for {} {:?} mirrored={}", key.0, key.1, key.2);
			return entry;
		}

		trace!("Render cache miss for {} {:?} mirrored={}", key.0, key.1, key.2);
		let (id, table, mirrored) = key;
		let decoded = match self.decoded_locked(&mut state, id) {
			Ok(decoded) => decoded,
			// not a real key, keep it out of the cache
			Err(e @ DecodeError::UnknownSprite {
				..
			}) => return Err(e),
			Err(e) => {
				state.rendered.insert(key, Err(e.clone()));
				return Err(e);
			}
		};

		let identity = ColorTable::identity();
		let table = table.map_or(&identity, |t| self.bank.get(t));
		let sprite = Arc::new(assemble(&decoded, table, mirrored, decoded.mode()));
		state.stats.assemblies += 1;
		state.rendered.insert(key, Ok(Arc::clone(&sprite)));

		Ok(sprite)
	}

	fn decoded_locked(
		&self,
		state: &mut CacheState,
		id: SpriteId,
	) -> Result<Arc<DecodedSprite>, DecodeError> {
		if let Some(entry) = state.decoded.get(&id) {
			let entry = entry.clone();
			state.stats.decode_hits += 1;
			trace!("Decode cache hit for {id}");
			return entry;
		}

		trace!("Decode cache miss for {id}");
		let block = self.database.sprite_block(id)?;
		let result = decode_sprite(block, RemapMode::Deferred, &ColorTable::identity())
			.map(Arc::new)
			.map_err(DecodeError::from);
		state.stats.decodes += 1;
		state.decoded.insert(id, result.clone());

		result
	}
}
