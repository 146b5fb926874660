//! Integration tests for `ANIM.DAT` decoding through the `fbpro-rs` facade.
//!
//! `test_real_corpus` needs a real file: set `FBPRO_ANIM_DAT` to its path.

use std::sync::Arc;

use fbpro_rs::prelude::*;
use fbpro_rs::prelude::file::anim::{SpriteCountSource, mirror_rows};

use crate::fixture::{Token, build, sprite_block};

mod fixture;

/// `TACKLE`: one frame, two views sharing sprite 0 (view 1 mirrored).
fn tackle_file() -> Vec<u8> {
	// 8x1: 3 literals, then a self-overlapping run
	let sprite = sprite_block(
		8,
		1,
		&[Token::Lit(0), Token::Lit(33), Token::Lit(49), Token::Copy(5, 1)],
	);
	build(&[("TACKLE", 1, 2, vec![[0, 0, 0xFC, 0xF0], [1, 0, 4, 0xF0]], vec![sprite])])
}

#[test_log::test]
fn test_load_and_render() {
	let database = Arc::new(load_database(tackle_file()).unwrap());
	let tackle = database.animation("TACKLE").unwrap();
	assert_eq!((tackle.frame_count(), tackle.view_count()), (1, 2));

	let cache = SpriteCache::new(Arc::clone(&database));
	let left = tackle.sprite_reference(0, 0).unwrap();
	let right = tackle.sprite_reference(0, 1).unwrap();
	assert_eq!(left.sprite_id, right.sprite_id);
	assert_eq!(left.x_offset, -4);

	let id = tackle.sprite_id(left.sprite_id);
	let raw = cache.renderable_raw(id, left.is_mirrored()).unwrap();
	// 0, 33, 49, then copy distance 1 repeats [33, 49]
	assert_eq!(raw.pixels(), &[0, 33, 49, 33, 49, 33, 49, 33]);
	assert!(!raw.is_opaque(0, 0));

	let team = cache.renderable(id, ColorTableId::TeamC, right.is_mirrored()).unwrap();
	let unmirrored = cache.renderable(id, ColorTableId::TeamC, false).unwrap();
	assert_eq!(team.pixels(), mirror_rows(unmirrored.pixels(), 8, 1).as_slice());
	assert_eq!(team.pixel(7, 0), Some(0));
	assert_eq!(cache.stats().decodes, 1);
}

#[test]
fn test_inline_and_deferred_agree() {
	let database = load_database(tackle_file()).unwrap();
	let id = database.animation("TACKLE").unwrap().sprite_id(0);
	let bank = ColorTableBank::standard();

	for (table_id, table) in bank.iter() {
		let inline = database.decode_sprite(id, RemapMode::Inline, table).unwrap();
		let deferred = database.decode_sprite(id, RemapMode::Deferred, table).unwrap();
		assert_eq!(
			assemble(&inline, table, false, RemapMode::Inline),
			assemble(&deferred, table, false, RemapMode::Deferred),
			"table {table_id}"
		);
	}
}

#[test]
fn test_config_presets() {
	// sprite 1 is referenced but the offset table only spans one entry
	let file = build(&[(
		"SNAP",
		1,
		1,
		vec![[0, 1, 0, 0]],
		vec![sprite_block(8, 1, &[Token::Lit(1), Token::Copy(7, 0)])],
	)]);

	let database = load_database(file.clone()).unwrap();
	assert_eq!(database.animation("SNAP").unwrap().sprite_count(), 2);

	let config = LoadConfig {
		sprite_count: SpriteCountSource::TableSpan,
		..LoadConfig::default()
	};
	let database = AnimationDatabase::from_bytes_with_config(file.clone(), &config).unwrap();
	assert_eq!(database.animation("SNAP").unwrap().sprite_count(), 1);

	let database = AnimationDatabase::from_bytes_with_config(file, &LoadConfig::strict()).unwrap();
	assert!(database.is_empty());
	assert!(matches!(
		database.excluded()[0].1,
		HeaderMismatchError::SpriteCountDisagreement {
			referenced: 2,
			table_span: 1,
			..
		}
	));
}

#[test]
fn test_format_error_is_fatal() {
	let mut file = tackle_file();
	file.truncate(file.len() - 1);
	assert!(matches!(load_database(file), Err(FormatError::InvalidSentinel { .. })));
}

/// Size invariant over every sprite of a real `ANIM.DAT`.
#[test_log::test]
fn test_real_corpus() {
	let Some(path) = std::env::var_os("FBPRO_ANIM_DAT") else {
		log::info!("FBPRO_ANIM_DAT not set, skipping real corpus test");
		return;
	};

	let database = Arc::new(AnimationDatabase::open(&path).unwrap());
	let last = database.index().entries().last().unwrap();
	assert_eq!(last.frame_count, 0);
	assert_eq!(last.data_offset as usize, database.file_len());
	assert!(database.excluded().is_empty(), "excluded: {:?}", database.excluded());

	let cache = SpriteCache::new(Arc::clone(&database));
	let mut sprites = 0;
	for animation in database.iter() {
		for frame in 0..animation.frame_count() {
			for view in 0..animation.view_count() {
				let reference = animation.sprite_reference(frame, view).unwrap();
				assert!((reference.sprite_id as usize) < animation.sprite_count());
			}
		}

		for sprite in 0..animation.sprite_count() {
			let id = animation.sprite_id(sprite as u8);
			let decoded = cache.decoded(id).unwrap_or_else(|e| {
				panic!("{} sprite {sprite}: {e}", animation.name());
			});
			assert_eq!(decoded.pixels().len(), decoded.header().pixel_count());
			assert_eq!(decoded.width() % 8, 0, "{} sprite {sprite}", animation.name());
			sprites += 1;
		}
	}
	log::info!("Verified {sprites} sprites in {} animations", database.len());
}
