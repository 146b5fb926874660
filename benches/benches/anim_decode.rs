//! Benchmark suite for `ANIM.DAT` decoding
//!
//! This benchmark measures sprite decompression, database loading and the
//! sprite cache, on synthetic data from `fbpro_benches`.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! Set `FBPRO_ANIM_DAT` to also benchmark loading a real file.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fbpro_benches::{encode_sprite, generate_sprite_pixels, generate_test_anim_file, sizes};
use fbpro_types::file::anim::{
	AnimationDatabase, ColorTableBank, ColorTableId, RemapMode, SpriteCache, assemble,
	decode_sprite,
};

/// Benchmark decompression of a single sprite at several sizes
fn bench_decode_sizes(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_decode");
	let bank = ColorTableBank::standard();
	let table = bank.get(ColorTableId::TeamA);

	let cases = [
		("ball", sizes::BALL),
		("small", sizes::SMALL),
		("player", sizes::PLAYER),
		("large", sizes::LARGE),
	];
	for (name, (w, h)) in cases {
		let block = encode_sprite(w, h, &generate_sprite_pixels(w, h, 42));

		group.throughput(Throughput::Elements(w as u64 * h as u64));
		group.bench_with_input(BenchmarkId::new("deferred", name), &block, |b, block| {
			b.iter(|| decode_sprite(black_box(block), RemapMode::Deferred, table));
		});
		group.bench_with_input(BenchmarkId::new("inline", name), &block, |b, block| {
			b.iter(|| decode_sprite(black_box(block), RemapMode::Inline, table));
		});
	}

	group.finish();
}

/// Benchmark remap + transpose + mirror
fn bench_assemble(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_assemble");
	let bank = ColorTableBank::standard();
	let table = bank.get(ColorTableId::TeamB);

	let (w, h) = sizes::PLAYER;
	let block = encode_sprite(w, h, &generate_sprite_pixels(w, h, 3));
	let Ok(decoded) = decode_sprite(&block, RemapMode::Deferred, table) else {
		eprintln!("Warning: synthetic sprite failed to decode");
		return;
	};

	group.throughput(Throughput::Elements(w as u64 * h as u64));
	for mirror in [false, true] {
		group.bench_with_input(BenchmarkId::new("player", mirror), &mirror, |b, &mirror| {
			b.iter(|| assemble(black_box(&decoded), table, mirror, RemapMode::Deferred));
		});
	}

	group.finish();
}

/// Benchmark database loading
fn bench_load(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_load");

	for animations in [16usize, 128] {
		let data = generate_test_anim_file(animations, 4, sizes::SMALL);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("synthetic", animations), &data, |b, data| {
			b.iter(|| AnimationDatabase::from_bytes(black_box(data.as_slice())));
		});
	}

	// Real game file, skipped when not configured
	if let Some(path) = std::env::var_os("FBPRO_ANIM_DAT") {
		match std::fs::read(&path) {
			Ok(data) => {
				group.throughput(Throughput::Bytes(data.len() as u64));
				group.bench_with_input(BenchmarkId::new("real", "ANIM.DAT"), &data, |b, data| {
					b.iter(|| AnimationDatabase::from_bytes(black_box(data.as_slice())));
				});
			}
			Err(e) => eprintln!("Warning: Could not read {}: {e}", path.to_string_lossy()),
		}
	}

	group.finish();
}

/// Benchmark the cache hit path
fn bench_cache(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_cache");

	let data = generate_test_anim_file(4, 4, sizes::PLAYER);
	let Ok(database) = AnimationDatabase::from_bytes(data) else {
		eprintln!("Warning: synthetic file failed to load");
		return;
	};
	let database = Arc::new(database);
	let Some(animation) = database.animation_at(0) else {
		return;
	};
	let id = animation.sprite_id(0);

	let cache = SpriteCache::new(Arc::clone(&database));
	// warm
	let _ = cache.renderable(id, ColorTableId::TeamA, true);

	group.bench_function("renderable_hit", |b| {
		b.iter(|| cache.renderable(black_box(id), ColorTableId::TeamA, true));
	});

	group.bench_function("renderable_cold", |b| {
		b.iter(|| {
			let cache = SpriteCache::new(Arc::clone(&database));
			cache.renderable(black_box(id), ColorTableId::TeamA, true)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_decode_sizes, bench_assemble, bench_load, bench_cache);
criterion_main!(benches);
