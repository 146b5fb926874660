//! ANIM.DAT CLI Utility
//!
//! A command-line tool for inspecting, verifying and exporting the sprite
//! animations stored in `ANIM.DAT`.
//!
//! # Features
//!
//! - **list**: List every animation in the directory
//! - **info**: Show the reference grid and sprite table of one animation
//! - **verify**: Decode every sprite and check its size against its header
//! - **export**: Write sprites to PNG images with JSON metadata
//! - **sheet**: Render animations as sprite sheets, or a catalog of all of them
//!
//! # Metadata Format
//!
//! `export` writes one `<NAME>.json` per animation:
//! ```json
//! {
//!   "name": "RUN",
//!   "frame_count": 8,
//!   "view_count": 8,
//!   "table": "team-a",
//!   "references": [
//!     { "frame": 0, "view": 0, "sprite_id": 0, "mirrored": false, "x_offset": -9, "y_offset": -30 }
//!   ],
//!   "sprites": [
//!     { "sprite_id": 0, "width": 24, "height": 32, "filename": "RUN_000.png" }
//!   ]
//! }
//! ```
//!
//! # Palette
//!
//! Sprites hold palette indices. With `--palette`, a VGA palette (6-bit
//! components, either a bare 768-byte dump or a `.PAL` file with its 16-byte
//! header) is expanded to 8-bit RGB; without it indices are written as
//! grayscale. Index 0 is always exported as fully transparent.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example anim_utils -- list ANIM.DAT
//! cargo run --example anim_utils -- info ANIM.DAT RUN
//! cargo run --example anim_utils -- verify ANIM.DAT --strict
//! cargo run --example anim_utils -- export ANIM.DAT -o out/ -n RUN -t team-a -p MU1.PAL
//! cargo run --example anim_utils -- sheet ANIM.DAT -o sheets/ -n RUN -p MU1.PAL
//! cargo run --example anim_utils -- sheet ANIM.DAT --catalog
//! ```

mod palette;
mod sheet;

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fbpro_rs::prelude::file::anim::{
	AnimationData, AnimationDatabase, ColorTableId, LoadConfig, RenderableSprite, SpriteCache,
	SpriteCountSource, fill_isolated_gaps,
};
use image::{ImageBuffer, Rgba, RgbaImage};
use log::{info, warn};
use serde::Serialize;

use crate::{
	palette::{Palette, index_color, load_vga_palette},
	sheet::{RenderOptions, render_catalog, render_sheet, upscale},
};

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::List(args) => run_list(args),
		Command::Info(args) => run_info(args),
		Command::Verify(args) => run_verify(args),
		Command::Export(args) => run_export(args),
		Command::Sheet(args) => run_sheet(args),
	}
}

#[derive(Parser)]
#[command(name = "anim_utils")]
#[command(author = "fbpro-rs project")]
#[command(version)]
#[command(about = "Inspect, verify and export ANIM.DAT sprite animations", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List every animation in the file
	List(LoadArgs),
	/// Show details for a single animation
	Info(InfoArgs),
	/// Decode every sprite and check its size invariant
	Verify(LoadArgs),
	/// Export sprites to PNG with JSON metadata
	Export(ExportArgs),
	/// Render frames x views sprite sheets
	Sheet(SheetArgs),
}

#[derive(Args)]
struct LoadArgs {
	/// Path to ANIM.DAT
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Require both sprite-count interpretations to agree
	#[arg(long, default_value_t = false)]
	strict: bool,

	/// Skip the header/index frame-count cross-check
	#[arg(long, default_value_t = false, conflicts_with = "strict")]
	lenient: bool,

	/// Size offset tables by their first offset instead of the highest referenced sprite
	#[arg(long, default_value_t = false)]
	table_span: bool,
}

impl LoadArgs {
	fn config(&self) -> LoadConfig {
		let mut config = if self.strict {
			LoadConfig::strict()
		} else if self.lenient {
			LoadConfig::lenient()
		} else {
			LoadConfig::default()
		};
		if self.table_span {
			config.sprite_count = SpriteCountSource::TableSpan;
		}
		config
	}

	fn load(&self) -> Result<AnimationDatabase> {
		let path = self.file.display();
		let data = fs::read(&self.file).with_context(|| format!("Failed to read {path}"))?;
		AnimationDatabase::from_bytes_with_config(data, &self.config())
			.with_context(|| format!("Failed to parse {path}"))
	}
}

#[derive(Args)]
struct InfoArgs {
	#[command(flatten)]
	load: LoadArgs,

	/// Animation name
	#[arg(value_name = "NAME")]
	name: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableArg {
	/// Raw stream indices (identity table)
	Raw,
	/// Outline-only table
	Outline,
	/// Team variant A
	TeamA,
	/// Team variant B
	TeamB,
	/// Team variant C
	TeamC,
	/// Team variant D
	TeamD,
}

impl TableArg {
	fn id(self) -> Option<ColorTableId> {
		match self {
			TableArg::Raw => None,
			TableArg::Outline => Some(ColorTableId::Outline),
			TableArg::TeamA => Some(ColorTableId::TeamA),
			TableArg::TeamB => Some(ColorTableId::TeamB),
			TableArg::TeamC => Some(ColorTableId::TeamC),
			TableArg::TeamD => Some(ColorTableId::TeamD),
		}
	}

	fn label(self) -> String {
		self.id().map_or_else(|| "raw".to_string(), |id| id.to_string())
	}
}

#[derive(Args)]
struct ExportArgs {
	#[command(flatten)]
	load: LoadArgs,

	/// Output directory
	#[arg(short, long, value_name = "OUTPUT_DIR", default_value = "anim_export")]
	output: PathBuf,

	/// Only export this animation
	#[arg(short, long, value_name = "NAME")]
	name: Option<String>,

	/// Color table to render with
	#[arg(short, long, value_enum, default_value_t = TableArg::Raw)]
	table: TableArg,

	/// VGA palette: `.PAL` file or bare 768-byte dump
	#[arg(short, long, value_name = "PALETTE")]
	palette: Option<PathBuf>,

	/// Fill isolated 1-pixel transparent gaps
	#[arg(long, default_value_t = false)]
	fill_gaps: bool,
}

#[derive(Args)]
struct SheetArgs {
	#[command(flatten)]
	load: LoadArgs,

	/// Output directory
	#[arg(short, long, value_name = "OUTPUT_DIR", default_value = "anim_sheets")]
	output: PathBuf,

	/// Only render this animation
	#[arg(short, long, value_name = "NAME", conflicts_with = "catalog")]
	name: Option<String>,

	/// Color table to render with
	#[arg(short, long, value_enum, default_value_t = TableArg::Raw)]
	table: TableArg,

	/// VGA palette: `.PAL` file or bare 768-byte dump
	#[arg(short, long, value_name = "PALETTE")]
	palette: Option<PathBuf>,

	/// Nearest-neighbour scale factor
	#[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=16))]
	scale: u32,

	/// Render one pose per animation into a single catalog image
	#[arg(long, default_value_t = false)]
	catalog: bool,
}

fn run_list(args: LoadArgs) -> Result<()> {
	let database = args.load()?;

	println!("File: {} (size: {} bytes)", args.file.display(), database.file_len());
	println!(
		"{:<4} {:<8} {:>6} {:>5} {:>7} {:>10}",
		"#", "NAME", "FRAMES", "VIEWS", "SPRITES", "OFFSET"
	);
	for (i, animation) in database.iter().enumerate() {
		println!(
			"{:<4} {:<8} {:>6} {:>5} {:>7}   0x{:06X}",
			i,
			animation.name(),
			animation.frame_count(),
			animation.view_count(),
			animation.sprite_count(),
			animation.entry().data_offset
		);
	}

	for (name, reason) in database.excluded() {
		println!("EXCLUDED {name}: {reason}");
	}
	println!("Total: {} loaded, {} excluded", database.len(), database.excluded().len());

	Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
	let database = args.load.load()?;
	let Some(animation) = database.animation(&args.name) else {
		bail!("No animation named {}", args.name);
	};

	println!("Animation: {}", animation.entry());
	println!(
		"Window: 0x{:06X}..0x{:06X} | reserved: {}",
		animation.window().start,
		animation.window().end,
		hex::encode(animation.header().reserved)
	);
	println!("Frames: {} | views: {}", animation.frame_count(), animation.view_count());

	for frame in 0..animation.frame_count() {
		println!("  frame {frame:3}");
		for view in 0..animation.view_count() {
			if let Some(reference) = animation.sprite_reference(frame, view) {
				println!("    view {view}: {reference}");
			}
		}
	}

	println!("Sprites: {}", animation.sprite_count());
	for sprite in 0..animation.sprite_count() {
		let id = animation.sprite_id(sprite as u8);
		match database.sprite_block(id) {
			Ok(block) => {
				let head = &block[..block.len().min(8)];
				let size = database
					.sprite_header(id)
					.map_or_else(|e| e.to_string(), |header| header.to_string());
				println!("  {sprite:3}: {size} [{}]", hex::encode(head));
			}
			Err(e) => println!("  {sprite:3}: {e}"),
		}
	}

	Ok(())
}

fn run_verify(args: LoadArgs) -> Result<()> {
	let database = args.load()?;
	let cache = SpriteCache::new(Arc::new(database));

	let mut checked = 0usize;
	let mut failures = 0usize;
	for animation in cache.database().iter() {
		for sprite in 0..animation.sprite_count() {
			let id = animation.sprite_id(sprite as u8);
			checked += 1;
			match cache.decoded(id) {
				Ok(decoded) if decoded.pixels().len() == decoded.header().pixel_count() => {}
				Ok(decoded) => {
					failures += 1;
					warn!(
						"{} sprite {sprite}: {} bytes for {}",
						animation.name(),
						decoded.pixels().len(),
						decoded.header()
					);
				}
				Err(e) => {
					failures += 1;
					warn!("{} sprite {sprite}: {e}", animation.name());
				}
			}
		}
	}

	let database = cache.database();
	println!(
		"Animations: {} loaded, {} excluded | sprites: {} checked, {} failed",
		database.len(),
		database.excluded().len(),
		checked,
		failures
	);

	if failures > 0 || !database.excluded().is_empty() {
		bail!("Verification finished with errors (see log)");
	}
	Ok(())
}

#[derive(Serialize)]
struct ReferenceMetadata {
	frame: usize,
	view: usize,
	sprite_id: u8,
	mirrored: bool,
	x_offset: i8,
	y_offset: i8,
}

#[derive(Serialize)]
struct SpriteMetadata {
	sprite_id: u8,
	width: usize,
	height: usize,
	filename: String,
}

#[derive(Serialize)]
struct AnimationMetadata {
	name: String,
	frame_count: usize,
	view_count: usize,
	table: String,
	references: Vec<ReferenceMetadata>,
	sprites: Vec<SpriteMetadata>,
}

fn run_export(args: ExportArgs) -> Result<()> {
	let database = Arc::new(args.load.load()?);
	let palette = match &args.palette {
		Some(path) => Some(load_vga_palette(path)?),
		None => None,
	};
	let cache = SpriteCache::new(Arc::clone(&database));

	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create {}", args.output.display()))?;

	let selected: Vec<&AnimationData> = match &args.name {
		Some(name) => {
			let Some(animation) = database.animation(name) else {
				bail!("No animation named {name}");
			};
			vec![animation]
		}
		None => database.iter().collect(),
	};

	let mut written = 0usize;
	for animation in selected {
		let mut metadata = AnimationMetadata {
			name: animation.name().to_string(),
			frame_count: animation.frame_count(),
			view_count: animation.view_count(),
			table: args.table.label(),
			references: Vec::new(),
			sprites: Vec::new(),
		};

		for frame in 0..animation.frame_count() {
			for view in 0..animation.view_count() {
				if let Some(reference) = animation.sprite_reference(frame, view) {
					metadata.references.push(ReferenceMetadata {
						frame,
						view,
						sprite_id: reference.sprite_id,
						mirrored: reference.is_mirrored(),
						x_offset: reference.x_offset,
						y_offset: reference.y_offset,
					});
				}
			}
		}

		for sprite in 0..animation.sprite_count() {
			let sprite = sprite as u8;
			let id = animation.sprite_id(sprite);
			// mirroring is per reference, bitmaps are exported as stored
			let result = match args.table.id() {
				Some(table) => cache.renderable(id, table, false),
				None => cache.renderable_raw(id, false),
			};
			let rendered = match result {
				Ok(rendered) => rendered,
				Err(e) => {
					warn!("Skipping {} sprite {sprite}: {e}", animation.name());
					continue;
				}
			};

			let mut rendered = RenderableSprite::clone(&rendered);
			if args.fill_gaps {
				fill_isolated_gaps(&mut rendered);
			}

			let filename = format!("{}_{:03}.png", animation.name(), sprite);
			save_sprite_png(&rendered, palette.as_ref(), &args.output.join(&filename))?;
			metadata.sprites.push(SpriteMetadata {
				sprite_id: sprite,
				width: rendered.width(),
				height: rendered.height(),
				filename,
			});
			written += 1;
		}

		let json = serde_json::to_string_pretty(&metadata)?;
		let json_path = args.output.join(format!("{}.json", animation.name()));
		fs::write(&json_path, json)
			.with_context(|| format!("Failed to write {}", json_path.display()))?;
	}

	info!("Exported {written} sprites to {}", args.output.display());
	Ok(())
}

fn run_sheet(args: SheetArgs) -> Result<()> {
	let database = Arc::new(args.load.load()?);
	let palette = match &args.palette {
		Some(path) => Some(load_vga_palette(path)?),
		None => None,
	};
	let cache = SpriteCache::new(Arc::clone(&database));
	let options = RenderOptions {
		table: args.table.id(),
		palette: palette.as_ref(),
	};

	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create {}", args.output.display()))?;

	if args.catalog {
		let img = upscale(render_catalog(&cache, &options), args.scale);
		let path = args.output.join("catalog.png");
		img.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
		info!("Saved {} ({} animations)", path.display(), database.len());
		return Ok(());
	}

	let selected: Vec<&AnimationData> = match &args.name {
		Some(name) => {
			let Some(animation) = database.animation(name) else {
				bail!("No animation named {name}");
			};
			vec![animation]
		}
		None => database.iter().collect(),
	};

	for animation in &selected {
		let img = upscale(render_sheet(&cache, animation, &options), args.scale);
		let path = args.output.join(format!("{}.png", animation.name()));
		img.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
	}

	let stats = cache.stats();
	info!(
		"Rendered {} sheets to {} ({} sprites decoded, {} render hits)",
		selected.len(),
		args.output.display(),
		stats.decodes,
		stats.render_hits
	);
	Ok(())
}

fn save_sprite_png(
	sprite: &RenderableSprite,
	palette: Option<&Palette>,
	path: &Path,
) -> Result<()> {
	let mut img: RgbaImage = ImageBuffer::new(sprite.width() as u32, sprite.height() as u32);
	for (x, y, pixel) in img.enumerate_pixels_mut() {
		let (x, y) = (x as usize, y as usize);
		let index = sprite.pixel(x, y).unwrap_or(0);
		let alpha = if sprite.is_opaque(x, y) {
			0xFF
		} else {
			0x00
		};
		let [r, g, b] = index_color(palette, index);
		*pixel = Rgba([r, g, b, alpha]);
	}
	img.save(path).with_context(|| format!("Failed to write {}", path.display()))?;
	Ok(())
}
