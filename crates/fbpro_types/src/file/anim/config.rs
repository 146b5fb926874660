//! Load configuration for animation databases.

/// How many entries the sprite offset table holds.
///
/// The format does not store the count, so it has to be inferred. The two
/// interpretations agree on every well-formed file; they only diverge when a
/// table carries entries for sprites no frame references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteCountSource {
	/// Highest referenced sprite ID + 1
	#[default]
	Referenced,

	/// First table offset / 2, i.e. the table runs up to the first bitmap
	TableSpan,
}

/// Configuration for loading an `ANIM.DAT` file.
///
/// # Presets
///
/// - `default()`: infer sprite counts from references, check frame counts
/// - `lenient()`: skip the frame-count cross-check
/// - `strict()`: additionally require both sprite-count interpretations to agree
///
/// # Examples
///
/// ```
/// use fbpro_types::file::anim::{LoadConfig, SpriteCountSource};
///
/// let config = LoadConfig::strict();
/// assert!(config.require_count_agreement);
///
/// let config = LoadConfig {
/// 	sprite_count: SpriteCountSource::TableSpan,
/// 	..LoadConfig::default()
/// };
/// assert!(config.check_frame_counts);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
	/// Where the sprite offset table length comes from
	pub sprite_count: SpriteCountSource,

	/// Reject animations whose header frame count differs from the index
	pub check_frame_counts: bool,

	/// Reject animations where the two sprite-count interpretations disagree
	pub require_count_agreement: bool,
}

impl Default for LoadConfig {
	fn default() -> Self {
		Self {
			sprite_count: SpriteCountSource::Referenced,
			check_frame_counts: true,
			require_count_agreement: false,
		}
	}
}

impl LoadConfig {
	/// Skips the frame-count cross-check.
	pub fn lenient() -> Self {
		Self {
			check_frame_counts: false,
			..Self::default()
		}
	}

	/// Requires every consistency check to pass.
	pub fn strict() -> Self {
		Self {
			require_count_agreement: true,
			..Self::default()
		}
	}
}
