//! Team-color remap tables.
//!
//! Sprite streams store palette indices in the `0..64` range; a 64-entry
//! [`ColorTable`] maps them to final VGA indices. Bytes `>= 64` always pass
//! through unchanged.
//!
//! The game ships five tables:
//!
//! | ID | Role                                                     |
//! |----|----------------------------------------------------------|
//! | 0  | Outline only: indices 46 and 47 survive, all else zeroed |
//! | 1  | Team variant A (default gameplay table)                  |
//! | 2  | Team variant B                                           |
//! | 3  | Team variant C                                           |
//! | 4  | Team variant D                                           |
//!
//! Tables 1-4 zero `0..=15`, `20..=31` and `46..=47`, keep the skin/helmet
//! range `16..=19`, and route the two jersey ranges (`32..=45`, `48..=63`)
//! to either the `0x20` or the `0x30` block, which is how the home and away
//! colors are swapped.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{COLOR_TABLE_COUNT, COLOR_TABLE_SIZE};

const fn outline_table() -> [u8; COLOR_TABLE_SIZE] {
	let mut table = [0u8; COLOR_TABLE_SIZE];
	table[46] = 0x2E;
	table[47] = 0x2F;
	table
}

/// Builds a team table. `primary` and `secondary` are the base of the VGA
/// block (`0x20` or `0x30`) that jersey ranges `32..=45` and `48..=63` map to.
const fn team_table(primary: u8, secondary: u8) -> [u8; COLOR_TABLE_SIZE] {
	let mut table = [0u8; COLOR_TABLE_SIZE];

	let mut i = 16;
	while i < 20 {
		table[i] = i as u8;
		i += 1;
	}

	// 32..=43 follow the primary block, 44..=45 are fixed shadow/black
	let mut i = 0;
	while i < 12 {
		table[32 + i] = primary + i as u8;
		i += 1;
	}
	table[44] = 0x2C;
	table[45] = 0x2D;

	// 48..=59 follow the secondary block, 60..=63 are fixed highlights
	let mut i = 0;
	while i < 12 {
		table[48 + i] = secondary + i as u8;
		i += 1;
	}
	let mut i = 60;
	while i < 64 {
		table[i] = i as u8;
		i += 1;
	}

	table
}

const BANK: [[u8; COLOR_TABLE_SIZE]; COLOR_TABLE_COUNT] = [
	outline_table(),
	team_table(0x30, 0x20),
	team_table(0x20, 0x20),
	team_table(0x30, 0x30),
	team_table(0x20, 0x30),
];

/// Identifies one of the five built-in color tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColorTableId {
	/// Table 0: outline only
	Outline = 0,
	/// Table 1: team variant A
	TeamA = 1,
	/// Table 2: team variant B
	TeamB = 2,
	/// Table 3: team variant C
	TeamC = 3,
	/// Table 4: team variant D
	TeamD = 4,
}

impl ColorTableId {
	/// All table IDs in bank order.
	pub const ALL: [ColorTableId; COLOR_TABLE_COUNT] =
		[Self::Outline, Self::TeamA, Self::TeamB, Self::TeamC, Self::TeamD];

	/// Position of this table in the bank.
	#[inline]
	pub fn index(self) -> usize {
		self as usize
	}
}

impl TryFrom<u8> for ColorTableId {
	type Error = u8;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::ALL.get(value as usize).copied().ok_or(value)
	}
}

impl fmt::Display for ColorTableId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ColorTableId::Outline => write!(f, "outline"),
			ColorTableId::TeamA => write!(f, "team-a"),
			ColorTableId::TeamB => write!(f, "team-b"),
			ColorTableId::TeamC => write!(f, "team-c"),
			ColorTableId::TeamD => write!(f, "team-d"),
		}
	}
}

/// A 64-entry byte map from stream indices to VGA indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTable {
	entries: [u8; COLOR_TABLE_SIZE],
}

impl ColorTable {
	/// Wraps raw table entries.
	pub const fn new(entries: [u8; COLOR_TABLE_SIZE]) -> Self {
		Self {
			entries,
		}
	}

	/// A table that maps every index to itself (raw palette indices).
	pub const fn identity() -> Self {
		let mut entries = [0u8; COLOR_TABLE_SIZE];
		let mut i = 0;
		while i < COLOR_TABLE_SIZE {
			entries[i] = i as u8;
			i += 1;
		}
		Self::new(entries)
	}

	/// Raw table entries.
	pub fn entries(&self) -> &[u8; COLOR_TABLE_SIZE] {
		&self.entries
	}

	/// Maps one byte: values below 64 go through the table, others pass through.
	#[inline]
	pub fn remap(&self, value: u8) -> u8 {
		match self.entries.get(value as usize) {
			Some(&mapped) => mapped,
			None => value,
		}
	}

	/// Applies [`ColorTable::remap`] to every byte of `pixels` in place.
	pub fn remap_in_place(&self, pixels: &mut [u8]) {
		for pixel in pixels {
			*pixel = self.remap(*pixel);
		}
	}

	/// Number of entries that map to a non-zero index.
	pub fn non_zero_count(&self) -> usize {
		self.entries.iter().filter(|&&v| v != 0).count()
	}
}

impl Default for ColorTable {
	fn default() -> Self {
		Self::identity()
	}
}

/// The five fixed color tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTableBank {
	tables: [ColorTable; COLOR_TABLE_COUNT],
}

impl ColorTableBank {
	/// The tables embedded in the game executable.
	pub const fn standard() -> Self {
		Self {
			tables: [
				ColorTable::new(BANK[0]),
				ColorTable::new(BANK[1]),
				ColorTable::new(BANK[2]),
				ColorTable::new(BANK[3]),
				ColorTable::new(BANK[4]),
			],
		}
	}

	/// Builds a bank from custom tables, e.g. ones re-extracted from a
	/// different executable build.
	pub fn from_tables(tables: [ColorTable; COLOR_TABLE_COUNT]) -> Self {
		Self {
			tables,
		}
	}

	/// Returns the table for `id`.
	#[inline]
	pub fn get(&self, id: ColorTableId) -> &ColorTable {
		&self.tables[id.index()]
	}

	/// Iterates over `(id, table)` pairs in bank order.
	pub fn iter(&self) -> impl Iterator<Item = (ColorTableId, &ColorTable)> {
		ColorTableId::ALL.into_iter().zip(self.tables.iter())
	}
}

impl Default for ColorTableBank {
	fn default() -> Self {
		Self::standard()
	}
}
