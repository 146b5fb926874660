//! Prelude module for `fbpro_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use fbpro_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let bank = ColorTableBank::standard();
//! let table = bank.get(ColorTableId::TeamB);
//! assert_eq!(table.remap(0x80), 0x80);
//! ```

// Re-export everything from fbpro_types::prelude
#[doc(inline)]
pub use fbpro_types::prelude::*;

// Re-export the entire fbpro_types module for advanced usage
#[doc(inline)]
pub use fbpro_types;
