#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `fbpro-rs` decodes the sprite animations of Front Page Sports Football
//! (`ANIM.DAT`) into indexed, team-recolorable bitmaps.
//!
pub use fbpro_internal::*;
