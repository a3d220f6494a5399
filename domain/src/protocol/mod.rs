//! Screening conversation wire protocol.
//!
//! Frames are JSON objects discriminated by a `type` field, with camelCase
//! field names.
//!
//! - [`intent::ClientIntent`]: client → server frames
//! - [`frame::ServerFrame`]: server → client frames
//! - [`codec`]: `encode_intent` / `decode_frame`

pub mod codec;
pub mod frame;
pub mod intent;
