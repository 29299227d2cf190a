//! Serialization and deserialization of wire frames.
//!
//! The `repr` module provides abstractions for serializing and deserializing
//! the boot selection frames to/from byte buffers.

pub mod bootselect;
pub mod ethernet;

pub use self::bootselect::{
    Bootselect,
    Entry,
    DATA_FRAME_LEN,
    ENTRY_FIELD_LEN,
    REQUEST_FRAME_LEN,
};
pub use self::ethernet::{
    eth_types,
    Address as EthernetAddress,
    Frame as EthernetFrame,
};
