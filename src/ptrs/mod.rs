//! Compact pointer encodings that pack metadata into the unused high bits
//! of a 64-bit address (data pointer, [`data_ptr`]) or the unused low
//! alignment bits (tagged pointer, [`tagged_ptr`]).

pub mod data_ptr;
pub mod tagged_ptr;
