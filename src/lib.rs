/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A TGA (Truevision Graphics Adapter) decoder
//!
//! This crate features a TGA decoder that converts a raw TGA byte
//! stream into packed 32-bit ARGB pixels
//!
//! # Features
//! - `no_std` with `alloc` when the `std` feature is disabled
//! - Minimal dependencies
//! - Minimal internal allocation (only the output buffer)
//!
//! # Supported formats
//! - Uncompressed and RLE compressed true-color images (16, 24 and 32 bit)
//! - Grayscale and color-mapped image types, read as direct true-color data
//! - Bottom-to-top and top-to-bottom row order
//!
//! # Unsupported formats
//! - Color-map (palette) lookups, entries are skipped and never read
//! - Extension and footer areas
//!
//! # Security
//!
//! The decoder is continuously fuzz tested in CI to ensure it does not crash on malicious input
//! in case a sample causes it to crash, an issue would be welcome.
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use crate::common::TgaImageType;
pub use crate::decoder::{TgaDecoder, TgaDecoderOptions};
pub use crate::errors::TgaDecoderErrors;

mod bytestream;
mod common;
mod decoder;
mod errors;
