/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// TGA errors that can occur during decoding
#[non_exhaustive]
pub enum TgaDecoderErrors {
    /// The buffer is smaller than the fixed 18 byte TGA header
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually present
    InsufficientData(usize, usize),
    /// The color map type field is neither 0 nor 1
    InvalidColorMapType(u8),
    /// The image type field is 0, the file declares no image data
    NoImageData,
    /// The image type field is not one of the six supported codes
    UnsupportedImageType(u8),
    /// The color map declaration and the image type disagree
    ColorMapMismatch(&'static str),
    /// Width or height is zero
    ZeroDimension(&'static str),
    /// The declared image ID field extends past the end of the buffer
    ///
    /// Arguments are the declared length and the bytes left in the stream
    ImageIdOverrun(usize, usize),
    /// The declared color map extends past the end of the buffer
    ///
    /// Arguments are the computed map size and the bytes left in the stream
    ColorMapOverrun(usize, usize),
    /// The pixel depth field is not one of 16, 17, 18, 24 or 32
    UnsupportedPixelDepth(u8),
    /// A pixel read would cross the end of the buffer
    ///
    /// Arguments are the bytes one pixel needs and the bytes left
    TruncatedPixelData(usize, usize),
    /// Too large dimensions for a given width or
    /// height
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer is too small, expected at least
    /// a size but got another size
    TooSmallBuffer(usize, usize),
    /// Generic message
    GenericStatic(&'static str)
}

impl Debug for TgaDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data, header needs {expected} bytes but buffer has {found}"
                )
            }
            Self::InvalidColorMapType(value) => {
                writeln!(f, "Invalid color map type {value}, expected either 0 or 1")
            }
            Self::NoImageData => {
                writeln!(f, "Image type is 0, file contains no image data")
            }
            Self::UnsupportedImageType(value) => {
                writeln!(
                    f,
                    "Unsupported image type {value}, expected one of 1, 2, 3, 9, 10 or 11"
                )
            }
            Self::ColorMapMismatch(message) => {
                writeln!(f, "{message}")
            }
            Self::ZeroDimension(dimension) => {
                writeln!(f, "{dimension} is zero, invalid image")
            }
            Self::ImageIdOverrun(declared, left) => {
                writeln!(
                    f,
                    "Image ID length {declared} exceeds the {left} bytes left in the buffer"
                )
            }
            Self::ColorMapOverrun(declared, left) => {
                writeln!(
                    f,
                    "Color map of {declared} bytes exceeds the {left} bytes left in the buffer"
                )
            }
            Self::UnsupportedPixelDepth(depth) => {
                writeln!(f, "Unsupported pixel depth {depth}")
            }
            Self::TruncatedPixelData(expected, found) => {
                writeln!(
                    f,
                    "Truncated pixel data, needed {expected} more bytes but only {found} are left"
                )
            }
            Self::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            Self::TooSmallBuffer(expected, found) => {
                writeln!(
                    f,
                    "Too small of buffer, expected {expected} but found {found}"
                )
            }
            Self::GenericStatic(message) => {
                writeln!(f, "{message}")
            }
        }
    }
}

impl Display for TgaDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl From<&'static str> for TgaDecoderErrors {
    fn from(value: &'static str) -> Self {
        Self::GenericStatic(value)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TgaDecoderErrors {}
