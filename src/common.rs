/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Image type codes a TGA header can declare.
///
/// Code 0 ("no image data") is rejected before this enum is built,
/// hence it has no variant here.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TgaImageType {
    /// Type 1, uncompressed color-mapped
    ColorMapped,
    /// Type 2, uncompressed true-color
    TrueColor,
    /// Type 3, uncompressed grayscale
    Grayscale,
    /// Type 9, RLE compressed color-mapped
    ColorMappedRle,
    /// Type 10, RLE compressed true-color
    TrueColorRle,
    /// Type 11, RLE compressed grayscale
    GrayscaleRle
}

impl TgaImageType {
    pub fn from_u8(num: u8) -> Option<TgaImageType> {
        match num {
            1 => Some(TgaImageType::ColorMapped),
            2 => Some(TgaImageType::TrueColor),
            3 => Some(TgaImageType::Grayscale),
            9 => Some(TgaImageType::ColorMappedRle),
            10 => Some(TgaImageType::TrueColorRle),
            11 => Some(TgaImageType::GrayscaleRle),
            _ => None
        }
    }

    /// Whether the pixel data is run-length encoded
    pub const fn is_rle(self) -> bool {
        matches!(
            self,
            TgaImageType::ColorMappedRle | TgaImageType::TrueColorRle | TgaImageType::GrayscaleRle
        )
    }

    /// Whether the header must also declare a color map
    pub const fn is_color_mapped(self) -> bool {
        matches!(self, TgaImageType::ColorMapped | TgaImageType::ColorMappedRle)
    }
}
