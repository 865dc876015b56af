/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

// TGA has no magic bytes, everything hangs off the fixed 18 byte header:
//
// - 1 byte  image ID length
// - 1 byte  color map type (0 or 1)
// - 1 byte  image type (1/2/3 raw, 9/10/11 RLE, 0 means "no data")
// - 5 bytes color map specification (origin u16, length u16, entry depth u8)
// - 4 bytes x/y origin (ignored)
// - 2x2 bytes width and height
// - 1 byte  pixel depth
// - 1 byte  image descriptor, bit 5 set means rows are already top-to-bottom
//
// After the header comes the image ID field, then the color map entries, then
// the pixel data. We skip the first two and read pixels as direct true-color
// values whatever the declared image type is, color map entries are never
// consulted. That matches the behaviour this decoder is replacing, true
// color-mapped files would need a palette lookup pass instead.
//
// Depths 17 and 18 are not part of the TGA specification, they are carried
// over from the previous implementation of this decoder: both read a
// little-endian u16, 17 as 5-6-5 RGB and 18 as 4-4-4-4 ARGB, with channels
// shifted (not rescaled) up to 8 bits.

use alloc::vec;
use alloc::vec::Vec;
use log::{trace, warn};

use crate::bytestream::ByteReader;
use crate::common::TgaImageType;
use crate::errors::TgaDecoderErrors;

/// Size of the fixed TGA header
const TGA_HEADER_SIZE: usize = 18;

/// Decoder options for restricting what the decoder accepts
#[derive(Copy, Clone, Debug)]
pub struct TgaDecoderOptions {
    max_width:  usize,
    max_height: usize,
    strict:     bool
}

impl TgaDecoderOptions {
    /// Set the maximum width the decoder accepts before
    /// returning an error
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    /// Set the maximum height the decoder accepts before
    /// returning an error
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    /// Treat recoverable oddities as hard errors
    ///
    /// Currently this upgrades an RLE stream that ends before the
    /// pixel buffer is full from a warning to an error
    pub fn set_strict_mode(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
    pub const fn max_width(&self) -> usize {
        self.max_width
    }
    pub const fn max_height(&self) -> usize {
        self.max_height
    }
    pub const fn strict_mode(&self) -> bool {
        self.strict
    }
}

impl Default for TgaDecoderOptions {
    fn default() -> Self {
        // dimensions are u16 in the header so this is already the format limit
        Self {
            max_width:  1 << 16,
            max_height: 1 << 16,
            strict:     false
        }
    }
}

/// A TGA decoder
///
/// Decodes a TGA byte stream into packed 32-bit ARGB pixels
/// (`A << 24 | R << 16 | G << 8 | B`), row-major, top-to-bottom.
///
/// # Usage
/// ```
/// use zune_tga::TgaDecoder;
///
/// // smallest possible image, 1x1, 24 bit, top-to-bottom
/// let mut data = vec![0_u8; 18];
/// data[2] = 2; // uncompressed true-color
/// data[12] = 1; // width
/// data[14] = 1; // height
/// data[16] = 24; // pixel depth
/// data[17] = 0x20; // rows stored top-to-bottom
/// data.extend_from_slice(&[0x10, 0x20, 0x30]); // B,G,R
///
/// let mut decoder = TgaDecoder::new(&data);
/// let pixels = decoder.decode().unwrap();
/// assert_eq!(pixels, [0xFF30_2010]);
/// ```
pub struct TgaDecoder<'a> {
    stream:          ByteReader<'a>,
    options:         TgaDecoderOptions,
    width:           usize,
    height:          usize,
    depth:           u8,
    image_type:      Option<TgaImageType>,
    flip_vertically: bool,
    decoded_headers: bool
}

impl<'a> TgaDecoder<'a> {
    /// Create a new TGA decoder that reads data from `data`
    ///
    /// # Arguments
    /// - `data`: The buffer holding a complete TGA file
    pub fn new(data: &'a [u8]) -> TgaDecoder<'a> {
        TgaDecoder::new_with_options(data, TgaDecoderOptions::default())
    }

    /// Create a new decoder instance with specified options
    ///
    /// E.g can be used to set width and height limits to prevent OOM attacks
    ///
    /// # Arguments
    ///
    /// * `data`: The buffer holding a complete TGA file
    /// * `options`: Specialized options for this decoder
    pub fn new_with_options(data: &'a [u8], options: TgaDecoderOptions) -> TgaDecoder<'a> {
        TgaDecoder {
            stream: ByteReader::new(data),
            options,
            width: 0,
            height: 0,
            depth: 0,
            image_type: None,
            flip_vertically: false,
            decoded_headers: false
        }
    }

    /// Decode the TGA header and store information in the
    /// decode context
    ///
    /// After this returns successfully the stream position is at the start
    /// of the pixel data, the image ID and color map fields have been
    /// validated and skipped.
    ///
    /// # Returns
    /// - `Ok(())`: Indicates everything was okay during header parsing
    /// - `Err`: Error that occurred when decoding headers
    pub fn decode_headers(&mut self) -> Result<(), TgaDecoderErrors> {
        if self.decoded_headers {
            return Ok(());
        }

        if !self.stream.has(TGA_HEADER_SIZE) {
            return Err(TgaDecoderErrors::InsufficientData(
                TGA_HEADER_SIZE,
                self.stream.remaining()
            ));
        }

        // header reads below are confirmed to be in bounds by the check
        // above so use the non failing routines
        let id_length = usize::from(self.stream.get_u8());
        let color_map_type = self.stream.get_u8();
        let image_type_value = self.stream.get_u8();

        if color_map_type > 1 {
            return Err(TgaDecoderErrors::InvalidColorMapType(color_map_type));
        }
        if image_type_value == 0 {
            return Err(TgaDecoderErrors::NoImageData);
        }
        let image_type = TgaImageType::from_u8(image_type_value)
            .ok_or(TgaDecoderErrors::UnsupportedImageType(image_type_value))?;

        if image_type.is_color_mapped() && color_map_type == 0 {
            return Err(TgaDecoderErrors::ColorMapMismatch(
                "Color-mapped image type without a color map"
            ));
        }
        if !image_type.is_color_mapped() && color_map_type == 1 {
            return Err(TgaDecoderErrors::ColorMapMismatch(
                "Non-color-mapped image type declares a color map"
            ));
        }

        let color_map_origin = usize::from(self.stream.get_u16_le());
        let color_map_length = usize::from(self.stream.get_u16_le());
        let color_map_depth = self.stream.get_u8();

        // x and y origin, no decoding meaning
        self.stream.skip(4);

        let width = usize::from(self.stream.get_u16_le());
        let height = usize::from(self.stream.get_u16_le());
        let depth = self.stream.get_u8();
        let descriptor = self.stream.get_u8();

        if width == 0 {
            return Err(TgaDecoderErrors::ZeroDimension("Width"));
        }
        if height == 0 {
            return Err(TgaDecoderErrors::ZeroDimension("Height"));
        }
        if width > self.options.max_width() {
            return Err(TgaDecoderErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(TgaDecoderErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }

        match depth {
            16 | 17 | 18 | 24 | 32 => (),
            _ => return Err(TgaDecoderErrors::UnsupportedPixelDepth(depth))
        }

        trace!("Width: {}", width);
        trace!("Height: {}", height);
        trace!("Image type: {:?}", image_type);
        trace!("Pixel depth: {}", depth);

        if !self.stream.has(id_length) {
            return Err(TgaDecoderErrors::ImageIdOverrun(
                id_length,
                self.stream.remaining()
            ));
        }
        self.stream.skip(id_length);

        if color_map_type == 1 {
            // entries are skipped and never read, pixel data is treated as
            // direct true-color even for color-mapped image types
            let entry_size = usize::from(color_map_depth / 8);
            let map_size = (color_map_origin + color_map_length) * entry_size;

            if !self.stream.has(map_size) {
                return Err(TgaDecoderErrors::ColorMapOverrun(
                    map_size,
                    self.stream.remaining()
                ));
            }
            self.stream.skip(map_size);
        }

        self.width = width;
        self.height = height;
        self.depth = depth;
        self.image_type = Some(image_type);
        // bit 5 set means the file already stores rows top-to-bottom
        self.flip_vertically = (descriptor & (1 << 5)) == 0;
        self.decoded_headers = true;

        Ok(())
    }

    /// Return the number of pixels needed to hold the decoded image
    ///
    /// # Returns
    /// - `Some(usize)`: Minimum length for a `&mut [u32]` buffer that can
    ///   hold the decoded image
    /// - `None`: Indicates the headers weren't decoded or the calculation
    ///   overflowed
    pub fn output_buffer_size(&self) -> Option<usize> {
        if !self.decoded_headers {
            return None;
        }
        self.width.checked_mul(self.height)
    }

    /// Get dimensions of the image
    ///
    /// This is a tuple of width,height
    ///
    /// # Returns
    /// - `Some((width,height))`: The image dimensions
    /// - `None`: Indicates that the image headers weren't decoded
    ///   or an error occurred during decoding the headers
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if !self.decoded_headers {
            return None;
        }
        Some((self.width, self.height))
    }

    /// Get the image type declared in the header, or none if the
    /// headers weren't decoded
    pub const fn image_type(&self) -> Option<TgaImageType> {
        if !self.decoded_headers {
            return None;
        }
        self.image_type
    }

    /// Decode an image returning the decoded ARGB pixels as an
    /// allocated `Vec<u32>` or an error if decoding could not be completed
    ///
    /// Pixels are packed `A << 24 | R << 16 | G << 8 | B`, row-major,
    /// top-to-bottom whatever the file's stored row order was.
    ///
    /// Also see [`decode_into`](Self::decode_into) which decodes into
    /// a pre-allocated buffer
    pub fn decode(&mut self) -> Result<Vec<u32>, TgaDecoderErrors> {
        self.decode_headers()?;
        let mut output = vec![
            0_u32;
            self.output_buffer_size()
                .ok_or(TgaDecoderErrors::GenericStatic("Overflow occurred"))?
        ];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode an encoded image into a buffer or return an error
    /// if something bad occurred
    ///
    /// Also see [`decode`](Self::decode) which allocates and decodes into buffer
    pub fn decode_into(&mut self, pixels: &mut [u32]) -> Result<(), TgaDecoderErrors> {
        self.decode_headers()?;

        let output_size = self
            .output_buffer_size()
            .ok_or(TgaDecoderErrors::GenericStatic("Overflow occurred"))?;

        if pixels.len() < output_size {
            return Err(TgaDecoderErrors::TooSmallBuffer(output_size, pixels.len()));
        }
        let output = &mut pixels[0..output_size];

        let image_type = self
            .image_type
            .ok_or(TgaDecoderErrors::GenericStatic("Headers not decoded"))?;

        if image_type.is_rle() {
            self.decode_rle_into(output)?;
        } else {
            // raw path, exactly width * height sequential pixels
            for pixel in output.iter_mut() {
                *pixel = self.read_pixel()?;
            }
        }

        if self.flip_vertically {
            flip_vertically(output, self.width);
        }

        Ok(())
    }

    /// Expand RLE packets until the output is full or the input runs out
    ///
    /// Run packets replicate one pixel value, literal packets carry each
    /// pixel. Both are clamped to the remaining output capacity. An input
    /// that ends between packets leaves the remaining pixels zeroed, an
    /// input that ends inside a pixel read is a hard error.
    fn decode_rle_into(&mut self, output: &mut [u32]) -> Result<(), TgaDecoderErrors> {
        let pixel_count = output.len();
        let mut index = 0;

        while index < pixel_count && !self.stream.eof() {
            let packet = self.stream.get_u8();
            let count = usize::from(packet & 0x7F) + 1;

            if (packet & 0x80) != 0 {
                // run packet, one pixel value repeated
                let color = self.read_pixel()?;
                let run = count.min(pixel_count - index);

                output[index..index + run].fill(color);
                index += run;
            } else {
                // literal packet, `count` distinct pixels
                for _ in 0..count {
                    if index == pixel_count {
                        break;
                    }
                    output[index] = self.read_pixel()?;
                    index += 1;
                }
            }
        }

        if index < pixel_count {
            if self.options.strict_mode() {
                return Err(TgaDecoderErrors::GenericStatic(
                    "RLE stream ended before filling the image"
                ));
            }
            warn!(
                "RLE stream ended after {} of {} pixels, remainder left zeroed",
                index, pixel_count
            );
        }
        Ok(())
    }

    /// Read one pixel at the stream position, unpacking it to packed ARGB
    /// according to the declared pixel depth
    #[inline]
    fn read_pixel(&mut self) -> Result<u32, TgaDecoderErrors> {
        match self.depth {
            32 => {
                // file order is B,G,R,A
                self.check_pixel_bytes(4)?;
                let b = u32::from(self.stream.get_u8());
                let g = u32::from(self.stream.get_u8());
                let r = u32::from(self.stream.get_u8());
                let a = u32::from(self.stream.get_u8());

                Ok((a << 24) | (r << 16) | (g << 8) | b)
            }
            24 => {
                // file order is B,G,R, alpha forced opaque
                self.check_pixel_bytes(3)?;
                let b = u32::from(self.stream.get_u8());
                let g = u32::from(self.stream.get_u8());
                let r = u32::from(self.stream.get_u8());

                Ok(0xFF00_0000 | (r << 16) | (g << 8) | b)
            }
            16 => {
                // A1R5G5B5, channels rescaled to 8 bits, alpha is the top bit
                self.check_pixel_bytes(2)?;
                let v = u32::from(self.stream.get_u16_le());

                let b = (v & 0x1F) * 255 / 31;
                let g = ((v >> 5) & 0x1F) * 255 / 31;
                let r = ((v >> 10) & 0x1F) * 255 / 31;
                let a = if (v & 0x8000) != 0 { 255 } else { 0 };

                Ok((a << 24) | (r << 16) | (g << 8) | b)
            }
            17 => {
                // nonstandard R5G6B5, channels shifted (not rescaled) to 8 bits
                self.check_pixel_bytes(2)?;
                let v = u32::from(self.stream.get_u16_le());

                let b = (v & 0x1F) << 3;
                let g = ((v >> 5) & 0x3F) << 2;
                let r = ((v >> 11) & 0x1F) << 3;

                Ok(0xFF00_0000 | (r << 16) | (g << 8) | b)
            }
            18 => {
                // nonstandard A4R4G4B4, each nibble shifted to the top of its byte
                self.check_pixel_bytes(2)?;
                let v = u32::from(self.stream.get_u16_le());

                let b = (v & 0xF) << 4;
                let g = ((v >> 4) & 0xF) << 4;
                let r = ((v >> 8) & 0xF) << 4;
                let a = ((v >> 12) & 0xF) << 4;

                Ok((a << 24) | (r << 16) | (g << 8) | b)
            }
            d => unreachable!("Unhandled depth {}, rejected during header decode", d)
        }
    }

    #[inline(always)]
    fn check_pixel_bytes(&self, num: usize) -> Result<(), TgaDecoderErrors> {
        if !self.stream.has(num) {
            return Err(TgaDecoderErrors::TruncatedPixelData(
                num,
                self.stream.remaining()
            ));
        }
        Ok(())
    }
}

/// Swap rows so that the first row in the buffer becomes the top row
///
/// TGA files with descriptor bit 5 clear store rows bottom-to-top
fn flip_vertically(pixels: &mut [u32], width: usize) {
    let rows = pixels.len() / width;
    let (top, bottom) = pixels.split_at_mut((rows / 2) * width);

    for (top_row, bottom_row) in top
        .chunks_exact_mut(width)
        .zip(bottom.rchunks_exact_mut(width))
    {
        top_row.swap_with_slice(bottom_row);
    }
}
