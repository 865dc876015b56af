/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use zune_tga::{TgaDecoder, TgaDecoderErrors, TgaDecoderOptions};

const TOP_TO_BOTTOM: u8 = 0x20;

/// Build an 18 byte TGA header
fn header(image_type: u8, color_map_type: u8, width: u16, height: u16, depth: u8, descriptor: u8) -> Vec<u8> {
    let mut header = vec![0_u8; 18];
    header[1] = color_map_type;
    header[2] = image_type;
    header[12..14].copy_from_slice(&width.to_le_bytes());
    header[14..16].copy_from_slice(&height.to_le_bytes());
    header[16] = depth;
    header[17] = descriptor;
    header
}

fn decode(data: &[u8]) -> Result<Vec<u32>, TgaDecoderErrors> {
    TgaDecoder::new(data).decode()
}

#[test]
fn rejects_short_buffer() {
    let err = decode(&[0_u8; 10]).unwrap_err();
    assert!(matches!(err, TgaDecoderErrors::InsufficientData(18, 10)));
}

#[test]
fn rejects_invalid_color_map_type() {
    let data = header(2, 7, 1, 1, 24, TOP_TO_BOTTOM);
    let err = decode(&data).unwrap_err();
    assert!(matches!(err, TgaDecoderErrors::InvalidColorMapType(7)));
}

#[test]
fn type_zero_and_unknown_type_are_distinct() {
    let data = header(0, 0, 1, 1, 24, TOP_TO_BOTTOM);
    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::NoImageData
    ));

    let data = header(99, 0, 1, 1, 24, TOP_TO_BOTTOM);
    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::UnsupportedImageType(99)
    ));
}

#[test]
fn rejects_color_map_mismatch_both_directions() {
    // true-color image declaring a color map
    let data = header(2, 1, 1, 1, 24, TOP_TO_BOTTOM);
    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::ColorMapMismatch(_)
    ));

    // color-mapped image without one
    let data = header(1, 0, 1, 1, 24, TOP_TO_BOTTOM);
    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::ColorMapMismatch(_)
    ));
}

#[test]
fn rejects_zero_dimensions() {
    let data = header(2, 0, 0, 1, 24, TOP_TO_BOTTOM);
    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::ZeroDimension("Width")
    ));

    let data = header(2, 0, 1, 0, 24, TOP_TO_BOTTOM);
    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::ZeroDimension("Height")
    ));
}

#[test]
fn rejects_unsupported_pixel_depth() {
    for depth in [0, 8, 15, 31, 64] {
        let data = header(2, 0, 1, 1, depth, TOP_TO_BOTTOM);
        assert!(matches!(
            decode(&data).unwrap_err(),
            TgaDecoderErrors::UnsupportedPixelDepth(d) if d == depth
        ));
    }
}

#[test]
fn rejects_image_id_overrun() {
    let mut data = header(2, 0, 1, 1, 24, TOP_TO_BOTTOM);
    data[0] = 200; // image ID length, but only 3 bytes follow the header
    data.extend_from_slice(&[0, 0, 0]);

    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::ImageIdOverrun(200, 3)
    ));
}

#[test]
fn rejects_color_map_overrun() {
    let mut data = header(1, 1, 1, 1, 24, TOP_TO_BOTTOM);
    // origin 0, length 256, 24-bit entries: 768 bytes that are not there
    data[5..7].copy_from_slice(&256_u16.to_le_bytes());
    data[7] = 24;
    data.extend_from_slice(&[0, 0, 0]);

    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::ColorMapOverrun(768, 3)
    ));
}

#[test]
fn color_map_is_skipped_not_read() {
    // a color-mapped image whose pixel data is still direct 24-bit color,
    // the 6 byte map must only move the cursor
    let mut data = header(1, 1, 1, 1, 24, TOP_TO_BOTTOM);
    data[5..7].copy_from_slice(&2_u16.to_le_bytes()); // 2 entries
    data[7] = 24;
    data.extend_from_slice(&[0xAA; 6]); // map entries, never consulted
    data.extend_from_slice(&[0x01, 0x02, 0x03]); // B,G,R

    let pixels = decode(&data).unwrap();
    assert_eq!(pixels, [0xFF03_0201]);
}

#[test]
fn raw_32_bit_round_trip() {
    let argb: [u32; 4] = [0x0102_0304, 0xFF00_00FF, 0x8040_2010, 0x0000_0000];

    let mut data = header(2, 0, 2, 2, 32, TOP_TO_BOTTOM);
    for px in argb {
        // file order is B,G,R,A
        data.extend_from_slice(&[
            (px & 0xFF) as u8,
            ((px >> 8) & 0xFF) as u8,
            ((px >> 16) & 0xFF) as u8,
            ((px >> 24) & 0xFF) as u8
        ]);
    }

    assert_eq!(decode(&data).unwrap(), argb);
}

#[test]
fn raw_24_bit_forces_opaque_alpha() {
    let mut data = header(3, 0, 1, 1, 24, TOP_TO_BOTTOM);
    data.extend_from_slice(&[0x00, 0x00, 0x00]);

    assert_eq!(decode(&data).unwrap(), [0xFF00_0000]);
}

#[test]
fn rle_run_packet_replicates_pixel() {
    let mut data = header(10, 0, 2, 2, 24, TOP_TO_BOTTOM);
    data.push(0x83); // run of 4
    data.extend_from_slice(&[0x10, 0x20, 0x30]); // B,G,R

    assert_eq!(decode(&data).unwrap(), [0xFF30_2010; 4]);
}

#[test]
fn rle_literal_packet_keeps_pixel_order() {
    let mut data = header(10, 0, 3, 1, 24, TOP_TO_BOTTOM);
    data.push(0x02); // 3 literal pixels
    data.extend_from_slice(&[1, 0, 0, 0, 1, 0, 0, 0, 1]);

    assert_eq!(
        decode(&data).unwrap(),
        [0xFF00_0001, 0xFF00_0100, 0xFF01_0000]
    );
}

#[test]
fn rle_run_is_clamped_to_image_size() {
    // run of 128 into a 2 pixel image
    let mut data = header(10, 0, 2, 1, 24, TOP_TO_BOTTOM);
    data.push(0xFF);
    data.extend_from_slice(&[0x10, 0x20, 0x30]);

    assert_eq!(decode(&data).unwrap(), [0xFF30_2010; 2]);
}

#[test]
fn rle_early_end_leaves_zeroed_pixels() {
    // only 1 of 4 pixels present, tolerated by default
    let mut data = header(10, 0, 2, 2, 24, TOP_TO_BOTTOM);
    data.push(0x80); // run of 1
    data.extend_from_slice(&[0x10, 0x20, 0x30]);

    assert_eq!(decode(&data).unwrap(), [0xFF30_2010, 0, 0, 0]);
}

#[test]
fn rle_early_end_fails_in_strict_mode() {
    let mut data = header(10, 0, 2, 2, 24, TOP_TO_BOTTOM);
    data.push(0x80);
    data.extend_from_slice(&[0x10, 0x20, 0x30]);

    let options = TgaDecoderOptions::default().set_strict_mode(true);
    let err = TgaDecoder::new_with_options(&data, options)
        .decode()
        .unwrap_err();
    assert!(matches!(err, TgaDecoderErrors::GenericStatic(_)));
}

#[test]
fn rle_truncated_mid_pixel_is_an_error() {
    let mut data = header(10, 0, 2, 2, 32, TOP_TO_BOTTOM);
    data.push(0x83); // run of 4
    data.extend_from_slice(&[0x10, 0x20]); // half a 32-bit pixel

    assert!(matches!(
        decode(&data).unwrap_err(),
        TgaDecoderErrors::TruncatedPixelData(4, 2)
    ));
}

#[test]
fn bottom_to_top_rows_are_flipped() {
    // 1x3, descriptor bit 5 clear: file rows are bottom-to-top
    let mut data = header(2, 0, 1, 3, 24, 0);
    data.extend_from_slice(&[1, 0, 0]); // bottom row
    data.extend_from_slice(&[2, 0, 0]);
    data.extend_from_slice(&[3, 0, 0]); // top row

    assert_eq!(
        decode(&data).unwrap(),
        [0xFF00_0003, 0xFF00_0002, 0xFF00_0001]
    );
}

#[test]
fn top_to_bottom_rows_are_kept() {
    let mut data = header(2, 0, 1, 3, 24, TOP_TO_BOTTOM);
    data.extend_from_slice(&[1, 0, 0]);
    data.extend_from_slice(&[2, 0, 0]);
    data.extend_from_slice(&[3, 0, 0]);

    assert_eq!(
        decode(&data).unwrap(),
        [0xFF00_0001, 0xFF00_0002, 0xFF00_0003]
    );
}

#[test]
fn flip_with_odd_height_keeps_middle_row() {
    let mut data = header(2, 0, 2, 3, 24, 0);
    for byte in 1..=6_u8 {
        data.extend_from_slice(&[byte, 0, 0]);
    }

    assert_eq!(
        decode(&data).unwrap(),
        [
            0xFF00_0005, 0xFF00_0006, // last file row first
            0xFF00_0003, 0xFF00_0004,
            0xFF00_0001, 0xFF00_0002
        ]
    );
}

#[test]
fn respects_dimension_limits() {
    let mut data = header(2, 0, 4, 4, 24, TOP_TO_BOTTOM);
    data.extend_from_slice(&[0_u8; 4 * 4 * 3]);

    let options = TgaDecoderOptions::default().set_max_width(2);
    let err = TgaDecoder::new_with_options(&data, options)
        .decode()
        .unwrap_err();
    assert!(matches!(
        err,
        TgaDecoderErrors::TooLargeDimensions("width", 2, 4)
    ));
}

#[test]
fn truncation_sweep_never_panics() {
    // every prefix of a valid file across all depths and both paths must
    // either decode (RLE tolerates inter-packet truncation) or return an
    // error, but never read out of bounds
    for depth in [16_u8, 17, 18, 24, 32] {
        let bytes_per_pixel = usize::from(if depth > 18 { depth / 8 } else { 2 });

        for image_type in [2_u8, 10] {
            let mut data = header(image_type, 0, 3, 3, depth, TOP_TO_BOTTOM);
            if image_type == 10 {
                data.push(0x08); // literal packet of 9 pixels
            }
            for i in 0..9 * bytes_per_pixel {
                data.push(i as u8);
            }

            assert!(decode(&data).is_ok());

            for cut in 0..data.len() {
                // result does not matter, absence of panics does
                let _ = decode(&data[..cut]);
            }
        }
    }
}

#[test]
fn raw_truncation_is_always_an_error() {
    for depth in [16_u8, 17, 18, 24, 32] {
        let bytes_per_pixel = usize::from(if depth > 18 { depth / 8 } else { 2 });
        let mut data = header(2, 0, 2, 2, depth, TOP_TO_BOTTOM);
        for i in 0..4 * bytes_per_pixel {
            data.push(i as u8);
        }

        // drop one byte from the pixel data
        let err = decode(&data[..data.len() - 1]).unwrap_err();
        assert!(matches!(err, TgaDecoderErrors::TruncatedPixelData(_, _)));
    }
}
