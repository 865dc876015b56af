/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// A bounds-checked cursor over a borrowed byte slice.
///
/// The position only ever moves forward and every read is checked
/// against the buffer end, reads past the end return zero bytes.
/// Callers that need a failing read guard with [`has`](Self::has)
/// before using the non-failing getters.
pub(crate) struct ByteReader<'a> {
    buffer:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> ByteReader<'a> {
        ByteReader {
            buffer,
            position: 0
        }
    }

    /// Return true if the stream can supply `num` more bytes
    #[inline(always)]
    pub fn has(&self, num: usize) -> bool {
        self.remaining() >= num
    }

    /// Number of bytes left between the position and the buffer end
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    #[inline(always)]
    pub fn eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Advance the position by `num` bytes, saturating at the buffer end
    #[inline(always)]
    pub fn skip(&mut self, num: usize) {
        self.position = self.position.saturating_add(num).min(self.buffer.len());
    }

    /// Read one byte, returning zero on end of stream
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8 {
        let byte = self.buffer.get(self.position).copied().unwrap_or(0);
        self.position += usize::from(self.position < self.buffer.len());
        byte
    }

    /// Read a little-endian u16, zero extending on end of stream
    #[inline(always)]
    pub fn get_u16_le(&mut self) -> u16 {
        let lo = u16::from(self.get_u8());
        let hi = u16::from(self.get_u8());
        lo | (hi << 8)
    }
}
