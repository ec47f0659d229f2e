use crate::BitDepth;
use core::iter::FusedIterator;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Iterator over the packed values stored in a byte slice.
///
/// Yields one value per pixel slot, in the order they were packed: `0`/`1` for
/// [`BitDepth::One`], `0..=3` for [`BitDepth::Two`]. Padding slots of a short last byte are
/// yielded as `0`; use [`Iterator::take`] or [`unpack_to_vec`] with the original pixel count to
/// drop them.
#[derive(Debug, Clone)]
pub struct Unpacked<'a> {
    bytes: core::slice::Iter<'a, u8>,
    depth: BitDepth,
    current: u8,
    slot: u8,
}

impl<'a> Unpacked<'a> {
    pub fn new(bytes: &'a [u8], depth: BitDepth) -> Self {
        Self {
            bytes: bytes.iter(),
            depth,
            current: 0,
            slot: depth.pixels_per_byte(),
        }
    }

    fn remaining(&self) -> usize {
        let in_current = usize::from(self.depth.pixels_per_byte() - self.slot);
        in_current + self.bytes.len() * usize::from(self.depth.pixels_per_byte())
    }
}

impl Iterator for Unpacked<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.slot == self.depth.pixels_per_byte() {
            self.current = *self.bytes.next()?;
            self.slot = 0;
        }

        let value = (self.current >> self.depth.shift_for(self.slot)) & self.depth.mask();
        self.slot += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Unpacked<'_> {}
impl FusedIterator for Unpacked<'_> {}

/// Unpacks `pixel_count` values from `bytes`, appending them to `w`.
///
/// Returns the number of values appended, which is less than `pixel_count` if `bytes` is too
/// short.
#[cfg(feature = "alloc")]
pub fn unpack_to_vec(bytes: &[u8], depth: BitDepth, pixel_count: usize, w: &mut Vec<u8>) -> usize {
    let before = w.len();
    w.extend(Unpacked::new(bytes, depth).take(pixel_count));
    w.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack;

    #[test]
    fn single_bytes() {
        let values: Vec<u8> = Unpacked::new(&[0x63], BitDepth::One).collect();
        assert_eq!(values, [0, 1, 1, 0, 0, 0, 1, 1]);

        let values: Vec<u8> = Unpacked::new(&[0x1B], BitDepth::Two).collect();
        assert_eq!(values, [0, 1, 2, 3]);
    }

    #[test]
    fn padding_unpacks_to_zero() {
        let packed = pack(&[3, 2, 1, 3, 3], BitDepth::Two);
        let values: Vec<u8> = Unpacked::new(&packed, BitDepth::Two).collect();
        assert_eq!(values, [3, 2, 1, 3, 3, 0, 0, 0]);
    }

    #[test]
    fn exact_size() {
        let mut iter = Unpacked::new(&[0xFF, 0x00], BitDepth::One);
        assert_eq!(iter.len(), 16);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 14);
        assert_eq!(iter.by_ref().count(), 14);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn limited_by_pixel_count() {
        let mut out = vec![9];
        assert_eq!(unpack_to_vec(&[0x80], BitDepth::One, 3, &mut out), 3);
        assert_eq!(out, [9, 1, 0, 0]);

        out.clear();
        assert_eq!(unpack_to_vec(&[0xE4], BitDepth::Two, 100, &mut out), 4);
        assert_eq!(out, [3, 2, 1, 0]);
    }
}
