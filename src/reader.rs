use bytes::Bytes;
use nom::number::Endianness;

use crate::Error;

/// A fixed-length, bounds-checked random-access view over the private
/// metadata block.
///
/// Every multi-byte read re-applies the current byte order, since different
/// sub-sections of the same block are independently stamped (directory
/// headers are always big-endian, the calibration payload is always
/// little-endian, everything else follows the block's declared order).
///
/// The declared length may exceed the backing buffer; the constructor
/// zero-extends in that case, so a truncated container read degrades into
/// zero-filled padding instead of out-of-bounds access.
pub(crate) struct BoundedReader {
    data: Bytes,
    order: Endianness,
}

impl BoundedReader {
    pub(crate) fn new(data: impl Into<Bytes>, order: Endianness) -> Self {
        Self {
            data: data.into(),
            order,
        }
    }

    /// Declared length `len`, zero-padding the tail if the buffer is shorter.
    pub(crate) fn with_len(data: Vec<u8>, order: Endianness, len: usize) -> Self {
        let mut data = data;
        if data.len() < len {
            data.resize(len, 0);
        }
        Self::new(data, order)
    }

    pub(crate) fn set_order(&mut self, order: Endianness) {
        self.order = order;
    }

    /// Runs `f` with `order` in effect, then restores the previous order.
    /// Callers observe no net change to the order register.
    pub(crate) fn scoped<T>(
        &mut self,
        order: Endianness,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = self.order;
        self.order = order;
        let res = f(self);
        self.order = saved;
        res
    }

    pub(crate) fn check(&self, offset: usize, len: usize) -> crate::Result<()> {
        if offset.checked_add(len).is_some_and(|end| end <= self.data.len()) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                offset,
                len,
                size: self.data.len(),
            })
        }
    }

    pub(crate) fn bytes_at(&self, offset: usize, len: usize) -> crate::Result<&[u8]> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len]) // Safe-slice: checked above
    }

    pub(crate) fn u16_at(&self, offset: usize) -> crate::Result<u16> {
        let raw: [u8; 2] = self.bytes_at(offset, 2)?.try_into().expect("len checked");
        Ok(match self.order {
            Endianness::Big => u16::from_be_bytes(raw),
            Endianness::Little => u16::from_le_bytes(raw),
            Endianness::Native => u16::from_ne_bytes(raw),
        })
    }

    pub(crate) fn u32_at(&self, offset: usize) -> crate::Result<u32> {
        let raw: [u8; 4] = self.bytes_at(offset, 4)?.try_into().expect("len checked");
        Ok(match self.order {
            Endianness::Big => u32::from_be_bytes(raw),
            Endianness::Little => u32::from_le_bytes(raw),
            Endianness::Native => u32::from_ne_bytes(raw),
        })
    }
}
