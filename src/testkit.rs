//! Synthetic private-block builders for tests. Real RAF samples are large
//! and carry no redistribution rights, so every test constructs the exact
//! byte patterns it needs.

use bytes::{BufMut, BytesMut};
use nom::number::Endianness;

use crate::reader::BoundedReader;

pub fn le_reader(data: &[u8]) -> BoundedReader {
    BoundedReader::new(data.to_vec(), Endianness::Little)
}

/// Encodes u16 quads verbatim (callers pass stored GRGB order), little
/// endian.
pub fn grgb_u16(quads: &[[u16; 4]]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    for quad in quads {
        for v in quad {
            buf.put_u16_le(*v);
        }
    }
    buf.to_vec()
}

/// A buffer with 6-byte GRB triples appended from a given offset.
pub struct SectionBuilder {
    data: BytesMut,
}

impl SectionBuilder {
    pub fn new(start: usize) -> Self {
        let mut data = BytesMut::new();
        data.resize(start, 0);
        Self { data }
    }

    pub fn push_grb(&mut self, g: u16, r: u16, b: u16) {
        self.data.put_u16_le(g);
        self.data.put_u16_le(r);
        self.data.put_u16_le(b);
    }

    pub fn finish(mut self, total: usize) -> Vec<u8> {
        self.data.resize(total, 0);
        self.data.to_vec()
    }
}

/// The 4096-byte fixed-grid table: 42 records of six u32 values at +0x200.
pub struct GridBuilder {
    data: BytesMut,
}

impl GridBuilder {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let mut data = BytesMut::new();
        data.resize(0x200, 0);
        Self { data }
    }

    pub fn push(&mut self, preset: u32, kelvin: u32, r: u32, g: u32, g2: u32, b: u32) {
        for v in [preset, kelvin, r, g, g2, b] {
            self.data.put_u32_le(v);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.data.resize(4096, 0);
        self.data.to_vec()
    }
}

/// Native-dialect makernote: u32 entry count, then big-endian
/// tag/length/payload records.
pub struct NoteBuilder {
    records: Vec<(u16, Vec<u8>)>,
}

impl NoteBuilder {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn record_u16s(&mut self, tag: u16, values: &[u16]) {
        let mut payload = BytesMut::new();
        for v in values {
            payload.put_u16(*v);
        }
        self.records.push((tag, payload.to_vec()));
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_u32(self.records.len() as u32);
        for (tag, payload) in &self.records {
            buf.put_u16(*tag);
            buf.put_u16(payload.len() as u16);
            buf.put_slice(payload);
        }
        buf.to_vec()
    }
}

/// Adobe-dialect private block: camera-identity header, byte-order mark and
/// a miniature directory, prefixed with the big-endian u32 block length.
pub struct EmbeddedBlockBuilder {
    mark: [u8; 2],
    model: String,
    version: String,
    signature: String,
    primary: Vec<(u16, Vec<u8>)>,
    alternate: Vec<(u16, Vec<u8>)>,
}

impl EmbeddedBlockBuilder {
    pub fn new(model: &str, version: &str, signature: &str) -> Self {
        Self {
            mark: *b"MM",
            model: model.to_owned(),
            version: version.to_owned(),
            signature: signature.to_owned(),
            primary: Vec::new(),
            alternate: Vec::new(),
        }
    }

    /// Sets the byte-order mark; payloads added afterwards follow it.
    pub fn order_mark(&mut self, mark: [u8; 2]) {
        self.mark = mark;
    }

    fn payload_order(&self) -> Endianness {
        if &self.mark == b"II" {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    pub fn record_u16s(&mut self, tag: u16, values: &[u16]) {
        let order = self.payload_order();
        let mut payload = BytesMut::new();
        for v in values {
            match order {
                Endianness::Little => payload.put_u16_le(*v),
                _ => payload.put_u16(*v),
            }
        }
        self.primary.push((tag, payload.to_vec()));
    }

    pub fn record_raw(&mut self, tag: u16, payload: &[u8]) {
        self.primary.push((tag, payload.to_vec()));
    }

    pub fn alternate_record_u16s(&mut self, tag: u16, values: &[u16]) {
        let order = self.payload_order();
        let mut payload = BytesMut::new();
        for v in values {
            match order {
                Endianness::Little => payload.put_u16_le(*v),
                _ => payload.put_u16(*v),
            }
        }
        self.alternate.push((tag, payload.to_vec()));
    }

    fn directory(records: &[(u16, Vec<u8>)]) -> Vec<u8> {
        let mut body = BytesMut::new();
        for (tag, payload) in records {
            body.put_u16(*tag);
            body.put_u16(payload.len() as u16);
            body.put_slice(payload);
        }
        let mut dir = BytesMut::new();
        // declared directory length is sized so that an alternate directory
        // lands exactly at start + len + 4
        dir.put_u32(body.len() as u32 + 4);
        dir.put_u32(records.len() as u32);
        dir.put_slice(&body);
        dir.to_vec()
    }

    pub fn finish(&self) -> Vec<u8> {
        const DIR_START: usize = 0x36;

        let mut block = BytesMut::new();
        block.put_slice(&self.mark);
        block.put_u32(DIR_START as u32 - 6);

        let mut signature = self.signature.clone().into_bytes();
        signature.resize(0x0c, 0);
        block.put_slice(&signature);

        let mut model = self.model.clone().into_bytes();
        model.resize(0x20, 0);
        block.put_slice(&model);

        let mut version = self.version.clone().into_bytes();
        version.resize(4, 0);
        block.put_slice(&version);
        debug_assert_eq!(block.len(), DIR_START);

        block.put_slice(&Self::directory(&self.primary));
        if !self.alternate.is_empty() {
            block.put_slice(&Self::directory(&self.alternate));
        }

        let mut out = BytesMut::new();
        out.put_u32(block.len() as u32);
        out.put_slice(&block);
        out.to_vec()
    }
}

/// RAFData payload (tag 0xc000) for the structured layouts.
pub struct RafDataBuilder {
    data: Vec<u8>,
}

impl RafDataBuilder {
    /// Gen-3 header: bytes 0..1 zero, version in bytes 2..3, no WRTS marker.
    pub fn gen3(version: u16, len: usize) -> Self {
        let mut data = vec![0u8; len];
        data[2..4].copy_from_slice(&version.to_be_bytes());
        Self { data }
    }

    /// Preset table (6-byte GRB strides) at the section offset. The first
    /// two triples double as the structural-validator window.
    pub fn wb_section(mut self, section: usize, presets: &[(u16, u16, u16)]) -> Self {
        let mut pos = section;
        for (g, r, b) in presets {
            self.put_grb(pos, *g, *r, *b);
            pos += 6;
        }
        self
    }

    /// A 31-entry constant-green run placed so its divergence point falls
    /// inside the probe window behind the preset table.
    pub fn cct_run(mut self, section: usize, green: u16) -> Self {
        let probe = section + 36 + 0xc0;
        let divergence = probe + 24;
        let run = divergence - 31 * 6;
        for i in 0..31u16 {
            self.put_grb(run + usize::from(i) * 6, green, 300 + i, 400 + i);
        }
        self.put_grb(divergence, green + 1, 999, 999);
        self
    }

    pub fn auto_marker(mut self, offset: usize, g: u16, r: u16, b: u16) -> Self {
        self.data[offset..offset + 8].copy_from_slice(b"TSNERDTS");
        self.data[offset + 10..offset + 12].copy_from_slice(&g.to_le_bytes());
        self.data[offset + 12..offset + 14].copy_from_slice(&r.to_le_bytes());
        self.data[offset + 14..offset + 16].copy_from_slice(&b.to_le_bytes());
        self
    }

    fn put_grb(&mut self, pos: usize, g: u16, r: u16, b: u16) {
        self.data[pos..pos + 2].copy_from_slice(&g.to_le_bytes());
        self.data[pos + 2..pos + 4].copy_from_slice(&r.to_le_bytes());
        self.data[pos + 4..pos + 6].copy_from_slice(&b.to_le_bytes());
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}
