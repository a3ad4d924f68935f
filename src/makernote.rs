use std::io::Read;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::map;
use nom::number::Endianness;
use nom::IResult;

use crate::calib::{self, CalibContext, WB_TAG_RANGE};
use crate::reader::BoundedReader;
use crate::values::{CameraIdent, Illuminant, Makernote};
use crate::Error;

const TAG_RAW_FULL_SIZE: u16 = 0x0100;
const TAG_COOKED_SIZE: u16 = 0x0121;
const TAG_CUSTOM_WB: u16 = 0x2f00;
const TAG_AS_SHOT_WB: u16 = 0x2ff0;
const TAG_BLACK_LEVEL: u16 = 0x4000;
const TAG_RELATIVE_EXPOSURE: u16 = 0x9200;
const TAG_EXPOSURE_BIAS: u16 = 0x9650;
const TAG_RAFDATA: u16 = 0xc000;

/// Accepted block length range for the Adobe-converted dialect. The lower
/// bound covers the fixed camera-identity header.
const MIN_BLOCK_LEN: usize = 0x36;
const MAX_BLOCK_LEN: usize = 10_240_000;

/// Zero padding behind the declared length, so a truncated container read
/// degrades gracefully instead of killing the whole decode.
const BLOCK_PAD: usize = 1024;

const MAX_EMBEDDED_ENTRIES: u32 = 1000;
const MAX_NOTE_ENTRIES: u32 = 255;

/// Parses the private block as found in Adobe-converted DNG files: a
/// big-endian u32 length, then a self-contained block carrying its own
/// camera identity header and a miniature tag directory.
///
/// `shot_select` picks the second sub-directory for multi-shot files when
/// one is present; it falls back to the primary directory whenever the
/// alternate one does not fit the buffer.
///
/// Malformed input never fails the decode outright; the result simply
/// carries whatever could be extracted.
#[tracing::instrument(skip_all)]
pub fn parse_adobe_makernote<R: Read>(mut reader: R, shot_select: u32) -> crate::Result<Makernote> {
    let mut len_raw = [0u8; 4];
    reader.read_exact(&mut len_raw)?;
    let block_len = u32::from_be_bytes(len_raw) as usize;
    if !(MIN_BLOCK_LEN..MAX_BLOCK_LEN).contains(&block_len) {
        return Err(Error::MalformedDirectory(format!(
            "implausible block length {block_len:#x}"
        )));
    }

    let mut data = vec![0u8; block_len];
    read_available(&mut reader, &mut data);
    decode_embedded(data, shot_select)
}

/// Parses the private block of a native RAF file: a u32 entry count then
/// sequential tag/length/payload records, all offsets big-endian. The model
/// name comes from the host file's EXIF.
#[tracing::instrument(skip_all)]
pub fn parse_makernote<R: Read>(mut reader: R, model: &str) -> crate::Result<Makernote> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode_note(data, model)
}

/// Fills as much of `buf` as the reader can provide. Short reads leave the
/// zeroed tail in place and the decode continues over it.
fn read_available(reader: &mut impl Read, mut buf: &mut [u8]) {
    while !buf.is_empty() {
        match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => buf = &mut buf[n..],
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(%e, missing = buf.len(), "block truncated");
                break;
            }
        }
    }
    if !buf.is_empty() {
        tracing::warn!(missing = buf.len(), "block shorter than declared");
    }
}

fn decode_embedded(data: Vec<u8>, shot_select: u32) -> crate::Result<Makernote> {
    let block_len = data.len();
    let mut reader = BoundedReader::with_len(data, Endianness::Big, block_len + BLOCK_PAD);
    let camera = read_camera_ident(&reader)?;
    let ctx = CalibContext::new(&camera.model, &camera.raf_version);
    let mut note = Makernote {
        camera: Some(camera),
        ..Default::default()
    };
    if let Err(e) = walk_embedded_directory(&mut reader, block_len, shot_select, &ctx, &mut note) {
        tracing::warn!(%e, "private directory yields no records");
    }
    Ok(note)
}

fn decode_note(data: Vec<u8>, model: &str) -> crate::Result<Makernote> {
    let mut reader = BoundedReader::new(data, Endianness::Big);
    let ctx = CalibContext::new(model, "");
    let mut note = Makernote::default();
    if let Err(e) = walk_note(&mut reader, &ctx, &mut note) {
        tracing::warn!(%e, "makernote yields no records");
    }
    Ok(note)
}

/// Camera identity lives at fixed offsets in the embedded block header:
/// serial signature at 6, model at 0x12, firmware version at 0x32.
fn read_camera_ident(reader: &BoundedReader) -> crate::Result<CameraIdent> {
    let serial_signature = fixed_str(reader.bytes_at(6, 0x0c)?);
    let sensor_id = fixed_str(reader.bytes_at(6 + 6, 4)?);
    let model = fixed_str(reader.bytes_at(0x12, 0x20)?);
    let raf_version = fixed_str(reader.bytes_at(0x32, 4)?);

    // Safe unwrap
    let re = regex::Regex::new(r"([0-9]+)$").unwrap();
    let camera_id = re
        .captures(&serial_signature)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    Ok(CameraIdent {
        serial_signature,
        sensor_id,
        camera_id,
        model,
        raf_version,
    })
}

/// NUL-padded fixed-width field to a string, lossily.
fn fixed_str(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

fn parse_order_mark(input: &[u8]) -> IResult<&[u8], Endianness> {
    map(alt((tag("MM"), tag("II"))), |mark: &[u8]| {
        if mark == b"MM" {
            Endianness::Big
        } else {
            Endianness::Little
        }
    })(input)
}

fn walk_embedded_directory(
    reader: &mut BoundedReader,
    block_len: usize,
    shot_select: u32,
    ctx: &CalibContext,
    note: &mut Makernote,
) -> crate::Result<()> {
    let payload_order = match parse_order_mark(reader.bytes_at(0, 2)?) {
        Ok((_, order)) => order,
        Err(_) => {
            return Err(Error::MalformedDirectory(
                "unrecognized byte-order mark".into(),
            ))
        }
    };

    let primary_start = reader.u32_at(2)? as usize + 6;
    let primary_len = reader.u32_at(primary_start)? as usize;
    let ifd_start = select_directory(reader, block_len, primary_start, primary_len, shot_select);

    let entry_count = reader.u32_at(ifd_start + 4)?;
    if entry_count > MAX_EMBEDDED_ENTRIES {
        return Err(Error::MalformedDirectory(format!(
            "entry count {entry_count} over limit"
        )));
    }

    let mut pos = ifd_start + 8;
    for _ in 0..entry_count {
        // record headers are always big-endian, payloads follow the
        // block's declared order
        reader.set_order(Endianness::Big);
        let tag = reader.u16_at(pos)?;
        let byte_len = u32::from(reader.u16_at(pos + 2)?);
        pos += 4;
        reader.set_order(payload_order);
        dispatch_record(reader, tag, pos, byte_len, ctx, note);
        pos += byte_len as usize;
    }
    Ok(())
}

/// Multi-shot files append a second sub-directory behind the primary one.
/// Following it is allowed only while everything stays inside the buffer;
/// otherwise fail open to the primary directory.
fn select_directory(
    reader: &BoundedReader,
    block_len: usize,
    primary_start: usize,
    primary_len: usize,
    shot_select: u32,
) -> usize {
    let mut select = shot_select.min(1);
    let alternate = primary_start + primary_len + 4;
    if reader.u32_at(alternate).map(|v| v == 0).unwrap_or(true) {
        select = 0;
    }
    if select == 1 && block_len > primary_len * 2 {
        match reader.u32_at(alternate) {
            Ok(len) if alternate + len as usize <= block_len => return alternate,
            _ => {
                tracing::warn!("alternate directory out of range; using primary");
            }
        }
    }
    primary_start
}

fn walk_note(
    reader: &mut BoundedReader,
    ctx: &CalibContext,
    note: &mut Makernote,
) -> crate::Result<()> {
    let entry_count = reader.u32_at(0)?;
    if entry_count > MAX_NOTE_ENTRIES {
        return Err(Error::MalformedDirectory(format!(
            "entry count {entry_count} over limit"
        )));
    }

    let mut pos = 4usize;
    for _ in 0..entry_count {
        reader.set_order(Endianness::Big);
        let tag = reader.u16_at(pos)?;
        let byte_len = u32::from(reader.u16_at(pos + 2)?);
        pos += 4;
        dispatch_record(reader, tag, pos, byte_len, ctx, note);
        pos += byte_len as usize;
    }
    Ok(())
}

/// Routes one record. Calibration-bearing tags go to the extractor; a
/// record that runs out of range is dropped alone, the stream continues.
fn dispatch_record(
    reader: &mut BoundedReader,
    tag: u16,
    payload: usize,
    byte_len: u32,
    ctx: &CalibContext,
    note: &mut Makernote,
) {
    let res = match tag {
        t if WB_TAG_RANGE.contains(&t) => match calib::tag_slot(t) {
            Some(slot) => calib::decode_wb_record(reader, payload, byte_len, ctx).map(|wb| {
                note.white_balance.insert(slot, wb);
            }),
            None => Ok(()),
        },
        TAG_AS_SHOT_WB => calib::decode_wb_record(reader, payload, byte_len, ctx).map(|wb| {
            note.white_balance.insert(Illuminant::AsShot, wb);
        }),
        TAG_CUSTOM_WB => calib::decode_custom_wb(reader, payload, byte_len, ctx, note),
        TAG_BLACK_LEVEL if byte_len == 8 || byte_len == 16 => {
            calib::decode_black_levels(reader, payload, byte_len).map(|black| {
                note.black = Some(black);
            })
        }
        TAG_EXPOSURE_BIAS => calib::decode_exposure_shift(reader, payload).map(|shift| {
            note.exposure_shift = Some(shift);
        }),
        TAG_RELATIVE_EXPOSURE => calib::decode_brightness(reader, payload).map(|ev| {
            note.brightness_compensation = Some(ev);
        }),
        TAG_RAW_FULL_SIZE => read_dimension_pair(reader, payload, false).map(|dims| {
            note.raw_dimensions = Some(dims);
        }),
        TAG_COOKED_SIZE if note.raw_dimensions.is_none() => {
            read_dimension_pair(reader, payload, true).map(|dims| {
                note.raw_dimensions = Some(dims);
            })
        }
        TAG_RAFDATA => {
            calib::decode_rafdata(reader, payload, byte_len, ctx, note);
            Ok(())
        }
        // focus mode, drive mode and the other simple scalar copies belong
        // to the plain-field collaborator, not here
        _ => Ok(()),
    };
    if let Err(e) = res {
        tracing::warn!(%e, tag = format!("{tag:#06x}"), "record dropped");
    }
}

/// Height then width. The cooked-size tag carries a historical off-by-three
/// for one sensor width.
fn read_dimension_pair(
    reader: &BoundedReader,
    payload: usize,
    cooked: bool,
) -> crate::Result<(u32, u32)> {
    let height = u32::from(reader.u16_at(payload)?);
    let mut width = u32::from(reader.u16_at(payload + 2)?);
    if cooked && width == 4284 {
        width += 3;
    }
    Ok((width, height))
}
