//! Calibration decoding: white-balance coefficient sets, black levels and
//! the CCT curve.
//!
//! Offsets inside the RAFData block are attacker/corruption-controlled, so
//! every access goes through the bounds-checked reader and a failed branch
//! is dropped whole; the surrounding decode keeps whatever the simpler tags
//! already produced.

use nom::number::Endianness;

use crate::generation::RafDataGeneration;
use crate::reader::BoundedReader;
use crate::values::{BlackLevels, CctEntry, Illuminant, Makernote, WbCoeffs};

mod offsets;

/// Per-shot context shared by all calibration handlers.
pub(crate) struct CalibContext {
    pub model: String,
    /// 4-char firmware version, empty when unknown (native dialect).
    pub firmware: String,
    /// Legacy R/B correction factors, fixed per camera family.
    pub correction: Option<(f64, f64)>,
}

impl CalibContext {
    pub(crate) fn new(model: &str, firmware: &str) -> Self {
        Self {
            model: model.to_owned(),
            firmware: firmware.to_owned(),
            correction: wb_correction(model),
        }
    }
}

/// A few early bodies stored coefficients against a different reference
/// illuminant; their R and B channels need a fixed multiplicative fix-up.
fn wb_correction(model: &str) -> Option<(f64, f64)> {
    const SUPER_CCD_ERA: [&str; 5] = ["S2Pro", "S20Pro", "F700", "S5000", "S7000"];
    if SUPER_CCD_ERA.iter().any(|m| model.contains(m)) {
        Some((10.0 / 17.0 / 0.652941, 2.0 / 3.0 / (3.0 / 4.0 + 1.0 / 300.0)))
    } else if model.contains("DBP") || model.contains("DX-2000") {
        Some((0.7632653061, 0.8591549296))
    } else {
        None
    }
}

/// Storage tag -> preset slot. Tag IDs differ per generation dialect but the
/// slot identities are stable. Linear scan; callers pre-filter on the
/// 0x2000..=0x2410 range so irrelevant tags never get here.
static TAG_TO_ILLUMINANT: &[(u16, Illuminant)] = &[
    (0x2000, Illuminant::Auto),
    (0x2100, Illuminant::Daylight),
    (0x2200, Illuminant::Shade),
    (0x2300, Illuminant::FluorescentDaylight),
    (0x2301, Illuminant::FluorescentDayWhite),
    (0x2302, Illuminant::FluorescentWhite),
    (0x2310, Illuminant::FluorescentWarmWhite),
    (0x2311, Illuminant::FluorescentLiving),
    (0x2400, Illuminant::Tungsten),
    (0x2410, Illuminant::Flash),
];

pub(crate) const WB_TAG_RANGE: std::ops::RangeInclusive<u16> = 0x2000..=0x2410;

pub(crate) fn tag_slot(tag: u16) -> Option<Illuminant> {
    TAG_TO_ILLUMINANT
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, slot)| *slot)
}

/// Storage order of the preset table inside the RAFData wb section.
static SECTION_ILLUMINANTS: [Illuminant; 6] = [
    Illuminant::Daylight,
    Illuminant::Shade,
    Illuminant::FluorescentDaylight,
    Illuminant::FluorescentLiving,
    Illuminant::FluorescentWhite,
    Illuminant::Tungsten,
];

/// The calibration temperature ladder the 31-entry CCT table is indexed by.
#[rustfmt::skip]
static CCT_KELVIN: [i32; 31] = [
     2500,  2550,  2650,  2700,  2800,  2850,  2950,  3000,  3100,  3200,
     3300,  3400,  3600,  3700,  3800,  4000,  4200,  4300,  4500,  4800,
     5000,  5300,  5600,  6000,  6300,  6700,  7100,  7700,  8300,  9100,
    10000,
];

/// Marker preceding the auto-WB reading inside newer RAFData blocks.
const AUTO_WB_MARKER: &[u8; 8] = b"TSNERDTS";

/// Guard threshold after the marker; rejects coincidental byte matches.
const AUTO_WB_GUARD: u16 = 125;

/// Preset ids used by the 4096-byte fixed-grid table, with 0x46 marking the
/// auto reading that every record of the grid also carries.
static PRESET_TO_ILLUMINANT: &[(u32, Illuminant)] = &[
    (0x0a, Illuminant::Daylight),
    (0x14, Illuminant::Shade),
    (0x1e, Illuminant::FluorescentDaylight),
    (0x28, Illuminant::FluorescentLiving),
    (0x32, Illuminant::FluorescentWhite),
    (0x3c, Illuminant::Tungsten),
];

const GRID_AUTO_PRESET: u32 = 0x46;

/// One stored GRGB quad at `pos`; `double` records carry a second reading 8
/// bytes further which is averaged in.
fn read_wb_quad(reader: &BoundedReader, pos: usize, double: bool) -> crate::Result<WbCoeffs> {
    let one = WbCoeffs::from_grgb(
        reader.u16_at(pos)?,
        reader.u16_at(pos + 2)?,
        reader.u16_at(pos + 4)?,
        reader.u16_at(pos + 6)?,
    );
    if double {
        let two = WbCoeffs::from_grgb(
            reader.u16_at(pos + 8)?,
            reader.u16_at(pos + 10)?,
            reader.u16_at(pos + 12)?,
            reader.u16_at(pos + 14)?,
        );
        Ok(one.average(two))
    } else {
        Ok(one)
    }
}

/// Preset / as-shot WB record (tags 0x2000..=0x2410, 0x2ff0). A declared
/// length of 16 means two stacked readings.
pub(crate) fn decode_wb_record(
    reader: &BoundedReader,
    payload: usize,
    byte_len: u32,
    ctx: &CalibContext,
) -> crate::Result<WbCoeffs> {
    let quad = read_wb_quad(reader, payload, byte_len == 16)?;
    Ok(quad.corrected(ctx.correction))
}

/// Custom WB array (tag 0x2f00): leading u32 slot count, clamped to 6, then
/// one record per slot. Slots decoded so far are kept if a later one runs
/// out of range.
pub(crate) fn decode_custom_wb(
    reader: &BoundedReader,
    payload: usize,
    byte_len: u32,
    ctx: &CalibContext,
    out: &mut Makernote,
) -> crate::Result<()> {
    let slots = reader.u32_at(payload)?.min(6);
    let double = byte_len as u64 >= 4 + 16 * slots as u64;
    let mut pos = payload + 4;
    for i in 0..slots {
        let quad = read_wb_quad(reader, pos, double)?.corrected(ctx.correction);
        out.white_balance.insert(Illuminant::custom(i), quad);
        pos += if double { 16 } else { 8 };
    }
    Ok(())
}

/// Black level record (tag 0x4000): one GRGB set for 8 bytes, two for 16.
pub(crate) fn decode_black_levels(
    reader: &BoundedReader,
    payload: usize,
    byte_len: u32,
) -> crate::Result<BlackLevels> {
    let read_set = |pos: usize| -> crate::Result<[u16; 4]> {
        let g1 = reader.u16_at(pos)?;
        let r = reader.u16_at(pos + 2)?;
        let b = reader.u16_at(pos + 4)?;
        let g2 = reader.u16_at(pos + 6)?;
        Ok([r, g1, b, g2])
    };
    let first = read_set(payload)?;
    let second = if byte_len == 16 {
        Some(read_set(payload + 8)?)
    } else {
        None
    };
    Ok(BlackLevels { first, second })
}

/// Raw exposure bias (tag 0x9650): signed numerator over a clamped
/// denominator.
pub(crate) fn decode_exposure_shift(
    reader: &BoundedReader,
    payload: usize,
) -> crate::Result<f32> {
    let a = reader.u16_at(payload)? as i16;
    let b = f32::from(reader.u16_at(payload + 2)?).max(1.0);
    Ok(f32::from(a) / b)
}

/// Relative exposure (tag 0x9200), in EV. The common ratios come out exact.
pub(crate) fn decode_brightness(reader: &BoundedReader, payload: usize) -> crate::Result<f32> {
    let s1 = u32::from(reader.u16_at(payload)?);
    let s2 = u32::from(reader.u16_at(payload + 2)?);
    Ok(if s1 == s2 || s1 == 0 {
        0.0
    } else if s1 * 4 == s2 {
        2.0
    } else if s1 * 16 == s2 {
        4.0
    } else {
        (s2 as f32 / s1 as f32).log2()
    })
}

/// Fully decoded structured block, merged into the output only when the
/// risky parts came back complete.
#[derive(Default)]
struct Structured {
    dimensions: Option<(u32, u32)>,
    auto: Option<WbCoeffs>,
    presets: Vec<(Illuminant, WbCoeffs)>,
    cct: Vec<CctEntry>,
}

/// RAFData record (tag 0xc000). The payload is always little-endian no
/// matter what the directory order was; the reader is re-stamped for the
/// duration of this record only.
pub(crate) fn decode_rafdata(
    reader: &mut BoundedReader,
    payload: usize,
    byte_len: u32,
    ctx: &CalibContext,
    out: &mut Makernote,
) {
    if byte_len <= 3 || byte_len >= 10_240_000 {
        return;
    }
    reader.scoped(Endianness::Little, |reader| {
        if byte_len == 4096 {
            out.generation = RafDataGeneration::Fixed4096;
            match decode_fixed_grid(reader, payload) {
                Ok((presets, cct)) => {
                    out.white_balance.extend(presets);
                    out.cct = cct;
                }
                Err(e) => tracing::warn!(%e, "fixed-grid table dropped"),
            }
        } else {
            decode_structured(reader, payload, byte_len as usize, ctx, out);
        }
    });
}

fn decode_structured(
    reader: &BoundedReader,
    payload: usize,
    len: usize,
    ctx: &CalibContext,
    out: &mut Makernote,
) {
    let Ok(header) = reader.bytes_at(payload, 8) else {
        tracing::warn!("RAFData too short for a generation header");
        return;
    };
    let header: [u8; 8] = header.try_into().expect("len checked");
    let gen = RafDataGeneration::classify(&header);
    out.generation = gen;

    let mut s = Structured::default();
    if gen != RafDataGeneration::Unclassified {
        s.dimensions = read_dimensions(reader, payload, gen);
    }
    s.auto = scan_auto_marker(reader, payload, len);

    let version = gen.version().unwrap_or(0);
    if let Some(section) =
        offsets::resolve_section(reader, payload, version, &ctx.model, &ctx.firmware)
    {
        let is34 = is_34_record_layout(version, &ctx.model);
        match decode_wb_section(reader, payload + section, version, is34) {
            Ok((auto, presets, cct)) => {
                if auto.is_some() {
                    s.auto = auto;
                }
                s.presets = presets;
                s.cct = cct;
            }
            // drop the whole section rather than commit half a table
            Err(e) => tracing::warn!(%e, section = format!("{section:#x}"), "wb section dropped"),
        }
    }

    if out.raw_dimensions.is_none() {
        out.raw_dimensions = s.dimensions;
    }
    if let Some(auto) = s.auto {
        out.white_balance.insert(Illuminant::Auto, auto);
    }
    out.white_balance.extend(s.presets);
    out.cct = s.cct;
}

/// Width/height pair at the generation's declared offset.
fn read_dimensions(
    reader: &BoundedReader,
    payload: usize,
    gen: RafDataGeneration,
) -> Option<(u32, u32)> {
    let off = gen.dimension_offset()?;
    let w = reader.u32_at(payload + off).ok()?;
    let h = reader.u32_at(payload + off + 4).ok()?;
    (w != 0 && h != 0).then_some((w, h))
}

/// Content-addressed fallback: scan for the auto-WB marker and take the GRB
/// triple behind it. Used when no section offset is known in advance, and
/// also present in blocks that do have one.
fn scan_auto_marker(reader: &BoundedReader, payload: usize, len: usize) -> Option<WbCoeffs> {
    for off in 0..len.saturating_sub(16) {
        let pos = payload + off;
        let Ok(window) = reader.bytes_at(pos, 8) else {
            break;
        };
        if window != AUTO_WB_MARKER {
            continue;
        }
        let Ok(g) = reader.u16_at(pos + 10) else {
            break;
        };
        if g > AUTO_WB_GUARD {
            let r = reader.u16_at(pos + 12).ok()?;
            let b = reader.u16_at(pos + 14).ok()?;
            tracing::debug!(offset = format!("{off:#x}"), "auto wb marker found");
            return Some(WbCoeffs::from_grb(g, r, b));
        }
    }
    None
}

/// Newer layouts insert 8 extra records between the preset table and the
/// CCT section, and their constant-green run is 34 entries instead of 31.
fn is_34_record_layout(version: u16, model: &str) -> bool {
    const MODELS: [&str; 16] = [
        "X-Pro3", "GFX 100 II", "GFX100 II", "GFX 100S", "GFX100S", "GFX 50S II", "GFX50S II",
        "X100VI", "X100V", "X-H2", "X-H2S", "X-T4", "X-T5", "X-E4", "X-T30 II", "X-S10",
    ];
    matches!(version, 0x0260..=0x0267 | 0x0369) || MODELS.contains(&model)
}

type WbSection = (Option<WbCoeffs>, Vec<(Illuminant, WbCoeffs)>, Vec<CctEntry>);

/// Decodes the preset table at a validated section offset, then locates and
/// decodes the CCT table behind it. All-or-nothing: any out-of-range read
/// fails the whole section.
fn decode_wb_section(
    reader: &BoundedReader,
    section: usize,
    version: u16,
    is34: bool,
) -> crate::Result<WbSection> {
    // blocks with no version keep the auto reading right before the table
    let auto = if version == 0 {
        let pos = section.checked_sub(6).ok_or(crate::Error::UnresolvedCalibration)?;
        Some(WbCoeffs::from_grb(
            reader.u16_at(pos)?,
            reader.u16_at(pos + 2)?,
            reader.u16_at(pos + 4)?,
        ))
    } else {
        None
    };

    let mut presets = Vec::with_capacity(SECTION_ILLUMINANTS.len());
    let mut pos = section;
    for slot in SECTION_ILLUMINANTS {
        let quad = WbCoeffs::from_grb(
            reader.u16_at(pos)?,
            reader.u16_at(pos + 2)?,
            reader.u16_at(pos + 4)?,
        );
        presets.push((slot, quad));
        pos += 6;
    }

    let cct = decode_cct_table(reader, pos, is34)?;
    Ok((auto, presets, cct))
}

/// The CCT table sits a fixed distance past the preset table, preceded by a
/// run of entries sharing one green value. Walk 6-byte strides until the
/// green diverges; the table start is the divergence point minus the
/// run length. No divergence within the window means no CCT table.
fn decode_cct_table(
    reader: &BoundedReader,
    after_presets: usize,
    is34: bool,
) -> crate::Result<Vec<CctEntry>> {
    let mut pos = after_presets;
    if is34 {
        pos += 0x30;
    }
    pos += 0xc0;

    let run_len = if is34 { 34 } else { 31 };
    let green = reader.u16_at(pos)?;
    let mut start = None;
    for probe in (pos..pos + 30).step_by(6) {
        if reader.u16_at(probe)? != green {
            start = probe.checked_sub(run_len * 6);
            break;
        }
    }
    let Some(start) = start else {
        tracing::debug!("no cct section behind the wb table");
        return Ok(Vec::new());
    };

    let mut cct = Vec::with_capacity(CCT_KELVIN.len());
    for (i, kelvin) in CCT_KELVIN.iter().enumerate() {
        let entry = start + i * 6;
        let g = f32::from(reader.u16_at(entry)?);
        let r = f32::from(reader.u16_at(entry + 2)?);
        let b = f32::from(reader.u16_at(entry + 4)?);
        cct.push(CctEntry {
            kelvin: *kelvin as f32,
            rgbg: [r, g, b, g],
        });
    }
    Ok(cct)
}

type GridTables = (Vec<(Illuminant, WbCoeffs)>, Vec<CctEntry>);

/// The 4096-byte blocks use a fixed grid instead: 42 records of six u32
/// values `{preset, kelvin, r<<1, g, g2, b<<1}` at +0x200. Non-zero kelvin
/// feeds the CCT curve (doubled R/B as stored); known presets feed the slot
/// table with the undoubled quad.
fn decode_fixed_grid(reader: &BoundedReader, payload: usize) -> crate::Result<GridTables> {
    let mut presets = Vec::new();
    let mut cct = Vec::new();
    let mut pos = payload + 0x200;
    for _ in 0..42 {
        let preset = reader.u32_at(pos)?;
        let kelvin = reader.u32_at(pos + 4)?;
        let r = reader.u32_at(pos + 8)?;
        let g = reader.u32_at(pos + 12)?;
        let g2 = reader.u32_at(pos + 16)?;
        let b = reader.u32_at(pos + 20)?;
        pos += 24;

        if kelvin != 0 && cct.len() < 64 {
            cct.push(CctEntry {
                kelvin: kelvin as f32,
                rgbg: [(r << 1) as f32, g as f32, (b << 1) as f32, g2 as f32],
            });
        }
        if preset != GRID_AUTO_PRESET {
            if let Some((_, slot)) = PRESET_TO_ILLUMINANT.iter().find(|(p, _)| *p == preset) {
                presets.push((
                    *slot,
                    WbCoeffs([r as i32, g as i32, b as i32, g2 as i32]),
                ));
            }
        }
    }
    Ok((presets, cct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;
    use test_case::case;

    fn ctx(model: &str) -> CalibContext {
        CalibContext::new(model, "")
    }

    #[case(0x2000, Some(Illuminant::Auto); "auto")]
    #[case(0x2311, Some(Illuminant::FluorescentLiving); "fluorescent living")]
    #[case(0x2410, Some(Illuminant::Flash); "flash")]
    #[case(0x2401, None; "hole in the range")]
    fn tag_to_slot(tag: u16, expect: Option<Illuminant>) {
        assert_eq!(tag_slot(tag), expect);
    }

    #[test]
    fn wb_record_single() {
        let reader = le_reader(&grgb_u16(&[[500, 300, 400, 510]]));
        let wb = decode_wb_record(&reader, 0, 8, &ctx("X-T1")).unwrap();
        assert_eq!(wb, WbCoeffs([300, 500, 400, 510]));
    }

    #[test]
    fn wb_record_double_width_averages() {
        let reader = le_reader(&grgb_u16(&[[500, 300, 400, 510], [520, 310, 405, 500]]));
        let wb = decode_wb_record(&reader, 0, 16, &ctx("X-T1")).unwrap();
        // truncating average, channel by channel
        assert_eq!(wb, WbCoeffs([305, 510, 402, 505]));
    }

    #[test]
    fn wb_record_legacy_correction() {
        let reader = le_reader(&grgb_u16(&[[500, 1000, 1000, 500]]));
        let wb = decode_wb_record(&reader, 0, 8, &ctx("FinePix S5000")).unwrap();
        let (r_corr, b_corr) = wb_correction("S5000").unwrap();
        assert_eq!(wb.0[0], (1000.0 * r_corr) as i32);
        assert_eq!(wb.0[2], (1000.0 * b_corr) as i32);
        assert_eq!(wb.0[1], 500);
    }

    #[test]
    fn custom_wb_count_clamped_to_six() {
        let mut data = 100u32.to_le_bytes().to_vec();
        for _ in 0..6 {
            data.extend_from_slice(&grgb_u16(&[[500, 300, 400, 500]]));
        }
        let reader = le_reader(&data);
        let mut out = Makernote::default();
        decode_custom_wb(&reader, 0, 4 + 6 * 8, &ctx("X-T1"), &mut out).unwrap();
        assert_eq!(out.white_balance.len(), 6);
        assert_eq!(
            out.wb(Illuminant::Custom(6)),
            Some(&WbCoeffs([300, 500, 400, 500]))
        );
    }

    #[test]
    fn custom_wb_double_width() {
        let mut data = 1u32.to_le_bytes().to_vec();
        data.extend_from_slice(&grgb_u16(&[[500, 300, 400, 500], [500, 310, 410, 500]]));
        let reader = le_reader(&data);
        let mut out = Makernote::default();
        decode_custom_wb(&reader, 0, 4 + 16, &ctx("X-T1"), &mut out).unwrap();
        assert_eq!(
            out.wb(Illuminant::Custom(1)),
            Some(&WbCoeffs([305, 500, 405, 500]))
        );
    }

    #[case(8, None; "single set")]
    #[case(16, Some([1024, 1024, 1023, 1024]); "two sets")]
    fn black_levels(len: u32, second: Option<[u16; 4]>) {
        let data = grgb_u16(&[[1024, 1022, 1026, 1024], [1024, 1024, 1023, 1024]]);
        let reader = le_reader(&data);
        let black = decode_black_levels(&reader, 0, len).unwrap();
        assert_eq!(black.first, [1022, 1024, 1026, 1024]);
        assert_eq!(black.second, second);
    }

    #[test]
    fn exposure_shift_signed_over_clamped() {
        let mut data = (-256i16).to_le_bytes().to_vec();
        data.extend_from_slice(&512u16.to_le_bytes());
        let reader = le_reader(&data);
        assert_eq!(decode_exposure_shift(&reader, 0).unwrap(), -0.5);

        // zero denominator clamps to 1.0
        let mut data = 256u16.to_le_bytes().to_vec();
        data.extend_from_slice(&0u16.to_le_bytes());
        let reader = le_reader(&data);
        assert_eq!(decode_exposure_shift(&reader, 0).unwrap(), 256.0);
    }

    #[case(100, 100, 0.0; "equal readings")]
    #[case(0, 400, 0.0; "zero base")]
    #[case(100, 400, 2.0; "two stops")]
    #[case(100, 1600, 4.0; "four stops")]
    #[case(100, 800, 3.0; "free ratio")]
    fn brightness(s1: u16, s2: u16, expect: f32) {
        let mut data = s1.to_le_bytes().to_vec();
        data.extend_from_slice(&s2.to_le_bytes());
        let reader = le_reader(&data);
        assert_eq!(decode_brightness(&reader, 0).unwrap(), expect);
    }

    #[test]
    fn marker_scan_respects_guard() {
        let mut data = vec![0u8; 64];
        data[20..28].copy_from_slice(AUTO_WB_MARKER);
        // guard value <= 125: coincidental match, must be skipped
        data[30..32].copy_from_slice(&100u16.to_le_bytes());
        let reader = le_reader(&data);
        assert_eq!(scan_auto_marker(&reader, 0, 64), None);

        data[30..32].copy_from_slice(&500u16.to_le_bytes());
        data[32..34].copy_from_slice(&320u16.to_le_bytes());
        data[34..36].copy_from_slice(&410u16.to_le_bytes());
        let reader = le_reader(&data);
        assert_eq!(
            scan_auto_marker(&reader, 0, 64),
            Some(WbCoeffs([320, 500, 410, 500]))
        );
    }

    #[test]
    fn cct_run_length_arithmetic() {
        // run of 31 entries sharing green 500, entry 31 diverging
        let run = 0x1c0;
        let mut block = SectionBuilder::new(run);
        for _ in 0..31 {
            block.push_grb(500, 300, 400);
        }
        block.push_grb(501, 999, 999);
        let reader = le_reader(&block.finish(0x400));

        // probe starts 4 strides before the divergence point, inside the run
        let probe = run + 27 * 6;
        let cct = decode_cct_table(&reader, probe - 0xc0, false).unwrap();
        assert_eq!(cct.len(), 31);
        // divergence at run + 31*6 puts the table head back at the run start
        assert_eq!(cct[0].kelvin, 2500.0);
        assert_eq!(cct[0].rgbg, [300.0, 500.0, 400.0, 500.0]);
        assert_eq!(cct[30].kelvin, 10000.0);
        assert_eq!(cct[30].rgbg, [300.0, 500.0, 400.0, 500.0]);
    }

    #[test]
    fn cct_without_divergence_is_empty() {
        let mut block = SectionBuilder::new(0x100);
        for _ in 0..40 {
            block.push_grb(500, 300, 400);
        }
        let reader = le_reader(&block.finish(0x400));
        assert_eq!(decode_cct_table(&reader, 0x100 - 0xc0, false).unwrap(), vec![]);
    }

    #[test]
    fn fixed_grid_routes_records() {
        let mut grid = GridBuilder::new();
        for i in 0..42u32 {
            match i {
                5 => grid.push(GRID_AUTO_PRESET, 5000, 320, 500, 500, 410),
                6 => grid.push(0x3c, 2850, 700, 500, 500, 260),
                _ => grid.push(0x99, 0, 0, 0, 0, 0),
            }
        }
        let reader = le_reader(&grid.finish());
        let (presets, cct) = decode_fixed_grid(&reader, 0).unwrap();

        assert_eq!(cct.len(), 2);
        assert_eq!(cct[0].kelvin, 5000.0);
        assert_eq!(cct[0].rgbg, [640.0, 500.0, 820.0, 500.0]);

        // the auto record only feeds the curve; tungsten feeds its slot with
        // the undoubled quad
        assert_eq!(presets, vec![(Illuminant::Tungsten, WbCoeffs([700, 500, 260, 500]))]);
    }

    #[test]
    fn fixed_grid_cct_bounded() {
        let mut grid = GridBuilder::new();
        for _ in 0..42u32 {
            grid.push(0x99, 3000, 1, 1, 1, 1);
        }
        let reader = le_reader(&grid.finish());
        let (_, cct) = decode_fixed_grid(&reader, 0).unwrap();
        assert_eq!(cct.len(), 42);
    }
}
