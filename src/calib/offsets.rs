//! Location of the white-balance section inside the RAFData block.
//!
//! The section's byte offset is not declared anywhere in the block. It is
//! known per (format version, model, firmware) from observed files, kept
//! here as an ordered rule table; the first matching rule proposes candidate
//! offsets and the structural validator confirms or rejects each one. With
//! no surviving candidate the block contributes no calibration table at all.

use crate::reader::BoundedReader;

/// One row of the lookup table. Empty match lists accept anything, so a rule
/// with only `offsets` filled is a wildcard.
///
/// Several models carry two candidate offsets that differ between firmware
/// revisions; both are listed and tried in order.
struct SectionRule {
    /// 16-bit format version codes this rule applies to. Empty = any,
    /// including blocks that carry no version at all.
    versions: &'static [u16],
    /// Exact model names. Empty = any model.
    models: &'static [&'static str],
    /// 4-char firmware versions, for the oldest bodies whose blocks carry no
    /// format version. Empty = any firmware.
    firmware: &'static [&'static str],
    /// Candidate section offsets, relative to the block payload.
    offsets: &'static [usize],
}

impl SectionRule {
    fn matches(&self, version: u16, model: &str, firmware: &str) -> bool {
        (self.versions.is_empty() || self.versions.contains(&version))
            && (self.models.is_empty() || self.models.contains(&model))
            && (self.firmware.is_empty() || self.firmware.contains(&firmware))
    }
}

macro_rules! rule {
    (v: $versions:expr, m: $models:expr, f: $firmware:expr => $offsets:expr) => {
        SectionRule {
            versions: &$versions,
            models: &$models,
            firmware: &$firmware,
            offsets: &$offsets,
        }
    };
    (v: $versions:expr => $offsets:expr) => {
        rule!(v: $versions, m: [], f: [] => $offsets)
    };
    (v: $versions:expr, m: $models:expr => $offsets:expr) => {
        rule!(v: $versions, m: $models, f: [] => $offsets)
    };
    (m: $models:expr => $offsets:expr) => {
        rule!(v: [], m: $models, f: [] => $offsets)
    };
    (m: $models:expr, f: $firmware:expr => $offsets:expr) => {
        rule!(v: [], m: $models, f: $firmware => $offsets)
    };
}

/// Ordered by priority: exact version codes first, then per-model fallbacks
/// for unknown versions, then the firmware-keyed rules for bodies whose
/// blocks never carried a version.
#[rustfmt::skip]
static SECTION_RULES: &[SectionRule] = &[
    // version-keyed
    rule!(v: [0x4500] => [0x13ac]),                                 // X-E1
    rule!(v: [0x0146, 0x0149, 0x0249] => [0x1410]),                 // X20, X100S
    rule!(v: [0x014d, 0x014e] => [0x1474]),                         // X-M1, X-A1, X-A2
    rule!(v: [0x014f, 0x024f, 0x025d, 0x035d] => [0x1480]),         // X-E2, X-H1
    rule!(v: [0x0150] => [0x1414]),                                 // XQ1, XQ2
    rule!(v: [0x0151, 0x0251, 0x0351, 0x0451, 0x0551] => [0x14b0]), // X-T1 firmwares
    rule!(v: [0x0152, 0x0153] => [0x1444]),                         // X30, X100T
    rule!(v: [0x0154] => [0x1824]),                                 // X-T10
    rule!(v: [0x0155] => [0x17b4]),                                 // X70
    rule!(v: [0x0255, 0x0455] => [0x135c]),                         // X-Pro2
    rule!(v: [0x0258, 0x025b] => [0x13dc]),                         // X-T2, X-T20
    rule!(v: [0x0259] => [0x1370]),                                 // X100F
    rule!(v: [0x025a, 0x045a] => [0x1424]),                         // GFX 50S
    rule!(v: [0x025c] => [0x141c]),                                 // X-E3
    rule!(v: [0x025e] => [0x2014]),                                 // X-T3
    rule!(v: [0x025f], m: ["X-T30"] => [0x20b8, 0x20c8]),
    rule!(v: [0x025f], m: ["GFX 50R"] => [0x1424]),
    rule!(v: [0x025f], m: ["GFX 100"] => [0x20e4]),
    rule!(v: [0x0260], m: ["X-Pro3"] => [0x20e8]),
    rule!(v: [0x0260], m: ["GFX 100S", "GFX100S"] => [0x2108]),
    rule!(v: [0x0261], m: ["X100V"] => [0x2078]),
    rule!(v: [0x0261], m: ["GFX 50S II", "GFX50S II"] => [0x214c]),
    rule!(v: [0x0262] => [0x21c8, 0x21cc]),                         // X-T4
    rule!(v: [0x0263] => [0x0b40]),                                 // X-H2S
    rule!(v: [0x0264], m: ["X-S10"] => [0x21de]),
    rule!(v: [0x0264], m: ["X-H2"] => [0x0b3e]),
    rule!(v: [0x0265, 0x0266], m: ["X-T5", "X-S20"] => [0x0c72]),
    rule!(v: [0x0265, 0x0266] => [0x21cc]),                         // X-E4, X-T30 II
    rule!(v: [0x0267] => [0x0cae]),                                 // GFX 100 II
    rule!(v: [0x0355] => [0x1840]),                                 // X-E2S
    rule!(v: [0x0369] => [0x0c5a]),                                 // X100VI
    // per-model fallbacks for unknown version codes
    rule!(m: ["X-Pro2"] => [0x135c]),
    rule!(m: ["X100F"] => [0x1370]),
    rule!(m: ["X-E1"] => [0x13ac]),
    rule!(m: ["X-T2", "X-T20"] => [0x13dc]),
    rule!(m: ["X20", "X100S"] => [0x1410]),
    rule!(m: ["XQ1", "XQ2"] => [0x1414]),
    rule!(m: ["X-E3"] => [0x141c]),
    rule!(m: ["GFX 50S", "GFX 50R"] => [0x1424]),
    rule!(m: ["GFX 50S II", "GFX50S II"] => [0x214c]),
    rule!(m: ["X30", "X100T"] => [0x1444]),
    rule!(m: ["X-M1", "X-A1", "X-A2"] => [0x1474]),
    rule!(m: ["X-E2", "X-H1"] => [0x1480]),
    rule!(m: ["X-T1"] => [0x14b0]),
    rule!(m: ["X70"] => [0x17b4]),
    rule!(m: ["X-T10"] => [0x1824]),
    rule!(m: ["X-E2S"] => [0x1840]),
    rule!(m: ["X-T3"] => [0x2014]),
    rule!(m: ["X100VI"] => [0x0c5a]),
    rule!(m: ["X100V"] => [0x2078]),
    rule!(m: ["X-T30"] => [0x20b8, 0x20c8]),
    rule!(m: ["GFX 100"] => [0x20e4]),
    rule!(m: ["X-Pro3"] => [0x20e8]),
    rule!(m: ["GFX 100S", "GFX100S"] => [0x2108]),
    rule!(m: ["X-T4"] => [0x21c8, 0x21cc]),
    rule!(m: ["X-E4", "X-T30 II"] => [0x21cc]),
    rule!(m: ["X-S10"] => [0x21de]),
    rule!(m: ["X-H2"] => [0x0b3e]),
    rule!(m: ["X-H2S"] => [0x0b40]),
    rule!(m: ["X-T5", "X-S20"] => [0x0c72]),
    rule!(m: ["GFX 100 II", "GFX100 II"] => [0x0cae]),
    // bodies whose blocks carry no format version: keyed on firmware
    rule!(m: ["FinePix X100"], f: ["0069"] => [0x19e8]),
    rule!(m: ["FinePix X100"], f: ["0100", "0110"] => [0x19f0]),
    rule!(m: ["FinePix X100"] => [0x19e8, 0x19f0]),
    rule!(m: ["X-Pro1"] => [0x13a4]),
    rule!(m: ["XF1"] => [0x138c]),
    rule!(m: ["X-S1"] => [0x1284]),
    rule!(m: ["X10"], f: ["0100", "0102"] => [0x1280]),
    rule!(m: ["X10"], f: ["0103"] => [0x12d4]),
    rule!(m: ["X10"] => [0x1280, 0x12d4]),
];

/// Structural check that `offset` really points at white-balance data:
/// six consecutive u16 values, all non-zero, none equal to the 0xff
/// sentinel, the first and fourth equal (both greens), and the first
/// strictly below the second, third, fifth and sixth. An out-of-range
/// window fails the check, it never propagates.
pub(crate) fn is_wb_section(reader: &BoundedReader, offset: usize) -> bool {
    let mut v = [0u16; 6];
    for (i, slot) in v.iter_mut().enumerate() {
        match reader.u16_at(offset + i * 2) {
            Ok(val) => *slot = val,
            Err(_) => return false,
        }
    }
    v.iter().all(|&x| x != 0 && x != 0xff)
        && v[0] == v[3]
        && v[0] < v[1]
        && v[0] < v[2]
        && v[0] < v[4]
        && v[0] < v[5]
}

/// Two-stage resolution: the first matching rule proposes its candidates,
/// [`is_wb_section`] confirms the first genuine one. `version` 0 means the
/// block carries no format version.
///
/// A matched rule whose candidates all fail validation resolves to nothing;
/// later rules are not consulted.
pub(crate) fn resolve_section(
    reader: &BoundedReader,
    payload: usize,
    version: u16,
    model: &str,
    firmware: &str,
) -> Option<usize> {
    let rule = SECTION_RULES
        .iter()
        .find(|r| r.matches(version, model, firmware))?;
    let found = rule
        .offsets
        .iter()
        .copied()
        .find(|&off| is_wb_section(reader, payload + off));
    match found {
        Some(off) => {
            tracing::debug!(offset = format!("{off:#x}"), model, "wb section located");
            Some(off)
        }
        None => {
            tracing::debug!(
                candidates = ?rule.offsets,
                model,
                version,
                "wb section candidates rejected by validator"
            );
            None
        }
    }
}
