//! OpenType layout common tables
//!
//! The coverage and class definition arrays follow the examples in the
//! [OpenType layout common table formats](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#common-table-examples).

#[rustfmt::skip]
pub static COVERAGE_FORMAT1: &[u8] = &[
    0x00, 0x01, // format
    0x00, 0x05, // glyphCount
    0x00, 0x38, 0x00, 0x3B, 0x00, 0x41, 0x00, 0x42, 0x00, 0x94, // glyphArray
];

#[rustfmt::skip]
pub static COVERAGE_FORMAT2: &[u8] = &[
    0x00, 0x02, // format
    0x00, 0x02, // rangeCount
    0x00, 0x4E, 0x00, 0x57, 0x00, 0x00, // 0x4E..=0x57, start index 0
    0x00, 0x8A, 0x00, 0x8C, 0x00, 0x0A, // 0x8A..=0x8C, start index 10
];

#[rustfmt::skip]
pub static CLASS_DEF_FORMAT1: &[u8] = &[
    0x00, 0x01, // format
    0x00, 0x32, // startGlyphID
    0x00, 0x1A, // glyphCount
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x02,
    0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01,
];

#[rustfmt::skip]
pub static CLASS_DEF_FORMAT2: &[u8] = &[
    0x00, 0x02, // format
    0x00, 0x03, // classRangeCount
    0x00, 0x30, 0x00, 0x31, 0x00, 0x01, // 0x30..=0x31, class 1
    0x00, 0x40, 0x00, 0x43, 0x00, 0x02, // 0x40..=0x43, class 2
    0x00, 0xD2, 0x00, 0xE9, 0x00, 0x01, // 0xD2..=0xE9, class 1
];

/// A version 1.1 `GPOS` table with one script, one `kern` feature, a
/// single pair adjustment lookup (glyph 5 followed by glyph 7 kerns by
/// -50) and a feature variation that disables `kern` for `wght >= 0.5`.
#[rustfmt::skip]
pub static LAYOUT_V1_1: &[u8] = &[
    0x00, 0x01, 0x00, 0x01, // version 1.1
    0x00, 0x0E,             // scriptListOffset = 14
    0x00, 0x28,             // featureListOffset = 40
    0x00, 0x36,             // lookupListOffset = 54
    0x00, 0x00, 0x00, 0x5A, // featureVariationsOffset = 90
    // ScriptList @14
    0x00, 0x02,             // scriptCount
    b'D', b'F', b'L', b'T', 0x00, 0x0E,
    b'l', b'a', b't', b'n', 0x00, 0x0E, // both share one script table
    // Script @28
    0x00, 0x04,             // defaultLangSysOffset
    0x00, 0x00,             // langSysCount
    // LangSys @32
    0x00, 0x00,             // lookupOrderOffset
    0xFF, 0xFF,             // requiredFeatureIndex
    0x00, 0x01,             // featureIndexCount
    0x00, 0x00,             // featureIndices
    // FeatureList @40
    0x00, 0x01,             // featureCount
    b'k', b'e', b'r', b'n', 0x00, 0x08,
    // Feature @48
    0x00, 0x00,             // featureParamsOffset
    0x00, 0x01,             // lookupIndexCount
    0x00, 0x00,             // lookupListIndices
    // LookupList @54
    0x00, 0x01,             // lookupCount
    0x00, 0x04,             // lookupOffsets
    // Lookup @58
    0x00, 0x02,             // lookupType: pair adjustment
    0x00, 0x00,             // lookupFlag
    0x00, 0x01,             // subTableCount
    0x00, 0x08,             // subtableOffsets
    // PairPosFormat1 @66
    0x00, 0x01,             // posFormat
    0x00, 0x0C,             // coverageOffset
    0x00, 0x04,             // valueFormat1: X_ADVANCE
    0x00, 0x00,             // valueFormat2
    0x00, 0x01,             // pairSetCount
    0x00, 0x12,             // pairSetOffsets
    // Coverage @78
    0x00, 0x01, 0x00, 0x01, 0x00, 0x05,
    // PairSet @84
    0x00, 0x01,             // pairValueCount
    0x00, 0x07, 0xFF, 0xCE, // second glyph 7, xAdvance -50
    // FeatureVariations @90
    0x00, 0x01, 0x00, 0x00, // version 1.0
    0x00, 0x00, 0x00, 0x01, // featureVariationRecordCount
    0x00, 0x00, 0x00, 0x10, // conditionSetOffset = 16
    0x00, 0x00, 0x00, 0x1E, // featureTableSubstitutionOffset = 30
    // ConditionSet @106
    0x00, 0x01,             // conditionCount
    0x00, 0x00, 0x00, 0x06, // conditionOffsets
    // ConditionFormat1 @112
    0x00, 0x01,             // format
    0x00, 0x00,             // axisIndex
    0x20, 0x00,             // filterRangeMinValue 0.5
    0x40, 0x00,             // filterRangeMaxValue 1.0
    // FeatureTableSubstitution @120
    0x00, 0x01, 0x00, 0x00, // version 1.0
    0x00, 0x01,             // substitutionCount
    0x00, 0x00,             // featureIndex
    0x00, 0x00, 0x00, 0x0C, // alternateFeatureOffset = 12
    // Feature @132
    0x00, 0x00,             // featureParamsOffset
    0x00, 0x00,             // lookupIndexCount
];
