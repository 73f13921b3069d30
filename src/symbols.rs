// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Symbol tables mapping capability-space identifiers to names.
//!
//! Every table is an ordered list filtered at construction time by the API
//! revision the driver reports, replacing the compile-time version fences
//! the capability headers use. Tables are small, so lookup is a linear scan.
//! A missed lookup is not an error; it means "report the raw id only".

use crate::ApiVersion;

pub(crate) const V0_34: ApiVersion = ApiVersion::new(0, 34, 0);
pub(crate) const V0_35: ApiVersion = ApiVersion::new(0, 35, 0);
pub(crate) const V0_35_1: ApiVersion = ApiVersion::new(0, 35, 1);
pub(crate) const V0_36: ApiVersion = ApiVersion::new(0, 36, 0);
pub(crate) const V0_37: ApiVersion = ApiVersion::new(0, 37, 0);
pub(crate) const V0_38: ApiVersion = ApiVersion::new(0, 38, 0);
pub(crate) const V0_38_1: ApiVersion = ApiVersion::new(0, 38, 1);
pub(crate) const V0_39: ApiVersion = ApiVersion::new(0, 39, 0);
pub(crate) const V0_39_2: ApiVersion = ApiVersion::new(0, 39, 2);
pub(crate) const V0_39_4: ApiVersion = ApiVersion::new(0, 39, 4);
pub(crate) const V1_0: ApiVersion = ApiVersion::new(1, 0, 0);
pub(crate) const V1_1: ApiVersion = ApiVersion::new(1, 1, 0);
pub(crate) const V1_2: ApiVersion = ApiVersion::new(1, 2, 0);
pub(crate) const V1_3: ApiVersion = ApiVersion::new(1, 3, 0);
pub(crate) const V1_4: ApiVersion = ApiVersion::new(1, 4, 0);
pub(crate) const V1_5: ApiVersion = ApiVersion::new(1, 5, 0);
pub(crate) const V1_6: ApiVersion = ApiVersion::new(1, 6, 0);
pub(crate) const V1_7: ApiVersion = ApiVersion::new(1, 7, 0);
pub(crate) const V1_8: ApiVersion = ApiVersion::new(1, 8, 0);
pub(crate) const V1_9: ApiVersion = ApiVersion::new(1, 9, 0);
pub(crate) const V1_10: ApiVersion = ApiVersion::new(1, 10, 0);
pub(crate) const V1_11: ApiVersion = ApiVersion::new(1, 11, 0);
pub(crate) const V1_12: ApiVersion = ApiVersion::new(1, 12, 0);

// Profile ids (VAProfile).
pub const PROFILE_NONE: i32 = -1;

// Entry point ids (VAEntrypoint).
pub const ENTRYPOINT_VIDEO_PROC: i32 = 10;

// Video processing filter ids (VAProcFilterType).
pub const FILTER_NONE: i32 = 0;
pub const FILTER_NOISE_REDUCTION: i32 = 1;
pub const FILTER_DEINTERLACING: i32 = 2;
pub const FILTER_SHARPENING: i32 = 3;
pub const FILTER_COLOR_BALANCE: i32 = 4;
pub const FILTER_SKIN_TONE_ENHANCEMENT: i32 = 5;
pub const FILTER_TOTAL_COLOR_CORRECTION: i32 = 6;
pub const FILTER_HVS_NOISE_REDUCTION: i32 = 7;
pub const FILTER_HDR_TONE_MAPPING: i32 = 8;
pub const FILTER_3DLUT: i32 = 9;

/// Deinterlacing algorithm ids, used to pick the strongest available one
/// when building a probe parameter buffer.
pub const DEINTERLACING_NONE: i32 = 0;

/// HDR metadata type ids.
pub const HDR_METADATA_HDR10: i32 = 1;

/// A resolvable identifier with a human description.
#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    pub id: i32,
    pub name: &'static str,
    pub description: &'static str,
}

/// A resolvable identifier without a description.
#[derive(Debug, Clone, Copy)]
pub struct Name {
    pub id: i32,
    pub name: &'static str,
}

/// One named bit (or bit group) of a bitmask capability value.
#[derive(Debug, Clone, Copy)]
pub struct Flag {
    pub mask: u32,
    pub name: &'static str,
}

pub fn lookup(table: &[Name], id: i32) -> Option<&'static str> {
    table.iter().find(|n| n.id == id).map(|n| n.name)
}

/// Render of the two-bit codec feature fields (not supported / supported /
/// required).
pub fn feature_value_name(value: u32) -> &'static str {
    match value {
        0 => "not_supported",
        1 => "supported",
        2 => "required",
        _ => "undefined",
    }
}

const PROFILES: &[(i32, &'static str, &'static str, ApiVersion)] = &[
    (-1, "None", "Video Processing", V0_34),
    (0, "MPEG2Simple", "MPEG-2 Simple Profile", V0_34),
    (1, "MPEG2Main", "MPEG-2 Main Profile", V0_34),
    (2, "MPEG4Simple", "MPEG-4 part 2 Simple Profile", V0_34),
    (3, "MPEG4AdvancedSimple", "MPEG-4 part 2 Advanced Simple Profile", V0_34),
    (4, "MPEG4Main", "MPEG-4 part 2 Main Profile", V0_34),
    (5, "H264Baseline", "H.264 / MPEG-4 part 10 (AVC) Baseline Profile", V0_34),
    (6, "H264Main", "H.264 / MPEG-4 part 10 (AVC) Main Profile", V0_34),
    (7, "H264High", "H.264 / MPEG-4 part 10 (AVC) High Profile", V0_34),
    (8, "VC1Simple", "VC-1 / SMPTE 421M / WMV 9 / WMV3 Simple Profile", V0_34),
    (9, "VC1Main", "VC-1 / SMPTE 421M / WMV 9 / WMV3 Main Profile", V0_34),
    (10, "VC1Advanced", "VC-1 / SMPTE 421M / WMV 9 / WMV3 Advanced Profile", V0_34),
    (11, "H263Baseline", "H.263", V0_34),
    (12, "JPEGBaseline", "JPEG", V0_34),
    (
        13,
        "H264ConstrainedBaseline",
        "H.264 / MPEG-4 part 10 (AVC) Constrained Baseline Profile",
        V0_34,
    ),
    (14, "VP8Version0_3", "VP8 profile versions 0-3", V0_35),
    (15, "H264MultiviewHigh", "H.264 / MPEG-4 part 10 (AVC) Multiview High Profile", V0_36),
    (16, "H264StereoHigh", "H.264 / MPEG-4 part 10 (AVC) Stereo High Profile", V0_36),
    (17, "HEVCMain", "H.265 / MPEG-H part 2 (HEVC) Main Profile", V0_37),
    (18, "HEVCMain10", "H.265 / MPEG-H part 2 (HEVC) Main 10 Profile", V0_37),
    (19, "VP9Profile0", "VP9 profile 0", V0_38),
    (20, "VP9Profile1", "VP9 profile 1", V0_39),
    (21, "VP9Profile2", "VP9 profile 2", V0_39),
    (22, "VP9Profile3", "VP9 profile 3", V0_39),
    (23, "HEVCMain12", "H.265 / MPEG-H part 2 (HEVC) RExt Main 12 Profile", V1_2),
    (24, "HEVCMain422_10", "H.265 / MPEG-H part 2 (HEVC) RExt Main 4:2:2 10 Profile", V1_2),
    (25, "HEVCMain422_12", "H.265 / MPEG-H part 2 (HEVC) RExt Main 4:2:2 12 Profile", V1_2),
    (26, "HEVCMain444", "H.265 / MPEG-H part 2 (HEVC) RExt Main 4:4:4 Profile", V1_2),
    (27, "HEVCMain444_10", "H.265 / MPEG-H part 2 (HEVC) RExt Main 4:4:4 10 Profile", V1_2),
    (28, "HEVCMain444_12", "H.265 / MPEG-H part 2 (HEVC) RExt Main 4:4:4 12 Profile", V1_2),
    (
        29,
        "HEVCSccMain",
        "H.265 / MPEG-H part 2 (HEVC) SCC Screen-Extended Main Profile",
        V1_2,
    ),
    (
        30,
        "HEVCSccMain10",
        "H.265 / MPEG-H part 2 (HEVC) SCC Screen-Extended Main 10 Profile",
        V1_2,
    ),
    (
        31,
        "HEVCSccMain444",
        "H.265 / MPEG-H part 2 (HEVC) SCC Screen-Extended Main 4:4:4 Profile",
        V1_2,
    ),
    (32, "AV1Profile0", "AV1 Main Profile", V1_7),
    (33, "AV1Profile1", "AV1 High Profile", V1_7),
    (
        34,
        "HEVCSccMain444_10",
        "H.265 / MPEG-H part 2 (HEVC) SCC Screen-Extended Main 4:4:4 10 Profile",
        V1_8,
    ),
];

const ENTRYPOINTS: &[(i32, &'static str, &'static str, ApiVersion)] = &[
    (1, "VLD", "Decode Slice", V0_34),
    (2, "IZZ", "(Legacy) ZigZag Scan", V0_34),
    (3, "IDCT", "(Legacy) Inverse DCT", V0_34),
    (4, "MoComp", "(Legacy) Motion Compensation", V0_34),
    (5, "Deblocking", "(Legacy) Deblocking", V0_34),
    (6, "EncSlice", "Encode Slice", V0_34),
    (7, "EncPicture", "Encode Picture", V0_34),
    (8, "EncSliceLP", "Encode Slice (Low Power)", V0_39_2),
    (10, "VideoProc", "Video Processing", V0_34),
    (11, "FEI", "Flexible Encode", V1_0),
    (12, "Stats", "Stats", V1_1),
    (13, "ProtectedTEEComm", "Communicate with Trusted Execution Environment", V1_11),
    (14, "ProtectedContent", "Decrypt Protected Content", V1_11),
];

const RT_FORMATS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "YUV420", V0_34),
    (0x0000_0002, "YUV422", V0_34),
    (0x0000_0004, "YUV444", V0_34),
    (0x0000_0008, "YUV411", V0_34),
    (0x0000_0010, "YUV400", V0_34),
    (0x0000_0100, "YUV420_10", V0_38_1),
    (0x0000_0200, "YUV422_10", V1_2),
    (0x0000_0400, "YUV444_10", V1_2),
    (0x0000_1000, "YUV420_12", V1_2),
    (0x0000_2000, "YUV422_12", V1_2),
    (0x0000_4000, "YUV444_12", V1_2),
    (0x0001_0000, "RGB16", V0_34),
    (0x0002_0000, "RGB32", V0_34),
    (0x0010_0000, "RGBP", V0_34),
    (0x0020_0000, "RGB32_10", V1_1),
];

const RATE_CONTROL_MODES: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "NONE", V0_34),
    (0x0000_0002, "CBR", V0_34),
    (0x0000_0004, "VBR", V0_34),
    (0x0000_0008, "VCM", V0_34),
    (0x0000_0010, "CQP", V0_34),
    (0x0000_0020, "VBR_CONSTRAINED", V0_34),
    (0x0000_0040, "ICQ", V1_1),
    (0x0000_0080, "MB", V0_39_2),
    (0x0000_0100, "CFS", V1_1),
    (0x0000_0200, "PARALLEL", V1_1),
    (0x0000_0400, "QVBR", V1_3),
    (0x0000_0800, "AVBR", V1_3),
    (0x0000_1000, "TCBRC", V1_10),
];

const DECODE_SLICE_MODES: &[(u32, &'static str, ApiVersion)] =
    &[(0x0000_0001, "NORMAL", V0_38), (0x0000_0002, "BASE", V0_38)];

const PACKED_HEADERS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "SEQUENCE", V0_34),
    (0x0000_0002, "PICTURE", V0_34),
    (0x0000_0004, "SLICE", V0_34),
    (0x0000_0008, "MISC", V0_34),
    (0x0000_0010, "RAW_DATA", V0_34),
];

const INTERLACE_MODES: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "FRAME", V0_34),
    (0x0000_0002, "FIELD", V0_34),
    (0x0000_0004, "MBAFF", V0_34),
    (0x0000_0008, "PAFF", V0_34),
];

const SLICE_STRUCTURE_MODES: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0010, "ARBITRARY_ROWS", V0_34),
    (0x0000_0001, "POWER_OF_TWO_ROWS", V0_34),
    (0x0000_0002, "ARBITRARY_MACROBLOCKS", V0_34),
    (0x0000_0004, "EQUAL_ROWS", V1_0),
    (0x0000_0008, "MAX_SLICE_SIZE", V1_0),
    (0x0000_0020, "EQUAL_MULTI_ROWS", V1_8),
];

const QUANTIZATION_FLAGS: &[(u32, &'static str, ApiVersion)] =
    &[(0x0000_0001, "TRELLIS_SUPPORTED", V1_1)];

const INTRA_REFRESH_FLAGS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "ROLLING_COLUMN", V1_1),
    (0x0000_0002, "ROLLING_ROW", V1_1),
    (0x0000_0010, "ADAPTIVE", V1_1),
    (0x0000_0020, "CYCLIC", V1_1),
    (0x0001_0000, "P_FRAME", V1_1),
    (0x0002_0000, "B_FRAME", V1_1),
    (0x0004_0000, "MULTI_REF", V1_1),
];

const PROCESSING_RATES: &[(u32, &'static str, ApiVersion)] =
    &[(0x0000_0001, "ENCODE", V1_1), (0x0000_0002, "DECODE", V1_1)];

const FEI_FUNCTION_TYPES: &[(u32, &'static str, ApiVersion)] =
    &[(0x0000_0001, "ENC", V1_0), (0x0000_0002, "PAK", V1_0), (0x0000_0004, "ENC_PAK", V1_0)];

const PREDICTION_DIRECTIONS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "PREVIOUS", V1_6),
    (0x0000_0002, "FUTURE", V1_6),
    (0x0000_0004, "BI_NOT_EMPTY", V1_8),
];

const MEMORY_TYPES: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "VA", V0_34),
    (0x0000_0002, "V4L2", V0_34),
    (0x0000_0004, "USER_PTR", V0_34),
    (0x1000_0000, "KERNEL_DRM", V0_34),
    (0x2000_0000, "DRM_PRIME", V0_34),
    (0x4000_0000, "DRM_PRIME_2", V1_1),
];

const USAGE_HINTS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "DECODER", V0_36),
    (0x0000_0002, "ENCODER", V0_36),
    (0x0000_0004, "VPP_READ", V0_36),
    (0x0000_0008, "VPP_WRITE", V0_36),
    (0x0000_0010, "DISPLAY", V0_36),
];

const SUBPICTURE_FLAGS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "CHROMA_KEYING", V0_34),
    (0x0000_0002, "GLOBAL_ALPHA", V0_34),
    (0x0000_0004, "DESTINATION_IS_SCREEN_COORD", V0_34),
];

const PIPELINE_FLAGS: &[(u32, &'static str, ApiVersion)] =
    &[(0x0000_0001, "SUBPICTURES", V0_34), (0x0000_0002, "FAST", V0_34)];

// These reproduce the capability headers' flag groups verbatim, including
// the multi-bit scaling/interpolation selectors tested as plain masks.
const FILTER_FLAGS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "PROC_FILTER_MANDATORY", V0_34),
    (0x0000_0000, "FRAME_PICTURE", V0_34),
    (0x0000_0001, "TOP_FIELD", V0_34),
    (0x0000_0002, "BOTTOM_FIELD", V0_34),
    (0x0000_0010, "SRC_BT601", V0_34),
    (0x0000_0020, "SRC_BT709", V0_34),
    (0x0000_0040, "SRC_SMPTE_240", V0_34),
    (0x0000_0000, "FILTER_SCALING_DEFAULT", V0_34),
    (0x0000_0100, "FILTER_SCALING_FAST", V0_34),
    (0x0000_0200, "FILTER_SCALING_HQ", V0_34),
    (0x0000_0300, "FILTER_SCALING_NL_ANAMORPHIC", V0_34),
    (0x0000_1000, "FILTER_INTERPOLATION_NEAREST_NEIGHBOR", V1_9),
    (0x0000_2000, "FILTER_INTERPOLATION_BILINEAR", V1_9),
    (0x0000_3000, "FILTER_INTERPOLATION_ADVANCED", V1_9),
];

const TONE_MAPPING_FLAGS: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "HDR_TO_HDR", V1_4),
    (0x0000_0002, "HDR_TO_SDR", V1_4),
    (0x0000_0004, "HDR_TO_EDR", V1_4),
    (0x0000_0008, "SDR_TO_HDR", V1_4),
];

const LUT_CHANNEL_TYPES: &[(u32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "RGB_RGB", V1_12),
    (0x0000_0002, "YUV_RGB", V1_12),
    (0x0000_0004, "VUY_RGB", V1_12),
];

const FILTERS: &[(i32, &'static str, ApiVersion)] = &[
    (0, "None", V0_34),
    (1, "NoiseReduction", V0_34),
    (2, "Deinterlacing", V0_34),
    (3, "Sharpening", V0_34),
    (4, "ColorBalance", V0_34),
    (5, "SkinToneEnhancement", V0_35_1),
    (6, "TotalColorCorrection", V1_1),
    (7, "HVSNoiseReduction", V1_3),
    (8, "HighDynamicRangeToneMapping", V1_4),
    (9, "3DLUT", V1_12),
];

const DEINTERLACER_TYPES: &[(i32, &'static str, ApiVersion)] = &[
    (0, "None", V0_34),
    (1, "Bob", V0_34),
    (2, "Weave", V0_34),
    (3, "MotionAdaptive", V0_34),
    (4, "MotionCompensated", V0_34),
];

const COLOUR_BALANCE_TYPES: &[(i32, &'static str, ApiVersion)] = &[
    (0, "None", V0_34),
    (1, "Hue", V0_34),
    (2, "Saturation", V0_34),
    (3, "Brightness", V0_34),
    (4, "Contrast", V0_34),
    (5, "AutoSaturation", V0_34),
    (6, "AutoBrightness", V0_34),
    (7, "AutoContrast", V0_34),
];

const TOTAL_COLOUR_CORRECTION_TYPES: &[(i32, &'static str, ApiVersion)] = &[
    (0, "None", V1_1),
    (1, "Red", V1_1),
    (2, "Green", V1_1),
    (3, "Blue", V1_1),
    (4, "Cyan", V1_1),
    (5, "Magenta", V1_1),
    (6, "Yellow", V1_1),
];

const COLOUR_STANDARD_TYPES: &[(i32, &'static str, ApiVersion)] = &[
    (0, "None", V0_34),
    (1, "BT601", V0_34),
    (2, "BT709", V0_34),
    (3, "BT470M", V0_34),
    (4, "BT470BG", V0_34),
    (5, "SMPTE170M", V0_34),
    (6, "SMPTE240M", V0_34),
    (7, "GenericFilm", V0_34),
    (8, "SRGB", V1_1),
    (9, "STRGB", V1_1),
    (10, "XVYCC601", V1_1),
    (11, "XVYCC709", V1_1),
    (12, "BT2020", V1_1),
];

const ROTATION_TYPES: &[(i32, &'static str, ApiVersion)] =
    &[(0, "NONE", V0_34), (1, "90", V0_34), (2, "180", V0_34), (3, "270", V0_34)];

const BLEND_TYPES: &[(i32, &'static str, ApiVersion)] = &[
    (0x0000_0001, "GLOBAL_ALPHA", V1_1),
    (0x0000_0002, "PREMULTIPLIED_ALPHA", V1_1),
    (0x0000_0010, "LUMA_KEY", V1_1),
];

const MIRROR_TYPES: &[(i32, &'static str, ApiVersion)] = &[
    (0x0000_0000, "NONE", V1_1),
    (0x0000_0001, "HORIZONTAL", V1_1),
    (0x0000_0002, "VERTICAL", V1_1),
];

const HDR_METADATA_TYPES: &[(i32, &'static str, ApiVersion)] =
    &[(0, "None", V1_4), (1, "HDR10", V1_4)];

/// All symbol tables for one run, already filtered for the active revision.
pub struct SymbolTables {
    pub version: ApiVersion,
    pub profiles: Vec<Symbol>,
    pub entrypoints: Vec<Symbol>,
    pub filters: Vec<Name>,
    pub deinterlacers: Vec<Name>,
    pub colour_balance_types: Vec<Name>,
    pub total_colour_correction_types: Vec<Name>,
    pub colour_standards: Vec<Name>,
    pub rotations: Vec<Name>,
    pub blends: Vec<Name>,
    pub mirrors: Vec<Name>,
    pub hdr_metadata_types: Vec<Name>,
    pub rt_formats: Vec<Flag>,
    pub rate_control_modes: Vec<Flag>,
    pub decode_slice_modes: Vec<Flag>,
    pub packed_headers: Vec<Flag>,
    pub interlace_modes: Vec<Flag>,
    pub slice_structure_modes: Vec<Flag>,
    pub quantization_flags: Vec<Flag>,
    pub intra_refresh_flags: Vec<Flag>,
    pub processing_rates: Vec<Flag>,
    pub fei_function_types: Vec<Flag>,
    pub prediction_directions: Vec<Flag>,
    pub memory_types: Vec<Flag>,
    pub usage_hints: Vec<Flag>,
    pub subpicture_flags: Vec<Flag>,
    pub pipeline_flags: Vec<Flag>,
    pub filter_flags: Vec<Flag>,
    pub tone_mapping_flags: Vec<Flag>,
    pub lut_channel_types: Vec<Flag>,
}

fn symbols(rows: &[(i32, &'static str, &'static str, ApiVersion)], v: ApiVersion) -> Vec<Symbol> {
    rows.iter()
        .filter(|r| r.3 <= v)
        .map(|r| Symbol { id: r.0, name: r.1, description: r.2 })
        .collect()
}

fn names(rows: &[(i32, &'static str, ApiVersion)], v: ApiVersion) -> Vec<Name> {
    rows.iter().filter(|r| r.2 <= v).map(|r| Name { id: r.0, name: r.1 }).collect()
}

fn flags(rows: &[(u32, &'static str, ApiVersion)], v: ApiVersion) -> Vec<Flag> {
    rows.iter().filter(|r| r.2 <= v).map(|r| Flag { mask: r.0, name: r.1 }).collect()
}

impl SymbolTables {
    pub fn new(version: ApiVersion) -> SymbolTables {
        SymbolTables {
            version,
            profiles: symbols(PROFILES, version),
            entrypoints: symbols(ENTRYPOINTS, version),
            filters: names(FILTERS, version),
            deinterlacers: names(DEINTERLACER_TYPES, version),
            colour_balance_types: names(COLOUR_BALANCE_TYPES, version),
            total_colour_correction_types: names(TOTAL_COLOUR_CORRECTION_TYPES, version),
            colour_standards: names(COLOUR_STANDARD_TYPES, version),
            rotations: names(ROTATION_TYPES, version),
            blends: names(BLEND_TYPES, version),
            mirrors: names(MIRROR_TYPES, version),
            hdr_metadata_types: names(HDR_METADATA_TYPES, version),
            rt_formats: flags(RT_FORMATS, version),
            rate_control_modes: flags(RATE_CONTROL_MODES, version),
            decode_slice_modes: flags(DECODE_SLICE_MODES, version),
            packed_headers: flags(PACKED_HEADERS, version),
            interlace_modes: flags(INTERLACE_MODES, version),
            slice_structure_modes: flags(SLICE_STRUCTURE_MODES, version),
            quantization_flags: flags(QUANTIZATION_FLAGS, version),
            intra_refresh_flags: flags(INTRA_REFRESH_FLAGS, version),
            processing_rates: flags(PROCESSING_RATES, version),
            fei_function_types: flags(FEI_FUNCTION_TYPES, version),
            prediction_directions: flags(PREDICTION_DIRECTIONS, version),
            memory_types: flags(MEMORY_TYPES, version),
            usage_hints: flags(USAGE_HINTS, version),
            subpicture_flags: flags(SUBPICTURE_FLAGS, version),
            pipeline_flags: flags(PIPELINE_FLAGS, version),
            filter_flags: flags(FILTER_FLAGS, version),
            tone_mapping_flags: flags(TONE_MAPPING_FLAGS, version),
            lut_channel_types: flags(LUT_CHANNEL_TYPES, version),
        }
    }

    pub fn profile(&self, id: i32) -> Option<&Symbol> {
        self.profiles.iter().find(|s| s.id == id)
    }

    pub fn entrypoint(&self, id: i32) -> Option<&Symbol> {
        self.entrypoints.iter().find(|s| s.id == id)
    }

    /// Name of the lowest render-target format bit set in `rt_format`, if
    /// any bit of it resolves.
    pub fn rt_format_name(&self, rt_format: u32) -> Option<&'static str> {
        self.rt_formats.iter().find(|f| f.mask & rt_format != 0).map(|f| f.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_gating_hides_newer_entries() {
        let old = SymbolTables::new(ApiVersion::new(1, 0, 0));
        // AV1 profiles arrived in 1.7.
        assert!(old.profile(32).is_none());
        assert!(old.entrypoint(12).is_none(), "Stats entry point is 1.1+");
        assert_eq!(old.rate_control_modes.iter().filter(|f| f.name == "TCBRC").count(), 0);

        let new = SymbolTables::new(ApiVersion::new(1, 13, 0));
        assert_eq!(new.profile(32).unwrap().name, "AV1Profile0");
        assert_eq!(new.entrypoint(12).unwrap().name, "Stats");
        assert!(new.rate_control_modes.iter().any(|f| f.name == "TCBRC"));
    }

    #[test]
    fn lookup_miss_is_none() {
        let tables = SymbolTables::new(crate::TARGET_API_VERSION);
        assert!(tables.profile(1234).is_none());
        assert!(lookup(&tables.filters, 77).is_none());
        assert_eq!(lookup(&tables.filters, 2), Some("Deinterlacing"));
    }

    #[test]
    fn rt_format_name_picks_low_bit() {
        let tables = SymbolTables::new(crate::TARGET_API_VERSION);
        assert_eq!(tables.rt_format_name(0x1), Some("YUV420"));
        assert_eq!(tables.rt_format_name(0x4 | 0x2), Some("YUV422"));
        assert_eq!(tables.rt_format_name(0x8000_0000), None);
    }

    #[test]
    fn feature_values() {
        assert_eq!(feature_value_name(0), "not_supported");
        assert_eq!(feature_value_name(2), "required");
        assert_eq!(feature_value_name(3), "undefined");
    }

    #[test]
    fn tables_preserve_declared_order() {
        let tables = SymbolTables::new(crate::TARGET_API_VERSION);
        // ARBITRARY_ROWS is declared first despite having a higher bit than
        // POWER_OF_TWO_ROWS; decode order must follow the declaration.
        assert_eq!(tables.slice_structure_modes[0].name, "ARBITRARY_ROWS");
        assert_eq!(tables.slice_structure_modes[1].name, "POWER_OF_TWO_ROWS");
    }
}
