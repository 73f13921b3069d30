// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Decoders for configuration and surface attributes.
//!
//! Each configuration attribute kind the API defines gets a decoder that
//! expands the raw 32-bit payload into named report members. Decoders are
//! registered per kind with the revision that introduced it, so a dump on an
//! older runtime renders later additions through the generic fallback
//! instead of misinterpreting the payload.

use std::io::Write;

use crate::device::{SurfaceAttribute, SurfaceValue};
use crate::report::Report;
use crate::symbols::{self, Flag, SymbolTables};
use crate::{ApiVersion, Fourcc};

// VAConfigAttribType values.
pub const ATTRIB_RT_FORMAT: u32 = 0;
pub const ATTRIB_RATE_CONTROL: u32 = 5;
pub const ATTRIB_DEC_SLICE_MODE: u32 = 6;
pub const ATTRIB_DEC_JPEG: u32 = 7;
pub const ATTRIB_DEC_PROCESSING: u32 = 8;
pub const ATTRIB_ENC_PACKED_HEADERS: u32 = 10;
pub const ATTRIB_ENC_INTERLACED: u32 = 11;
pub const ATTRIB_ENC_MAX_REF_FRAMES: u32 = 13;
pub const ATTRIB_ENC_MAX_SLICES: u32 = 14;
pub const ATTRIB_ENC_SLICE_STRUCTURE: u32 = 15;
pub const ATTRIB_ENC_MACROBLOCK_INFO: u32 = 16;
pub const ATTRIB_MAX_PICTURE_WIDTH: u32 = 18;
pub const ATTRIB_MAX_PICTURE_HEIGHT: u32 = 19;
pub const ATTRIB_ENC_JPEG: u32 = 20;
pub const ATTRIB_ENC_QUALITY_RANGE: u32 = 21;
pub const ATTRIB_ENC_QUANTIZATION: u32 = 22;
pub const ATTRIB_ENC_INTRA_REFRESH: u32 = 23;
pub const ATTRIB_ENC_SKIP_FRAME: u32 = 24;
pub const ATTRIB_ENC_ROI: u32 = 25;
pub const ATTRIB_ENC_RATE_CONTROL_EXT: u32 = 26;
pub const ATTRIB_PROCESSING_RATE: u32 = 27;
pub const ATTRIB_ENC_DIRTY_RECT: u32 = 28;
pub const ATTRIB_ENC_PARALLEL_RATE_CONTROL: u32 = 29;
pub const ATTRIB_ENC_DYNAMIC_SCALING: u32 = 30;
pub const ATTRIB_FRAME_SIZE_TOLERANCE: u32 = 31;
pub const ATTRIB_FEI_FUNCTION_TYPE: u32 = 32;
pub const ATTRIB_FEI_MV_PREDICTORS: u32 = 33;
pub const ATTRIB_STATS: u32 = 34;
pub const ATTRIB_ENC_TILE_SUPPORT: u32 = 35;
pub const ATTRIB_CUSTOM_ROUNDING_CONTROL: u32 = 36;
pub const ATTRIB_QP_BLOCK_SIZE: u32 = 37;
pub const ATTRIB_MAX_FRAME_SIZE: u32 = 38;
pub const ATTRIB_PREDICTION_DIRECTION: u32 = 39;
pub const ATTRIB_MULTIPLE_FRAME: u32 = 40;
pub const ATTRIB_CONTEXT_PRIORITY: u32 = 41;
pub const ATTRIB_DEC_AV1_FEATURES: u32 = 42;
pub const ATTRIB_TEE_TYPE: u32 = 43;
pub const ATTRIB_TEE_TYPE_CLIENT: u32 = 44;
pub const ATTRIB_PROTECTED_CONTENT_CIPHER_ALGORITHM: u32 = 45;
pub const ATTRIB_PROTECTED_CONTENT_CIPHER_BLOCK_SIZE: u32 = 46;
pub const ATTRIB_PROTECTED_CONTENT_CIPHER_MODE: u32 = 47;
pub const ATTRIB_PROTECTED_CONTENT_CIPHER_SAMPLE_TYPE: u32 = 48;
pub const ATTRIB_PROTECTED_CONTENT_USAGE: u32 = 49;
pub const ATTRIB_ENC_HEVC_FEATURES: u32 = 50;
pub const ATTRIB_ENC_HEVC_BLOCK_SIZES: u32 = 51;
/// One past the last attribute kind the API defines; the probe request
/// asks for every kind below this.
pub const ATTRIB_TYPE_MAX: u32 = 52;

// VASurfaceAttribType values.
pub const SURFACE_ATTRIB_PIXEL_FORMAT: u32 = 1;
pub const SURFACE_ATTRIB_MIN_WIDTH: u32 = 2;
pub const SURFACE_ATTRIB_MAX_WIDTH: u32 = 3;
pub const SURFACE_ATTRIB_MIN_HEIGHT: u32 = 4;
pub const SURFACE_ATTRIB_MAX_HEIGHT: u32 = 5;
pub const SURFACE_ATTRIB_MEMORY_TYPE: u32 = 6;
pub const SURFACE_ATTRIB_EXTERNAL_BUFFER_DESCRIPTOR: u32 = 7;
pub const SURFACE_ATTRIB_USAGE_HINT: u32 = 8;
pub const SURFACE_ATTRIB_DRM_FORMAT_MODIFIERS: u32 = 9;

/// Emits an array of the flag names whose mask bits are set in `value`, in
/// the order the table declares them.
pub fn write_flags<W: Write>(report: &mut Report<W>, tag: &str, value: u32, table: &[Flag]) {
    report.begin_array(Some(tag));
    for flag in table {
        if flag.mask != 0 && value & flag.mask == flag.mask {
            report.write_string(None, flag.name);
        }
    }
    report.end_array();
}

fn bits(value: u32, lo: u32, width: u32) -> u32 {
    (value >> lo) & ((1 << width) - 1)
}

type DecodeFn<W> = fn(u32, &mut Report<W>, &SymbolTables);

struct Entry<W: Write> {
    kind: u32,
    decode: DecodeFn<W>,
}

/// Configuration attribute decoders for one runtime revision.
pub struct AttributeDecoders<W: Write> {
    entries: Vec<Entry<W>>,
}

impl<W: Write> AttributeDecoders<W> {
    pub fn new(version: ApiVersion) -> AttributeDecoders<W> {
        use crate::symbols::{
            V0_34, V0_36, V0_37, V0_38, V0_39_2, V0_39_4, V1_0, V1_1, V1_11, V1_12, V1_5, V1_6,
            V1_9,
        };
        let rows: &[(u32, ApiVersion, DecodeFn<W>)] = &[
            (ATTRIB_RT_FORMAT, V0_34, decode_rt_format),
            (ATTRIB_RATE_CONTROL, V0_34, decode_rate_control),
            (ATTRIB_DEC_SLICE_MODE, V0_38, decode_dec_slice_mode),
            (ATTRIB_DEC_JPEG, V1_1, decode_dec_jpeg),
            (ATTRIB_DEC_PROCESSING, V1_1, decode_dec_processing),
            (ATTRIB_ENC_PACKED_HEADERS, V0_34, decode_packed_headers),
            (ATTRIB_ENC_INTERLACED, V0_34, decode_interlaced),
            (ATTRIB_ENC_MAX_REF_FRAMES, V0_34, decode_max_ref_frames),
            (ATTRIB_ENC_MAX_SLICES, V0_34, decode_max_slices),
            (ATTRIB_ENC_SLICE_STRUCTURE, V0_34, decode_slice_structure),
            (ATTRIB_ENC_MACROBLOCK_INFO, V0_34, decode_macroblock_info),
            (ATTRIB_MAX_PICTURE_WIDTH, V1_1, decode_max_picture_width),
            (ATTRIB_MAX_PICTURE_HEIGHT, V1_1, decode_max_picture_height),
            (ATTRIB_ENC_JPEG, V0_37, decode_enc_jpeg),
            (ATTRIB_ENC_QUALITY_RANGE, V0_36, decode_quality_range),
            (ATTRIB_ENC_QUANTIZATION, V1_1, decode_quantization),
            (ATTRIB_ENC_INTRA_REFRESH, V1_1, decode_intra_refresh),
            (ATTRIB_ENC_SKIP_FRAME, V0_38, decode_skip_frame),
            (ATTRIB_ENC_ROI, V0_39_2, decode_roi),
            (ATTRIB_ENC_RATE_CONTROL_EXT, V0_39_4, decode_rate_control_ext),
            (ATTRIB_PROCESSING_RATE, V1_1, decode_processing_rate),
            (ATTRIB_ENC_DIRTY_RECT, V1_1, decode_dirty_rect),
            (ATTRIB_ENC_PARALLEL_RATE_CONTROL, V1_1, decode_parallel_rate_control),
            (ATTRIB_ENC_DYNAMIC_SCALING, V1_1, decode_dynamic_scaling),
            (ATTRIB_FRAME_SIZE_TOLERANCE, V1_1, decode_frame_size_tolerance),
            (ATTRIB_FEI_FUNCTION_TYPE, V1_0, decode_fei_function_type),
            (ATTRIB_FEI_MV_PREDICTORS, V1_0, decode_fei_mv_predictors),
            (ATTRIB_STATS, V1_1, decode_stats),
            (ATTRIB_ENC_TILE_SUPPORT, V1_1, decode_tile_support),
            (ATTRIB_CUSTOM_ROUNDING_CONTROL, V1_1, decode_custom_rounding_control),
            (ATTRIB_QP_BLOCK_SIZE, V1_1, decode_qp_block_size),
            (ATTRIB_MAX_FRAME_SIZE, V1_5, decode_max_frame_size),
            (ATTRIB_PREDICTION_DIRECTION, V1_6, decode_prediction_direction),
            (ATTRIB_MULTIPLE_FRAME, V1_6, decode_multiple_frame),
            (ATTRIB_CONTEXT_PRIORITY, V1_9, decode_context_priority),
            (ATTRIB_DEC_AV1_FEATURES, V1_11, decode_dec_av1_features),
            (ATTRIB_TEE_TYPE, V1_11, decode_tee_type),
            (ATTRIB_TEE_TYPE_CLIENT, V1_11, decode_tee_type_client),
            (
                ATTRIB_PROTECTED_CONTENT_CIPHER_ALGORITHM,
                V1_11,
                decode_protected_content_cipher_algorithm,
            ),
            (
                ATTRIB_PROTECTED_CONTENT_CIPHER_BLOCK_SIZE,
                V1_11,
                decode_protected_content_cipher_block_size,
            ),
            (ATTRIB_PROTECTED_CONTENT_CIPHER_MODE, V1_11, decode_protected_content_cipher_mode),
            (
                ATTRIB_PROTECTED_CONTENT_CIPHER_SAMPLE_TYPE,
                V1_11,
                decode_protected_content_cipher_sample_type,
            ),
            (ATTRIB_PROTECTED_CONTENT_USAGE, V1_11, decode_protected_content_usage),
            (ATTRIB_ENC_HEVC_FEATURES, V1_12, decode_enc_hevc_features),
            (ATTRIB_ENC_HEVC_BLOCK_SIZES, V1_12, decode_enc_hevc_block_sizes),
        ];
        let entries = rows
            .iter()
            .filter(|(_, since, _)| *since <= version)
            .map(|&(kind, _, decode)| Entry { kind, decode })
            .collect();
        AttributeDecoders { entries }
    }

    /// Writes the decoded form of one attribute as members of the current
    /// object. Kinds without a registered decoder get the raw fallback.
    pub fn decode(&self, kind: u32, value: u32, report: &mut Report<W>, tables: &SymbolTables) {
        match self.entries.iter().find(|e| e.kind == kind) {
            Some(entry) => (entry.decode)(value, report, tables),
            None => {
                report.begin_object(Some("unknown"));
                report.write_integer(Some("type"), i64::from(kind));
                report.write_integer(Some("value"), i64::from(value));
                report.end_object();
            }
        }
    }
}

fn decode_rt_format<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "rt_formats", value, &tables.rt_formats);
}

fn decode_rate_control<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "rate_control_modes", value, &tables.rate_control_modes);
}

fn decode_dec_slice_mode<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "decode_slice_modes", value, &tables.decode_slice_modes);
}

fn decode_dec_jpeg<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    report.begin_object(Some("decode_jpeg"));
    report.begin_array(Some("rotation"));
    let rotation = bits(value, 0, 4);
    for rot in &tables.rotations {
        if rotation & (1 << rot.id) != 0 {
            report.write_string(None, rot.name);
        }
    }
    report.end_array();
    report.end_object();
}

fn decode_dec_processing<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_boolean(Some("decode_processing"), value == 1);
}

fn decode_packed_headers<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "packed_headers", value, &tables.packed_headers);
}

fn decode_interlaced<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "interlace_modes", value, &tables.interlace_modes);
}

fn decode_max_ref_frames<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("max_ref_frames"));
    report.write_integer(Some("list0"), i64::from(value & 0xffff));
    if value >> 16 != 0 {
        report.write_integer(Some("list1"), i64::from(value >> 16));
    }
    report.end_object();
}

fn decode_max_slices<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("max_slices"), i64::from(value));
}

fn decode_slice_structure<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "slice_structure_modes", value, &tables.slice_structure_modes);
}

fn decode_macroblock_info<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("macroblock_info"), i64::from(value));
}

fn decode_max_picture_width<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("max_picture_width"), i64::from(value));
}

fn decode_max_picture_height<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("max_picture_height"), i64::from(value));
}

const ENC_JPEG_FIELDS: &[(&str, u32, u32)] = &[
    ("arithmatic_coding_mode", 0, 1),
    ("progressive_dct_mode", 1, 1),
    ("non_interleaved_mode", 2, 1),
    ("differential_mode", 3, 1),
    ("max_num_components", 4, 3),
    ("max_num_scans", 7, 4),
    ("max_num_huffman_tables", 11, 3),
    ("max_num_quantization_tables", 14, 3),
];

fn decode_enc_jpeg<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("encode_jpeg"));
    for &(name, lo, width) in ENC_JPEG_FIELDS {
        report.write_integer(Some(name), i64::from(bits(value, lo, width)));
    }
    report.end_object();
}

fn decode_quality_range<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("quality_range"), i64::from(value));
}

fn decode_quantization<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "quantization", value, &tables.quantization_flags);
}

fn decode_intra_refresh<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "intra_refresh", value, &tables.intra_refresh_flags);
}

fn decode_skip_frame<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("skip_frame"), i64::from(value));
}

fn decode_roi<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    report.begin_object(Some("roi"));
    report.write_integer(Some("num_regions"), i64::from(bits(value, 0, 8)));
    report.write_boolean(Some("rc_priority_support"), bits(value, 8, 1) != 0);
    if tables.version >= symbols::V1_0 {
        report.write_boolean(Some("rc_qp_delta_support"), bits(value, 9, 1) != 0);
    }
    report.end_object();
}

fn decode_rate_control_ext<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("rate_control_ext"));
    report.write_integer(Some("max_num_temporal_layers_minus1"), i64::from(bits(value, 0, 8)));
    report.write_boolean(Some("temporal_layer_bitrate_control_flag"), bits(value, 8, 1) != 0);
    report.end_object();
}

fn decode_processing_rate<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "processing_rate", value, &tables.processing_rates);
}

fn decode_dirty_rect<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_boolean(Some("encode_dirty_rectangle"), value != 0);
}

fn decode_parallel_rate_control<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_integer(Some("encode_parallel_rate_control_layers"), i64::from(value));
}

fn decode_dynamic_scaling<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_boolean(Some("encode_dynamic_scaling"), value != 0);
}

fn decode_frame_size_tolerance<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_boolean(Some("encode_frame_size_tolerance"), value != 0);
}

fn decode_fei_function_type<W: Write>(value: u32, report: &mut Report<W>, tables: &SymbolTables) {
    write_flags(report, "fei_function_type", value, &tables.fei_function_types);
}

fn decode_fei_mv_predictors<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("fei_mv_predictors"), i64::from(value));
}

fn decode_stats<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("stats"));
    report.write_integer(Some("max_num_past_references"), i64::from(bits(value, 0, 4)));
    report.write_integer(Some("max_num_future_references"), i64::from(bits(value, 4, 4)));
    report.write_integer(Some("num_outputs"), i64::from(bits(value, 8, 3)));
    report.write_boolean(Some("interlaced"), bits(value, 11, 1) != 0);
    report.end_object();
}

fn decode_tile_support<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_boolean(Some("encode_tile_support"), value != 0);
}

fn decode_custom_rounding_control<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_boolean(Some("custom_rounding_control"), value != 0);
}

fn decode_qp_block_size<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("qp_block_size"), i64::from(value));
}

fn decode_max_frame_size<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("max_frame_size"));
    report.write_boolean(Some("max_frame_size"), bits(value, 0, 1) != 0);
    report.write_boolean(Some("multiple_pass"), bits(value, 1, 1) != 0);
    report.end_object();
}

fn decode_prediction_direction<W: Write>(
    value: u32,
    report: &mut Report<W>,
    tables: &SymbolTables,
) {
    write_flags(report, "prediction_direction", value, &tables.prediction_directions);
}

fn decode_multiple_frame<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("multiple_frame"));
    report.write_integer(Some("max_num_concurrent_frames"), i64::from(bits(value, 0, 8)));
    report.write_boolean(Some("mixed_quality_level"), bits(value, 8, 1) != 0);
    report.end_object();
}

fn decode_context_priority<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("context_priority"));
    report.write_integer(Some("priority"), i64::from(bits(value, 0, 16)));
    report.end_object();
}

fn decode_dec_av1_features<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("dec_av1_features"));
    report.write_boolean(Some("lst_support"), bits(value, 0, 2) != 0);
    report.end_object();
}

fn decode_tee_type<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("tee_type"), i64::from(value));
}

fn decode_tee_type_client<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.write_integer(Some("tee_type_client"), i64::from(value));
}

fn decode_protected_content_cipher_algorithm<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_integer(Some("protected_content_cipher_algorithm"), i64::from(value));
}

fn decode_protected_content_cipher_block_size<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_integer(Some("protected_content_cipher_block_size"), i64::from(value));
}

fn decode_protected_content_cipher_mode<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_integer(Some("protected_content_cipher_mode"), i64::from(value));
}

fn decode_protected_content_cipher_sample_type<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_integer(Some("protected_content_cipher_sample_type"), i64::from(value));
}

fn decode_protected_content_usage<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.write_integer(Some("protected_content_usage"), i64::from(value));
}

// Two-bit feature levels, low bit first.
const ENC_HEVC_FEATURE_FIELDS: &[(&str, u32)] = &[
    ("separate_colour_planes", 0),
    ("scaling_lists", 2),
    ("amp", 4),
    ("sao", 6),
    ("pcm", 8),
    ("temporal_mvp", 10),
    ("strong_intra_smoothing", 12),
    ("dependent_slices", 14),
    ("sign_data_hiding", 16),
    ("constrained_intra_pred", 18),
    ("transform_skip", 20),
    ("cu_qp_delta", 22),
    ("weighted_prediction", 24),
    ("transquant_bypass", 26),
    ("deblocking_filter_disable", 28),
];

fn decode_enc_hevc_features<W: Write>(value: u32, report: &mut Report<W>, _tables: &SymbolTables) {
    report.begin_object(Some("enc_hevc_features"));
    for &(name, lo) in ENC_HEVC_FEATURE_FIELDS {
        report.write_string(Some(name), symbols::feature_value_name(bits(value, lo, 2)));
    }
    report.end_object();
}

const ENC_HEVC_BLOCK_SIZE_FIELDS: &[(&str, u32)] = &[
    ("log2_max_coding_tree_block_size_minus3", 0),
    ("log2_min_coding_tree_block_size_minus3", 2),
    ("log2_min_luma_coding_block_size_minus3", 4),
    ("log2_max_luma_transform_block_size_minus2", 6),
    ("log2_min_luma_transform_block_size_minus2", 8),
    ("max_max_transform_hierarchy_depth_inter", 10),
    ("min_max_transform_hierarchy_depth_inter", 12),
    ("max_max_transform_hierarchy_depth_intra", 14),
    ("min_max_transform_hierarchy_depth_intra", 16),
    ("log2_max_pcm_coding_block_size_minus3", 18),
    ("log2_min_pcm_coding_block_size_minus3", 20),
];

fn decode_enc_hevc_block_sizes<W: Write>(
    value: u32,
    report: &mut Report<W>,
    _tables: &SymbolTables,
) {
    report.begin_object(Some("enc_hevc_block_sizes"));
    for &(name, lo) in ENC_HEVC_BLOCK_SIZE_FIELDS {
        report.write_integer(Some(name), i64::from(bits(value, lo, 2)));
    }
    report.end_object();
}

/// Writes one surface format object: the render-target format bit being
/// probed, then the decoded surface attributes the driver reports for it.
/// The supported pixel formats come last as one fourcc array.
pub fn write_surface_attributes<W: Write>(
    report: &mut Report<W>,
    tables: &SymbolTables,
    rt_format: u32,
    attributes: &[SurfaceAttribute],
) {
    report.begin_object(None);
    report.write_string(Some("rt_format"), tables.rt_format_name(rt_format).unwrap_or("unknown"));

    let mut pixel_formats: Vec<Fourcc> = Vec::new();
    for attr in attributes {
        match attr.kind {
            SURFACE_ATTRIB_PIXEL_FORMAT => {
                if let SurfaceValue::Integer(fourcc) = attr.value {
                    pixel_formats.push(Fourcc(fourcc as u32));
                }
            }
            SURFACE_ATTRIB_MIN_WIDTH => write_surface_integer(report, "min_width", &attr.value),
            SURFACE_ATTRIB_MAX_WIDTH => write_surface_integer(report, "max_width", &attr.value),
            SURFACE_ATTRIB_MIN_HEIGHT => write_surface_integer(report, "min_height", &attr.value),
            SURFACE_ATTRIB_MAX_HEIGHT => write_surface_integer(report, "max_height", &attr.value),
            SURFACE_ATTRIB_MEMORY_TYPE => {
                if let SurfaceValue::Integer(mask) = attr.value {
                    write_flags(report, "memory_types", mask as u32, &tables.memory_types);
                }
            }
            // Write-only attribute, nothing to report.
            SURFACE_ATTRIB_EXTERNAL_BUFFER_DESCRIPTOR => {}
            SURFACE_ATTRIB_USAGE_HINT => {
                if let SurfaceValue::Integer(mask) = attr.value {
                    write_flags(report, "usage_hints", mask as u32, &tables.usage_hints);
                }
            }
            SURFACE_ATTRIB_DRM_FORMAT_MODIFIERS => {
                if let SurfaceValue::Modifiers(ref modifiers) = attr.value {
                    report.begin_array(Some("drm_format_modifiers"));
                    for modifier in modifiers {
                        report.write_integer(None, *modifier as i64);
                    }
                    report.end_array();
                }
            }
            kind => {
                report.begin_object(Some("unknown"));
                report.write_integer(Some("type"), i64::from(kind));
                if let SurfaceValue::Integer(value) = attr.value {
                    report.write_integer(Some("value"), value);
                }
                report.end_object();
            }
        }
    }

    report.begin_array(Some("pixel_formats"));
    for fourcc in &pixel_formats {
        report.write_string(None, &fourcc.to_string());
    }
    report.end_array();
    report.end_object();
}

fn write_surface_integer<W: Write>(report: &mut Report<W>, tag: &str, value: &SurfaceValue) {
    if let SurfaceValue::Integer(v) = value {
        report.write_integer(Some(tag), *v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TARGET_API_VERSION;
    use serde_json::Value;

    fn decode_one(kind: u32, value: u32, version: ApiVersion) -> Value {
        let tables = SymbolTables::new(version);
        let decoders = AttributeDecoders::new(version);
        let mut report = Report::compact(Vec::new());
        report.begin_object(None);
        decoders.decode(kind, value, &mut report, &tables);
        report.end_object();
        serde_json::from_slice(&report.finish()).unwrap()
    }

    #[test]
    fn bitmask_names_follow_declared_order() {
        // CBR is bit 1, MB is bit 7; declared order puts CBR first.
        let v = decode_one(ATTRIB_RATE_CONTROL, 0x82, TARGET_API_VERSION);
        assert_eq!(v["rate_control_modes"], serde_json::json!(["CBR", "MB"]));
    }

    #[test]
    fn unregistered_kind_falls_back_to_raw() {
        let v = decode_one(999, 5, TARGET_API_VERSION);
        assert_eq!(v["unknown"]["type"], 999);
        assert_eq!(v["unknown"]["value"], 5);
    }

    #[test]
    fn newer_kinds_are_raw_on_old_runtimes() {
        let v = decode_one(ATTRIB_ENC_HEVC_FEATURES, 0x5, ApiVersion::new(1, 4, 0));
        assert!(v.get("enc_hevc_features").is_none());
        assert_eq!(v["unknown"]["type"], i64::from(ATTRIB_ENC_HEVC_FEATURES));
    }

    #[test]
    fn hevc_features_expand_to_levels() {
        // separate_colour_planes = 1 (supported), scaling_lists = 2 (required).
        let v = decode_one(ATTRIB_ENC_HEVC_FEATURES, 0b1001, TARGET_API_VERSION);
        assert_eq!(v["enc_hevc_features"]["separate_colour_planes"], "supported");
        assert_eq!(v["enc_hevc_features"]["scaling_lists"], "required");
        assert_eq!(v["enc_hevc_features"]["amp"], "not_supported");
    }

    #[test]
    fn max_ref_frames_hides_empty_list1() {
        let v = decode_one(ATTRIB_ENC_MAX_REF_FRAMES, 4, TARGET_API_VERSION);
        assert_eq!(v["max_ref_frames"]["list0"], 4);
        assert!(v["max_ref_frames"].get("list1").is_none());

        let v = decode_one(ATTRIB_ENC_MAX_REF_FRAMES, (2 << 16) | 4, TARGET_API_VERSION);
        assert_eq!(v["max_ref_frames"]["list1"], 2);
    }

    #[test]
    fn surface_formats_collect_pixel_formats_last() {
        let tables = SymbolTables::new(TARGET_API_VERSION);
        let attrs = vec![
            SurfaceAttribute {
                kind: SURFACE_ATTRIB_PIXEL_FORMAT,
                value: SurfaceValue::Integer(i64::from(u32::from_le_bytes(*b"NV12"))),
            },
            SurfaceAttribute { kind: SURFACE_ATTRIB_MAX_WIDTH, value: SurfaceValue::Integer(4096) },
            SurfaceAttribute {
                kind: SURFACE_ATTRIB_MEMORY_TYPE,
                value: SurfaceValue::Integer(0x1),
            },
            SurfaceAttribute {
                kind: SURFACE_ATTRIB_DRM_FORMAT_MODIFIERS,
                value: SurfaceValue::Modifiers(vec![0, 0x0100_0000_0000_0002]),
            },
        ];
        let mut report = Report::compact(Vec::new());
        write_surface_attributes(&mut report, &tables, 0x1, &attrs);
        let raw = String::from_utf8(report.finish()).unwrap();
        let v: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["rt_format"], "YUV420");
        assert_eq!(v["max_width"], 4096);
        assert_eq!(v["memory_types"], serde_json::json!(["VA"]));
        assert_eq!(v["drm_format_modifiers"][1], 0x0100_0000_0000_0002_i64);
        assert_eq!(v["pixel_formats"], serde_json::json!(["NV12"]));
        // The fourcc list closes out the object, after the decoded attributes.
        assert!(raw.find("\"pixel_formats\"").unwrap() > raw.find("\"max_width\"").unwrap());
    }

    #[test]
    fn unresolvable_rt_format_is_named_unknown() {
        let tables = SymbolTables::new(TARGET_API_VERSION);
        let mut report = Report::compact(Vec::new());
        write_surface_attributes(&mut report, &tables, 0x8000_0000, &[]);
        let v: Value = serde_json::from_slice(&report.finish()).unwrap();
        assert_eq!(v["rt_format"], "unknown");
    }
}
