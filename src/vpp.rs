// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Video processing filter and pipeline capability rendering, plus the
//! parameter buffers used to probe each filter's pipeline behaviour.

use std::io::Write;

use crate::attributes::write_flags;
use crate::device::{CapRange, FilterCaps, FilterParams, PipelineCaps};
use crate::report::Report;
use crate::symbols::{self, lookup, SymbolTables};

/// Default quantiser and strength for the human-vision-system noise
/// reduction probe. The filter reports no capability structure, so the
/// probe buffer carries mid-range values.
const HVS_PROBE_QP: u16 = 26;
const HVS_PROBE_STRENGTH: u16 = 10;

/// Writes one typed entry as its raw id plus the resolved name, so newer
/// driver values survive the rendering even when the tables miss them.
fn write_id_name<W: Write>(report: &mut Report<W>, tag: &str, id: i32, table: &[symbols::Name]) {
    report.write_integer(Some(tag), i64::from(id));
    report.write_string(Some("name"), lookup(table, id).unwrap_or("unknown"));
}

fn write_range<W: Write>(report: &mut Report<W>, range: &CapRange) {
    report.write_double(Some("min_value"), range.min_value);
    report.write_double(Some("max_value"), range.max_value);
    report.write_double(Some("default_value"), range.default_value);
    report.write_double(Some("step"), range.step);
}

/// Writes the capability members of one filter into the current object.
/// The shape depends on the filter family: plain ranges for the value
/// filters, typed entries for the rest.
pub fn write_filter_caps<W: Write>(
    report: &mut Report<W>,
    tables: &SymbolTables,
    caps: &FilterCaps,
) {
    match caps {
        FilterCaps::None => {}
        FilterCaps::Range(range) => {
            report.begin_object(Some("caps"));
            write_range(report, range);
            report.end_object();
        }
        FilterCaps::Deinterlacing(types) => {
            report.begin_array(Some("types"));
            for ty in types {
                report.begin_object(None);
                write_id_name(report, "type", *ty, &tables.deinterlacers);
                report.end_object();
            }
            report.end_array();
        }
        FilterCaps::ColorBalance(entries) => {
            report.begin_array(Some("caps"));
            for (ty, range) in entries {
                report.begin_object(None);
                write_id_name(report, "type", *ty, &tables.colour_balance_types);
                write_range(report, range);
                report.end_object();
            }
            report.end_array();
        }
        FilterCaps::TotalColorCorrection(entries) => {
            report.begin_array(Some("caps"));
            for (ty, range) in entries {
                report.begin_object(None);
                write_id_name(report, "type", *ty, &tables.total_colour_correction_types);
                write_range(report, range);
                report.end_object();
            }
            report.end_array();
        }
        FilterCaps::HdrToneMapping(entries) => {
            report.begin_array(Some("caps"));
            for (metadata_type, flags) in entries {
                report.begin_object(None);
                write_id_name(report, "metadata_type", *metadata_type, &tables.hdr_metadata_types);
                write_flags(report, "flags", *flags, &tables.tone_mapping_flags);
                report.end_object();
            }
            report.end_array();
        }
        FilterCaps::Lut3d(entries) => {
            report.begin_array(Some("caps"));
            for cap in entries {
                report.begin_object(None);
                report.write_integer(Some("lut_size"), i64::from(cap.lut_size));
                report.begin_array(Some("lut_stride"));
                for stride in cap.lut_stride {
                    report.write_integer(None, i64::from(stride));
                }
                report.end_array();
                report.write_integer(Some("bit_depth"), i64::from(cap.bit_depth));
                report.write_integer(Some("num_channel"), i64::from(cap.num_channel));
                let channels = &tables.lut_channel_types;
                write_flags(report, "channel_mapping", cap.channel_mapping, channels);
                report.end_object();
            }
            report.end_array();
        }
    }
}

/// Builds the parameter buffer content used to probe a filter's pipeline
/// capabilities. Returns `None` when the filter needs no parameters or the
/// reported capabilities leave nothing to probe with.
pub fn default_filter_params(filter: i32, caps: &FilterCaps) -> Option<FilterParams> {
    match (filter, caps) {
        (symbols::FILTER_NONE, _) => None,
        (symbols::FILTER_DEINTERLACING, FilterCaps::Deinterlacing(types)) => types
            .iter()
            .copied()
            .filter(|ty| *ty != symbols::DEINTERLACING_NONE)
            .max()
            .map(|algorithm| FilterParams::Deinterlacing { algorithm }),
        (symbols::FILTER_COLOR_BALANCE, FilterCaps::ColorBalance(entries)) => {
            Some(FilterParams::ColorBalance(
                entries.iter().map(|(ty, range)| (*ty, range.default_value)).collect(),
            ))
        }
        (symbols::FILTER_TOTAL_COLOR_CORRECTION, FilterCaps::TotalColorCorrection(entries)) => {
            Some(FilterParams::TotalColorCorrection(
                entries.iter().map(|(ty, range)| (*ty, range.default_value)).collect(),
            ))
        }
        (symbols::FILTER_HVS_NOISE_REDUCTION, _) => Some(FilterParams::HvsNoiseReduction {
            qp: HVS_PROBE_QP,
            strength: HVS_PROBE_STRENGTH,
        }),
        (symbols::FILTER_HDR_TONE_MAPPING, FilterCaps::HdrToneMapping(entries)) => entries
            .iter()
            .any(|(ty, _)| *ty == symbols::HDR_METADATA_HDR10)
            .then_some(FilterParams::Hdr10),
        (symbols::FILTER_3DLUT, FilterCaps::Lut3d(entries)) => {
            entries.first().copied().map(FilterParams::Lut3d)
        }
        // The value filters, and any filter kind newer than these tables
        // that answered the generic range query.
        (_, FilterCaps::Range(range)) => Some(FilterParams::Value(range.default_value)),
        _ => None,
    }
}

fn write_id_names<W: Write>(
    report: &mut Report<W>,
    tag: &str,
    ids: &[i32],
    table: &[symbols::Name],
) {
    report.begin_array(Some(tag));
    for id in ids {
        report.begin_object(None);
        write_id_name(report, "type", *id, table);
        report.end_object();
    }
    report.end_array();
}

fn write_name_bits<W: Write>(
    report: &mut Report<W>,
    tag: &str,
    value: u32,
    table: &[symbols::Name],
) {
    report.begin_array(Some(tag));
    for name in table {
        if name.id != 0 && value & (name.id as u32) == name.id as u32 {
            report.write_string(None, name.name);
        }
    }
    report.end_array();
}

/// Writes one `pipeline` object from the capabilities the driver reported
/// for a filter chain. Pixel format and size limits only exist on 1.1 and
/// later runtimes.
pub fn write_pipeline_caps<W: Write>(
    report: &mut Report<W>,
    tables: &SymbolTables,
    caps: &PipelineCaps,
) {
    report.begin_object(Some("pipeline"));
    write_flags(report, "pipeline_flags", caps.pipeline_flags, &tables.pipeline_flags);
    write_flags(report, "filter_flags", caps.filter_flags, &tables.filter_flags);
    report.write_integer(Some("num_forward_references"), i64::from(caps.num_forward_references));
    report.write_integer(Some("num_backward_references"), i64::from(caps.num_backward_references));
    let standards = &tables.colour_standards;
    write_id_names(report, "input_color_standards", &caps.input_color_standards, standards);
    write_id_names(report, "output_color_standards", &caps.output_color_standards, standards);

    report.begin_array(Some("rotations"));
    for rotation in &tables.rotations {
        if caps.rotation_flags & (1 << rotation.id) != 0 {
            report.write_string(None, rotation.name);
        }
    }
    report.end_array();
    write_name_bits(report, "blends", caps.blend_flags, &tables.blends);
    write_name_bits(report, "mirrors", caps.mirror_flags, &tables.mirrors);
    report.write_integer(Some("num_additional_outputs"), i64::from(caps.num_additional_outputs));

    if tables.version >= symbols::V1_1 {
        report.begin_array(Some("input_pixel_formats"));
        for fourcc in &caps.input_pixel_formats {
            report.write_string(None, &fourcc.to_string());
        }
        report.end_array();
        report.begin_array(Some("output_pixel_formats"));
        for fourcc in &caps.output_pixel_formats {
            report.write_string(None, &fourcc.to_string());
        }
        report.end_array();
        report.write_integer(Some("max_input_width"), i64::from(caps.max_input_width));
        report.write_integer(Some("max_input_height"), i64::from(caps.max_input_height));
        report.write_integer(Some("min_input_width"), i64::from(caps.min_input_width));
        report.write_integer(Some("min_input_height"), i64::from(caps.min_input_height));
        report.write_integer(Some("max_output_width"), i64::from(caps.max_output_width));
        report.write_integer(Some("max_output_height"), i64::from(caps.max_output_height));
        report.write_integer(Some("min_output_width"), i64::from(caps.min_output_width));
        report.write_integer(Some("min_output_height"), i64::from(caps.min_output_height));
    }
    report.end_object();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Lut3dCap;
    use crate::{ApiVersion, Fourcc, TARGET_API_VERSION};
    use serde_json::Value;

    fn render_caps(caps: &FilterCaps) -> Value {
        let tables = SymbolTables::new(TARGET_API_VERSION);
        let mut report = Report::compact(Vec::new());
        report.begin_object(None);
        write_filter_caps(&mut report, &tables, caps);
        report.end_object();
        serde_json::from_slice(&report.finish()).unwrap()
    }

    #[test]
    fn range_caps_render_inline() {
        let caps = FilterCaps::Range(CapRange {
            min_value: 0.0,
            max_value: 64.0,
            default_value: 32.0,
            step: 1.0,
        });
        let v = render_caps(&caps);
        assert_eq!(v["caps"]["min_value"], 0.0);
        assert_eq!(v["caps"]["max_value"], 64.0);
        assert_eq!(v["caps"]["default_value"], 32.0);
    }

    #[test]
    fn deinterlacing_caps_keep_raw_ids() {
        let caps = FilterCaps::Deinterlacing(vec![1, 4, 77]);
        let v = render_caps(&caps);
        assert_eq!(
            v["types"],
            serde_json::json!([
                { "type": 1, "name": "Bob" },
                { "type": 4, "name": "MotionCompensated" },
                { "type": 77, "name": "unknown" },
            ])
        );
    }

    #[test]
    fn typed_caps_carry_id_and_name() {
        let range = CapRange { min_value: -1.0, max_value: 1.0, default_value: 0.0, step: 0.1 };
        let v = render_caps(&FilterCaps::ColorBalance(vec![(3, range), (42, range)]));
        assert_eq!(v["caps"][0]["type"], 3);
        assert_eq!(v["caps"][0]["name"], "Brightness");
        assert_eq!(v["caps"][1]["type"], 42);
        assert_eq!(v["caps"][1]["name"], "unknown");

        let v = render_caps(&FilterCaps::HdrToneMapping(vec![(1, 0x1)]));
        assert_eq!(v["caps"][0]["metadata_type"], 1);
        assert_eq!(v["caps"][0]["name"], "HDR10");
    }

    #[test]
    fn lut3d_caps_render_as_objects() {
        let caps = FilterCaps::Lut3d(vec![Lut3dCap {
            lut_size: 33,
            lut_stride: [33, 33, 64],
            bit_depth: 12,
            num_channel: 4,
            channel_mapping: 0x3,
        }]);
        let v = render_caps(&caps);
        assert_eq!(v["caps"][0]["lut_size"], 33);
        assert_eq!(v["caps"][0]["lut_stride"], serde_json::json!([33, 33, 64]));
        assert_eq!(v["caps"][0]["channel_mapping"], serde_json::json!(["RGB_RGB", "YUV_RGB"]));
    }

    #[test]
    fn probe_params_follow_caps() {
        // Deinterlacing picks the strongest algorithm on offer, never None.
        let deinterlacing = FilterCaps::Deinterlacing(vec![0, 1, 3]);
        let params = default_filter_params(symbols::FILTER_DEINTERLACING, &deinterlacing);
        assert_eq!(params, Some(FilterParams::Deinterlacing { algorithm: 3 }));
        let none_only = FilterCaps::Deinterlacing(vec![0]);
        assert_eq!(default_filter_params(symbols::FILTER_DEINTERLACING, &none_only), None);

        // Value filters probe at the reported default.
        let range = CapRange { min_value: 0.0, max_value: 1.0, default_value: 0.5, step: 0.1 };
        assert_eq!(
            default_filter_params(symbols::FILTER_SHARPENING, &FilterCaps::Range(range)),
            Some(FilterParams::Value(0.5))
        );

        // HDR tone mapping only probes when HDR10 metadata is accepted.
        assert_eq!(
            default_filter_params(
                symbols::FILTER_HDR_TONE_MAPPING,
                &FilterCaps::HdrToneMapping(vec![(0, 0x1)])
            ),
            None
        );
        assert_eq!(
            default_filter_params(
                symbols::FILTER_HDR_TONE_MAPPING,
                &FilterCaps::HdrToneMapping(vec![(1, 0x2)])
            ),
            Some(FilterParams::Hdr10)
        );

        // A filter kind these tables do not know still probes with the
        // default from the generic range query.
        assert_eq!(
            default_filter_params(99, &FilterCaps::Range(range)),
            Some(FilterParams::Value(0.5))
        );

        assert_eq!(default_filter_params(symbols::FILTER_NONE, &FilterCaps::None), None);
    }

    #[test]
    fn pipeline_caps_render_names_and_limits() {
        let caps = PipelineCaps {
            pipeline_flags: 0x1,
            filter_flags: 0x0000_0200,
            num_forward_references: 2,
            num_backward_references: 1,
            input_color_standards: vec![1, 2, 200],
            output_color_standards: vec![1],
            rotation_flags: 0b0101,
            blend_flags: 0x10 | 0x1,
            mirror_flags: 0x2,
            num_additional_outputs: 0,
            input_pixel_formats: vec![Fourcc::from(b"NV12")],
            output_pixel_formats: vec![Fourcc::from(b"NV12"), Fourcc::from(b"P010")],
            max_input_width: 4096,
            max_input_height: 4096,
            min_input_width: 16,
            min_input_height: 16,
            max_output_width: 4096,
            max_output_height: 4096,
            min_output_width: 16,
            min_output_height: 16,
        };
        let tables = SymbolTables::new(TARGET_API_VERSION);
        let mut report = Report::compact(Vec::new());
        report.begin_object(None);
        write_pipeline_caps(&mut report, &tables, &caps);
        report.end_object();
        let v: Value = serde_json::from_slice(&report.finish()).unwrap();
        let p = &v["pipeline"];
        assert_eq!(
            p["input_color_standards"],
            serde_json::json!([
                { "type": 1, "name": "BT601" },
                { "type": 2, "name": "BT709" },
                { "type": 200, "name": "unknown" },
            ])
        );
        assert_eq!(p["rotations"], serde_json::json!(["NONE", "180"]));
        assert_eq!(p["mirrors"], serde_json::json!(["VERTICAL"]));
        assert_eq!(p["filter_flags"], serde_json::json!(["FILTER_SCALING_HQ"]));
        assert_eq!(p["output_pixel_formats"][1], "P010");
        assert_eq!(p["max_input_width"], 4096);
    }

    #[test]
    fn pipeline_limits_absent_before_1_1() {
        let tables = SymbolTables::new(ApiVersion::new(1, 0, 0));
        let mut report = Report::compact(Vec::new());
        report.begin_object(None);
        write_pipeline_caps(&mut report, &tables, &PipelineCaps::default());
        report.end_object();
        let v: Value = serde_json::from_slice(&report.finish()).unwrap();
        assert!(v["pipeline"].get("max_input_width").is_none());
        assert!(v["pipeline"].get("input_pixel_formats").is_none());
    }
}
