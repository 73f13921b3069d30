// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! End-to-end walks over a scripted capability source.

use std::cell::RefCell;

use serde_json::Value;

use vacaps::device::{
    CapError, CapRange, CapSource, ConfigAttribute, FilterCaps, FilterParams, ImageFormat,
    PipelineCaps, SubpictureFormat, SurfaceAttribute, SurfaceValue, ATTRIB_NOT_SUPPORTED,
};
use vacaps::dump::{CapsDumper, Sections};
use vacaps::report::Report;
use vacaps::{ApiVersion, Fourcc};

const PROFILE_H264_HIGH: i32 = 7;
const PROFILE_BOGUS: i32 = 1234;
const ENTRYPOINT_VLD: i32 = 1;
const ENTRYPOINT_VIDEO_PROC: i32 = 10;
const FILTER_SHARPENING: i32 = 3;
/// A filter id from some future runtime, unknown to the symbol tables.
const FILTER_FUTURE: i32 = 99;

#[derive(Default)]
struct MockSource {
    /// Render target mask reported for the VLD entry point.
    decode_rt: u32,
    /// Render target mask reported for the VideoProc entry point.
    vproc_rt: u32,
    /// Config creation fails for these render target bits.
    fail_rt_bits: u32,
    /// Profile enumeration fails outright.
    fail_profiles: bool,
    /// The driver reports no vendor string.
    no_vendor: bool,
    /// Render target bits whose surface attributes were queried.
    surface_queries: RefCell<Vec<u32>>,
}

struct MockConfig {
    rt_format: u32,
}

struct MockContext;

struct MockBuffer;

fn fail(message: &str) -> CapError {
    CapError::new(-2, message)
}

impl CapSource for MockSource {
    type Config = MockConfig;
    type Context = MockContext;
    type FilterParamsBuffer = MockBuffer;

    fn version(&self) -> ApiVersion {
        ApiVersion::new(1, 13, 0)
    }

    fn vendor_string(&self) -> Option<String> {
        if self.no_vendor {
            return None;
        }
        Some("mock driver".to_string())
    }

    fn profiles(&self) -> Result<Vec<i32>, CapError> {
        if self.fail_profiles {
            return Err(fail("profile query rejected"));
        }
        Ok(vec![PROFILE_H264_HIGH, PROFILE_BOGUS])
    }

    fn entrypoints(&self, profile: i32) -> Result<Vec<i32>, CapError> {
        match profile {
            PROFILE_H264_HIGH => Ok(vec![ENTRYPOINT_VLD, ENTRYPOINT_VIDEO_PROC]),
            _ => Err(fail("unsupported profile")),
        }
    }

    fn config_attributes(
        &self,
        _profile: i32,
        entrypoint: i32,
    ) -> Result<Vec<ConfigAttribute>, CapError> {
        let rt = match entrypoint {
            ENTRYPOINT_VLD => self.decode_rt,
            ENTRYPOINT_VIDEO_PROC => self.vproc_rt,
            _ => 0,
        };
        Ok(vec![
            ConfigAttribute { kind: 0, value: rt },
            // Rate control is reported unsupported and must stay silent.
            ConfigAttribute { kind: 5, value: ATTRIB_NOT_SUPPORTED },
            ConfigAttribute { kind: 13, value: (1 << 16) | 2 },
        ])
    }

    fn create_config(
        &self,
        _profile: i32,
        _entrypoint: i32,
        rt_format: u32,
    ) -> Result<MockConfig, CapError> {
        if rt_format & self.fail_rt_bits != 0 {
            return Err(fail("no config for this render target"));
        }
        Ok(MockConfig { rt_format })
    }

    fn surface_attributes(&self, config: &MockConfig) -> Result<Vec<SurfaceAttribute>, CapError> {
        self.surface_queries.borrow_mut().push(config.rt_format);
        Ok(vec![
            SurfaceAttribute {
                kind: 1,
                value: SurfaceValue::Integer(i64::from(u32::from_le_bytes(*b"NV12"))),
            },
            SurfaceAttribute { kind: 3, value: SurfaceValue::Integer(4096) },
        ])
    }

    fn create_context(
        &self,
        _config: &MockConfig,
        _width: u32,
        _height: u32,
    ) -> Result<MockContext, CapError> {
        Ok(MockContext)
    }

    fn filters(&self, _context: &MockContext) -> Result<Vec<i32>, CapError> {
        Ok(vec![FILTER_SHARPENING, FILTER_FUTURE])
    }

    fn filter_caps(&self, _context: &MockContext, filter: i32) -> Result<FilterCaps, CapError> {
        match filter {
            FILTER_SHARPENING => Ok(FilterCaps::Range(CapRange {
                min_value: 0.0,
                max_value: 1.0,
                default_value: 0.5,
                step: 0.1,
            })),
            // Unrecognized kinds still answer the generic range query.
            FILTER_FUTURE => Ok(FilterCaps::Range(CapRange {
                min_value: 0.0,
                max_value: 8.0,
                default_value: 2.0,
                step: 1.0,
            })),
            _ => Err(fail("no capabilities")),
        }
    }

    fn create_filter_params(
        &self,
        _context: &MockContext,
        _filter: i32,
        _params: &FilterParams,
    ) -> Result<MockBuffer, CapError> {
        Ok(MockBuffer)
    }

    fn pipeline_caps(
        &self,
        _context: &MockContext,
        params: Option<&MockBuffer>,
    ) -> Result<PipelineCaps, CapError> {
        // One forward reference only when probed with a parameter buffer,
        // so tests can tell the two probes apart.
        Ok(PipelineCaps {
            num_forward_references: u32::from(params.is_some()),
            input_color_standards: vec![1],
            output_color_standards: vec![1],
            ..PipelineCaps::default()
        })
    }

    fn image_formats(&self) -> Result<Vec<ImageFormat>, CapError> {
        Ok(vec![
            ImageFormat {
                fourcc: Fourcc::from(b"NV12"),
                byte_order: 1,
                bits_per_pixel: 12,
                depth: 0,
                red_mask: 0,
                green_mask: 0,
                blue_mask: 0,
                alpha_mask: 0,
            },
            ImageFormat {
                fourcc: Fourcc::from(b"BGRA"),
                byte_order: 1,
                bits_per_pixel: 32,
                depth: 32,
                red_mask: 0x00ff_0000,
                green_mask: 0x0000_ff00,
                blue_mask: 0x0000_00ff,
                alpha_mask: 0xff00_0000,
            },
        ])
    }

    fn subpicture_formats(&self) -> Result<Vec<SubpictureFormat>, CapError> {
        Ok(vec![SubpictureFormat {
            format: ImageFormat {
                fourcc: Fourcc::from(b"BGRA"),
                byte_order: 1,
                bits_per_pixel: 32,
                depth: 32,
                red_mask: 0x00ff_0000,
                green_mask: 0x0000_ff00,
                blue_mask: 0x0000_00ff,
                alpha_mask: 0xff00_0000,
            },
            flags: 0x3,
        }])
    }
}

fn dump(source: &MockSource, sections: Sections) -> Value {
    let mut report = Report::pretty(Vec::new(), 4);
    CapsDumper::new(source, sections).dump(&mut report);
    serde_json::from_slice(&report.finish()).unwrap()
}

#[test]
fn full_walk_renders_the_whole_tree() {
    let source =
        MockSource { decode_rt: 0x1 | 0x4, vproc_rt: 0x1, ..MockSource::default() };
    let v = dump(&source, Sections::all());

    assert_eq!(v["api_version"]["major"], 1);
    assert_eq!(v["driver_version"]["major"], 1);
    assert_eq!(v["driver_vendor"], "mock driver");

    let profile = &v["profiles"][0];
    assert_eq!(profile["profile"], 7);
    assert_eq!(profile["name"], "H264High");
    assert_eq!(profile["description"], "H.264 / MPEG-4 part 10 (AVC) High Profile");

    let vld = &profile["entrypoints"][0];
    assert_eq!(vld["name"], "VLD");
    // The unsupported rate control attribute never surfaces.
    assert!(vld["attributes"].get("rate_control_modes").is_none());
    assert_eq!(vld["attributes"]["max_ref_frames"]["list0"], 2);
    assert_eq!(vld["attributes"]["max_ref_frames"]["list1"], 1);

    // One surface format per mask bit, low bit first.
    let formats = vld["surface_formats"].as_array().unwrap();
    assert_eq!(formats.len(), 2);
    assert_eq!(formats[0]["rt_format"], "YUV420");
    assert_eq!(formats[1]["rt_format"], "YUV444");
    assert_eq!(formats[0]["pixel_formats"], serde_json::json!(["NV12"]));

    assert_eq!(v["image_formats"][0]["fourcc"], "NV12");
    assert_eq!(v["image_formats"][0]["byte_order"], "LE");
    assert!(v["image_formats"][0].get("depth").is_none());
    assert_eq!(v["image_formats"][1]["depth"], 32);
    let subpicture_flags = &v["subpicture_formats"][0]["flags"];
    assert_eq!(*subpicture_flags, serde_json::json!(["CHROMA_KEYING", "GLOBAL_ALPHA"]));
}

#[test]
fn failed_profile_truncates_its_own_subtree() {
    let source = MockSource { decode_rt: 0x1, ..MockSource::default() };
    let v = dump(&source, Sections::all());
    let bogus = &v["profiles"][1];
    assert_eq!(bogus["profile"], 1234);
    assert_eq!(bogus["name"], "unknown");
    assert!(bogus.get("description").is_none());
    assert!(bogus.get("entrypoints").is_none());
}

#[test]
fn empty_render_target_mask_skips_surfaces_and_filters() {
    let source = MockSource::default();
    let v = dump(&source, Sections::all());
    let entrypoints = v["profiles"][0]["entrypoints"].as_array().unwrap();
    for entrypoint in entrypoints {
        assert!(entrypoint.get("surface_formats").is_none());
        assert!(entrypoint.get("filters").is_none());
    }
    assert!(source.surface_queries.borrow().is_empty());
}

#[test]
fn empty_filter_chain_is_reported_first_with_pipeline_only() {
    let source = MockSource { vproc_rt: 0x1, ..MockSource::default() };
    let v = dump(&source, Sections::all());
    let vproc = &v["profiles"][0]["entrypoints"][1];
    assert_eq!(vproc["name"], "VideoProc");

    let filters = vproc["filters"].as_array().unwrap();
    assert_eq!(filters.len(), 3);
    assert_eq!(filters[0]["filter"], 0);
    assert_eq!(filters[0]["name"], "None");
    assert!(filters[0].get("caps").is_none());
    // Probed without a parameter buffer.
    assert_eq!(filters[0]["pipeline"]["num_forward_references"], 0);
    assert_eq!(
        filters[0]["pipeline"]["input_color_standards"][0],
        serde_json::json!({ "type": 1, "name": "BT601" })
    );

    assert_eq!(filters[1]["name"], "Sharpening");
    assert_eq!(filters[1]["caps"]["default_value"], 0.5);
    assert_eq!(filters[1]["pipeline"]["num_forward_references"], 1);
}

#[test]
fn unrecognized_filter_still_probes_range_and_pipeline() {
    let source = MockSource { vproc_rt: 0x1, ..MockSource::default() };
    let v = dump(&source, Sections::all());
    let filters = v["profiles"][0]["entrypoints"][1]["filters"].as_array().unwrap();

    let future = &filters[2];
    assert_eq!(future["filter"], 99);
    assert_eq!(future["name"], "unknown");
    assert_eq!(future["caps"]["default_value"], 2.0);
    // The pipeline was probed with a buffer built from the range default.
    assert_eq!(future["pipeline"]["num_forward_references"], 1);
}

#[test]
fn failed_profile_enumeration_keeps_the_report_well_formed() {
    let source = MockSource { fail_profiles: true, ..MockSource::default() };
    let v = dump(&source, Sections::all());
    assert!(v.get("profiles").is_none());
    // The independent top-level sections still render.
    assert_eq!(v["image_formats"][0]["fourcc"], "NV12");
    assert_eq!(v["subpicture_formats"][0]["fourcc"], "BGRA");
}

#[test]
fn missing_vendor_string_reads_unknown() {
    let source = MockSource { no_vendor: true, ..MockSource::default() };
    let v = dump(&source, Sections::all());
    assert_eq!(v["driver_vendor"], "unknown");
}

#[test]
fn surface_probe_continues_past_a_failing_bit() {
    let source = MockSource {
        decode_rt: 0x1 | 0x2 | 0x4,
        fail_rt_bits: 0x2,
        ..MockSource::default()
    };
    let v = dump(&source, Sections::all());
    let formats = v["profiles"][0]["entrypoints"][0]["surface_formats"].as_array().unwrap();
    assert_eq!(formats.len(), 2);
    assert_eq!(formats[0]["rt_format"], "YUV420");
    assert_eq!(formats[1]["rt_format"], "YUV444");
    // Each successful bit was queried exactly once, in ascending order.
    assert_eq!(*source.surface_queries.borrow(), vec![0x1, 0x4]);
}

#[test]
fn section_selection_limits_the_output() {
    let source = MockSource { decode_rt: 0x1, ..MockSource::default() };
    let v = dump(&source, Sections { image_formats: true, ..Sections::default() });
    assert!(v.get("profiles").is_none());
    assert!(v.get("image_formats").is_some());

    // Asking for surface formats pulls in profiles and entry points, but
    // not attributes.
    let v = dump(&source, Sections { surface_formats: true, ..Sections::default() });
    let vld = &v["profiles"][0]["entrypoints"][0];
    assert!(vld.get("attributes").is_none());
    assert!(vld.get("surface_formats").is_some());
}
