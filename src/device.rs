// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The seam between the capability walk and the device.
//!
//! [`CapSource`] models the query surface of the capability API. The real
//! implementation (behind the `vaapi` feature) talks to a driver; tests
//! supply a mock. Transient probe objects (configs, contexts, filter
//! parameter buffers) are associated types released on drop, so creation
//! and destruction pair up with scope in the walker.

use thiserror::Error;

use crate::ApiVersion;
use crate::Fourcc;

/// A failed capability query: the raw status code plus the API's own
/// description of it. Recoverable failures truncate one subtree of the
/// report; they never abort the walk.
#[derive(Debug, Clone, Error)]
#[error("{code} ({message})")]
pub struct CapError {
    pub code: i32,
    pub message: String,
}

impl CapError {
    pub fn new(code: i32, message: impl Into<String>) -> CapError {
        CapError { code, message: message.into() }
    }
}

/// Attribute value marking "not supported"; such entries are skipped, never
/// decoded.
pub const ATTRIB_NOT_SUPPORTED: u32 = 0x8000_0000;

/// One configuration attribute of a (profile, entry point) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigAttribute {
    pub kind: u32,
    pub value: u32,
}

/// One attribute of the surfaces a probe config can render to. The kind is
/// kept raw; unknown kinds are reported, not dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceAttribute {
    pub kind: u32,
    pub value: SurfaceValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceValue {
    Integer(i64),
    /// DRM format modifiers, copied out of the driver-owned list.
    Modifiers(Vec<u64>),
}

/// Range of a scalar filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CapRange {
    pub min_value: f64,
    pub max_value: f64,
    pub default_value: f64,
    pub step: f64,
}

/// Capabilities of one video processing filter, shaped per filter kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCaps {
    /// The filter reports no capability record (e.g. HVS noise reduction,
    /// which rejects the query by contract).
    None,
    /// A plain scalar filter: strength range.
    Range(CapRange),
    /// Supported deinterlacing algorithm ids.
    Deinterlacing(Vec<i32>),
    /// Colour balance attribute ids with their ranges.
    ColorBalance(Vec<(i32, CapRange)>),
    /// Total colour correction channel ids with their ranges.
    TotalColorCorrection(Vec<(i32, CapRange)>),
    /// HDR metadata types with their tone mapping direction masks.
    HdrToneMapping(Vec<(i32, u32)>),
    /// 3D LUT configurations.
    Lut3d(Vec<Lut3dCap>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lut3dCap {
    pub lut_size: u16,
    pub lut_stride: [u16; 3],
    pub bit_depth: u16,
    pub num_channel: u16,
    pub channel_mapping: u32,
}

/// Filter parameters used to configure a realistic probe pipeline. Built by
/// the walker from [`FilterCaps`]; turned into a device buffer by the
/// backend.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParams {
    /// Strongest available deinterlacing algorithm.
    Deinterlacing { algorithm: i32 },
    /// Every reported colour balance attribute at its default value.
    ColorBalance(Vec<(i32, f64)>),
    /// Every reported correction channel at its default value.
    TotalColorCorrection(Vec<(i32, f64)>),
    /// Fixed probe settings; the filter has no queryable caps.
    HvsNoiseReduction { qp: u16, strength: u16 },
    /// HDR10 tone mapping with representative mastering metadata.
    Hdr10,
    /// First reported LUT configuration, lowest channel mapping bit.
    Lut3d(Lut3dCap),
    /// A scalar filter at its default value.
    Value(f64),
}

/// Aggregate limits of a processing pipeline with one (optional) filter
/// applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineCaps {
    pub pipeline_flags: u32,
    pub filter_flags: u32,
    pub num_forward_references: u32,
    pub num_backward_references: u32,
    pub input_color_standards: Vec<i32>,
    pub output_color_standards: Vec<i32>,
    pub rotation_flags: u32,
    pub blend_flags: u32,
    pub mirror_flags: u32,
    pub num_additional_outputs: u32,
    pub input_pixel_formats: Vec<Fourcc>,
    pub output_pixel_formats: Vec<Fourcc>,
    pub max_input_width: u32,
    pub max_input_height: u32,
    pub min_input_width: u32,
    pub min_input_height: u32,
    pub max_output_width: u32,
    pub max_output_height: u32,
    pub min_output_width: u32,
    pub min_output_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFormat {
    pub fourcc: Fourcc,
    pub byte_order: u32,
    pub bits_per_pixel: u32,
    pub depth: u32,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubpictureFormat {
    pub format: ImageFormat,
    pub flags: u32,
}

/// The capability query surface of an open, initialized device.
///
/// Every method is one blocking query, attempted exactly once by the
/// walker. Methods taking a transient handle only depend on state created
/// with that handle.
pub trait CapSource {
    /// Transient probe configuration; destroyed on drop.
    type Config;
    /// Transient processing context bound to a config; destroyed on drop.
    type Context;
    /// Device-side filter parameter buffer; destroyed on drop.
    type FilterParamsBuffer;

    /// API revision reported by the device at initialization.
    fn version(&self) -> ApiVersion;
    fn vendor_string(&self) -> Option<String>;

    fn profiles(&self) -> Result<Vec<i32>, CapError>;
    fn entrypoints(&self, profile: i32) -> Result<Vec<i32>, CapError>;
    /// All configuration attributes of the pair, including unsupported
    /// sentinel entries.
    fn config_attributes(&self, profile: i32, entrypoint: i32)
        -> Result<Vec<ConfigAttribute>, CapError>;

    fn create_config(
        &self,
        profile: i32,
        entrypoint: i32,
        rt_format: u32,
    ) -> Result<Self::Config, CapError>;
    fn surface_attributes(&self, config: &Self::Config)
        -> Result<Vec<SurfaceAttribute>, CapError>;
    fn create_context(
        &self,
        config: &Self::Config,
        width: u32,
        height: u32,
    ) -> Result<Self::Context, CapError>;

    fn filters(&self, context: &Self::Context) -> Result<Vec<i32>, CapError>;
    fn filter_caps(&self, context: &Self::Context, filter: i32) -> Result<FilterCaps, CapError>;
    fn create_filter_params(
        &self,
        context: &Self::Context,
        filter: i32,
        params: &FilterParams,
    ) -> Result<Self::FilterParamsBuffer, CapError>;
    fn pipeline_caps(
        &self,
        context: &Self::Context,
        params: Option<&Self::FilterParamsBuffer>,
    ) -> Result<PipelineCaps, CapError>;

    fn image_formats(&self) -> Result<Vec<ImageFormat>, CapError>;
    fn subpicture_formats(&self) -> Result<Vec<SubpictureFormat>, CapError>;
}
