// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! VA-API capability source backed by a DRM render node.
//!
//! Talks to libva directly. Every transient object (config, context,
//! parameter buffer) is an RAII guard holding the shared display alive, so
//! teardown happens in reverse creation order by drop scope.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::attributes::{ATTRIB_RT_FORMAT, ATTRIB_TYPE_MAX, SURFACE_ATTRIB_DRM_FORMAT_MODIFIERS};
use crate::device::{
    CapError, CapRange, CapSource, ConfigAttribute, FilterCaps, FilterParams, ImageFormat,
    Lut3dCap, PipelineCaps, SubpictureFormat, SurfaceAttribute, SurfaceValue,
};
use crate::symbols::{
    FILTER_3DLUT, FILTER_COLOR_BALANCE, FILTER_DEINTERLACING, FILTER_HDR_TONE_MAPPING,
    FILTER_TOTAL_COLOR_CORRECTION, HDR_METADATA_HDR10,
};
use crate::{ApiVersion, Fourcc};

#[allow(non_camel_case_types, non_snake_case, dead_code)]
mod ffi {
    use std::ffi::{c_char, c_int, c_uint, c_void};

    pub type VADisplay = *mut c_void;
    pub type VAStatus = c_int;
    pub type VAGenericID = c_uint;
    pub type VAConfigID = VAGenericID;
    pub type VAContextID = VAGenericID;
    pub type VABufferID = VAGenericID;
    pub type VASurfaceID = VAGenericID;

    pub const VA_STATUS_SUCCESS: VAStatus = 0;
    pub const VA_INVALID_ID: VAGenericID = 0xffff_ffff;

    pub const VA_GENERIC_VALUE_TYPE_INTEGER: c_int = 1;
    pub const VA_GENERIC_VALUE_TYPE_POINTER: c_int = 3;

    pub const VA_PROC_FILTER_PARAMETER_BUFFER_TYPE: c_uint = 42;

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAConfigAttrib {
        pub type_: c_uint,
        pub value: c_uint,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub union VAGenericValueUnion {
        pub i: c_int,
        pub f: f32,
        pub p: *mut c_void,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAGenericValue {
        pub type_: c_int,
        pub value: VAGenericValueUnion,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VASurfaceAttrib {
        pub type_: c_uint,
        pub flags: c_uint,
        pub value: VAGenericValue,
    }

    #[repr(C)]
    pub struct VADRMFormatModifierList {
        pub num_modifiers: u32,
        pub modifiers: *mut u64,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAImageFormat {
        pub fourcc: u32,
        pub byte_order: u32,
        pub bits_per_pixel: u32,
        pub depth: u32,
        pub red_mask: u32,
        pub green_mask: u32,
        pub blue_mask: u32,
        pub alpha_mask: u32,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterValueRange {
        pub min_value: f32,
        pub max_value: f32,
        pub default_value: f32,
        pub step: f32,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterCap {
        pub range: VAProcFilterValueRange,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterCapDeinterlacing {
        pub type_: c_int,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterCapColorBalance {
        pub type_: c_int,
        pub range: VAProcFilterValueRange,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterCapTotalColorCorrection {
        pub type_: c_int,
        pub range: VAProcFilterValueRange,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterCapHighDynamicRange {
        pub metadata_type: c_int,
        pub caps_flag: u32,
        pub va_reserved: [u32; 16],
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct VAProcFilterCap3DLUT {
        pub lut_size: u16,
        pub lut_stride: [u16; 3],
        pub bit_depth: u16,
        pub num_channel: u16,
        pub channel_mapping: u32,
        pub va_reserved: [u32; 16],
    }

    #[repr(C)]
    pub struct VAProcPipelineCaps {
        pub pipeline_flags: u32,
        pub filter_flags: u32,
        pub num_forward_references: u32,
        pub num_backward_references: u32,
        pub input_color_standards: *mut c_int,
        pub num_input_color_standards: u32,
        pub output_color_standards: *mut c_int,
        pub num_output_color_standards: u32,
        pub rotation_flags: u32,
        pub blend_flags: u32,
        pub mirror_flags: u32,
        pub num_additional_outputs: u32,
        pub num_input_pixel_formats: u32,
        pub input_pixel_formats: *mut u32,
        pub num_output_pixel_formats: u32,
        pub output_pixel_formats: *mut u32,
        pub max_input_width: u32,
        pub max_input_height: u32,
        pub min_input_width: u32,
        pub min_input_height: u32,
        pub max_output_width: u32,
        pub max_output_height: u32,
        pub min_output_width: u32,
        pub min_output_height: u32,
        pub va_reserved: [u32; 16],
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBuffer {
        pub type_: c_int,
        pub value: f32,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBufferDeinterlacing {
        pub type_: c_int,
        pub algorithm: c_int,
        pub flags: u32,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBufferColorBalance {
        pub type_: c_int,
        pub attrib: c_int,
        pub value: f32,
        pub va_reserved: [u32; 4],
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBufferTotalColorCorrection {
        pub type_: c_int,
        pub attrib: c_int,
        pub value: f32,
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBufferHVSNoiseReduction {
        pub type_: c_int,
        pub qp: u16,
        pub strength: u16,
        pub va_reserved: [u32; 16],
    }

    #[repr(C)]
    pub struct VAHdrMetaData {
        pub metadata_type: u32,
        pub metadata: *mut c_void,
        pub metadata_size: u32,
        pub reserved: [u32; 4],
    }

    #[repr(C)]
    pub struct VAHdrMetaDataHDR10 {
        pub display_primaries_x: [u16; 3],
        pub display_primaries_y: [u16; 3],
        pub white_point_x: u16,
        pub white_point_y: u16,
        pub max_display_mastering_luminance: u32,
        pub min_display_mastering_luminance: u32,
        pub max_content_light_level: u16,
        pub max_pic_average_light_level: u16,
        pub reserved: [u32; 16],
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBufferHDRToneMapping {
        pub type_: c_int,
        pub data: VAHdrMetaData,
        pub va_reserved: [u32; 16],
    }

    #[repr(C)]
    pub struct VAProcFilterParameterBuffer3DLUT {
        pub type_: c_int,
        pub lut_surface: VASurfaceID,
        pub lut_size: u16,
        pub lut_stride: [u16; 3],
        pub bit_depth: u16,
        pub num_channel: u16,
        pub channel_mapping: u32,
        pub va_reserved: [u32; 16],
    }

    #[link(name = "va")]
    extern "C" {
        pub fn vaInitialize(
            dpy: VADisplay,
            major_version: *mut c_int,
            minor_version: *mut c_int,
        ) -> VAStatus;
        pub fn vaTerminate(dpy: VADisplay) -> VAStatus;
        pub fn vaErrorStr(error_status: VAStatus) -> *const c_char;
        pub fn vaSetDriverName(dpy: VADisplay, driver_name: *mut c_char) -> VAStatus;
        pub fn vaQueryVendorString(dpy: VADisplay) -> *const c_char;
        pub fn vaMaxNumProfiles(dpy: VADisplay) -> c_int;
        pub fn vaMaxNumEntrypoints(dpy: VADisplay) -> c_int;
        pub fn vaMaxNumImageFormats(dpy: VADisplay) -> c_int;
        pub fn vaMaxNumSubpictureFormats(dpy: VADisplay) -> c_uint;
        pub fn vaQueryConfigProfiles(
            dpy: VADisplay,
            profile_list: *mut c_int,
            num_profiles: *mut c_int,
        ) -> VAStatus;
        pub fn vaQueryConfigEntrypoints(
            dpy: VADisplay,
            profile: c_int,
            entrypoint_list: *mut c_int,
            num_entrypoints: *mut c_int,
        ) -> VAStatus;
        pub fn vaGetConfigAttributes(
            dpy: VADisplay,
            profile: c_int,
            entrypoint: c_int,
            attrib_list: *mut VAConfigAttrib,
            num_attribs: c_int,
        ) -> VAStatus;
        pub fn vaCreateConfig(
            dpy: VADisplay,
            profile: c_int,
            entrypoint: c_int,
            attrib_list: *mut VAConfigAttrib,
            num_attribs: c_int,
            config_id: *mut VAConfigID,
        ) -> VAStatus;
        pub fn vaDestroyConfig(dpy: VADisplay, config_id: VAConfigID) -> VAStatus;
        pub fn vaQuerySurfaceAttributes(
            dpy: VADisplay,
            config: VAConfigID,
            attrib_list: *mut VASurfaceAttrib,
            num_attribs: *mut c_uint,
        ) -> VAStatus;
        pub fn vaCreateContext(
            dpy: VADisplay,
            config_id: VAConfigID,
            picture_width: c_int,
            picture_height: c_int,
            flag: c_int,
            render_targets: *mut VASurfaceID,
            num_render_targets: c_int,
            context: *mut VAContextID,
        ) -> VAStatus;
        pub fn vaDestroyContext(dpy: VADisplay, context: VAContextID) -> VAStatus;
        pub fn vaCreateBuffer(
            dpy: VADisplay,
            context: VAContextID,
            type_: c_uint,
            size: c_uint,
            num_elements: c_uint,
            data: *mut c_void,
            buf_id: *mut VABufferID,
        ) -> VAStatus;
        pub fn vaDestroyBuffer(dpy: VADisplay, buffer_id: VABufferID) -> VAStatus;
        pub fn vaQueryVideoProcFilters(
            dpy: VADisplay,
            context: VAContextID,
            filters: *mut c_int,
            num_filters: *mut c_uint,
        ) -> VAStatus;
        pub fn vaQueryVideoProcFilterCaps(
            dpy: VADisplay,
            context: VAContextID,
            type_: c_int,
            filter_caps: *mut c_void,
            num_filter_caps: *mut c_uint,
        ) -> VAStatus;
        pub fn vaQueryVideoProcPipelineCaps(
            dpy: VADisplay,
            context: VAContextID,
            filters: *mut VABufferID,
            num_filters: c_uint,
            pipeline_caps: *mut VAProcPipelineCaps,
        ) -> VAStatus;
        pub fn vaQueryImageFormats(
            dpy: VADisplay,
            format_list: *mut VAImageFormat,
            num_formats: *mut c_int,
        ) -> VAStatus;
        pub fn vaQuerySubpictureFormats(
            dpy: VADisplay,
            format_list: *mut VAImageFormat,
            flags: *mut c_uint,
            num_formats: *mut c_uint,
        ) -> VAStatus;
    }

    #[link(name = "va-drm")]
    extern "C" {
        pub fn vaGetDisplayDRM(fd: c_int) -> VADisplay;
    }
}

fn check(code: ffi::VAStatus) -> Result<(), CapError> {
    if code == ffi::VA_STATUS_SUCCESS {
        return Ok(());
    }
    // Safe: vaErrorStr returns a pointer to a static message table.
    let message = unsafe { CStr::from_ptr(ffi::vaErrorStr(code)) };
    Err(CapError::new(code, message.to_string_lossy()))
}

struct DisplayInner {
    handle: ffi::VADisplay,
    version: ApiVersion,
    // Keeps the render node open for the lifetime of the display.
    _file: File,
}

impl Drop for DisplayInner {
    fn drop(&mut self) {
        unsafe { ffi::vaTerminate(self.handle) };
    }
}

/// An initialized VA display on a DRM render node.
pub struct VaDisplay {
    inner: Rc<DisplayInner>,
}

impl VaDisplay {
    /// Opens `path` and initializes the API on it. `driver` overrides the
    /// driver name negotiation when set; it must be applied before
    /// initialization to take effect.
    pub fn open(path: &Path, driver: Option<&str>) -> Result<VaDisplay, CapError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| CapError::new(-1, format!("open {} failed: {e}", path.display())))?;
        let handle = unsafe { ffi::vaGetDisplayDRM(file.as_raw_fd()) };
        if handle.is_null() {
            return Err(CapError::new(-1, format!("no display on {}", path.display())));
        }
        if let Some(name) = driver {
            let name = CString::new(name)
                .map_err(|_| CapError::new(-1, "driver name contains a NUL byte"))?;
            check(unsafe { ffi::vaSetDriverName(handle, name.as_ptr() as *mut c_char) })?;
        }
        let mut major: c_int = 0;
        let mut minor: c_int = 0;
        check(unsafe { ffi::vaInitialize(handle, &mut major, &mut minor) })?;
        let version = ApiVersion::new(major as u32, minor as u32, 0);
        debug!("initialized {} at API {version}", path.display());
        Ok(VaDisplay { inner: Rc::new(DisplayInner { handle, version, _file: file }) })
    }

    fn handle(&self) -> ffi::VADisplay {
        self.inner.handle
    }

    fn create_buffer(
        &self,
        context: &VaContext,
        data: *mut c_void,
        size: usize,
        num_elements: usize,
    ) -> Result<VaBuffer, CapError> {
        let mut id: ffi::VABufferID = ffi::VA_INVALID_ID;
        check(unsafe {
            ffi::vaCreateBuffer(
                self.handle(),
                context.id,
                ffi::VA_PROC_FILTER_PARAMETER_BUFFER_TYPE,
                size as c_uint,
                num_elements as c_uint,
                data,
                &mut id,
            )
        })?;
        Ok(VaBuffer { inner: Rc::clone(&self.inner), id })
    }

    /// Queries the capability records of one filter into a fixed-size
    /// scratch array, returning the filled prefix.
    fn query_filter_caps<T: Copy>(
        &self,
        context: &VaContext,
        filter: i32,
        scratch: &mut [T],
    ) -> Result<usize, CapError> {
        let mut num = scratch.len() as c_uint;
        check(unsafe {
            ffi::vaQueryVideoProcFilterCaps(
                self.handle(),
                context.id,
                filter,
                scratch.as_mut_ptr() as *mut c_void,
                &mut num,
            )
        })?;
        Ok((num as usize).min(scratch.len()))
    }
}

/// Transient probe configuration.
pub struct VaConfig {
    inner: Rc<DisplayInner>,
    id: ffi::VAConfigID,
}

impl Drop for VaConfig {
    fn drop(&mut self) {
        unsafe { ffi::vaDestroyConfig(self.inner.handle, self.id) };
    }
}

/// Transient processing context.
pub struct VaContext {
    inner: Rc<DisplayInner>,
    id: ffi::VAContextID,
}

impl Drop for VaContext {
    fn drop(&mut self) {
        unsafe { ffi::vaDestroyContext(self.inner.handle, self.id) };
    }
}

/// Device-side filter parameter buffer.
pub struct VaBuffer {
    inner: Rc<DisplayInner>,
    id: ffi::VABufferID,
}

impl Drop for VaBuffer {
    fn drop(&mut self) {
        unsafe { ffi::vaDestroyBuffer(self.inner.handle, self.id) };
    }
}

fn range_from(range: &ffi::VAProcFilterValueRange) -> CapRange {
    CapRange {
        min_value: f64::from(range.min_value),
        max_value: f64::from(range.max_value),
        default_value: f64::from(range.default_value),
        step: f64::from(range.step),
    }
}

impl CapSource for VaDisplay {
    type Config = VaConfig;
    type Context = VaContext;
    type FilterParamsBuffer = VaBuffer;

    fn version(&self) -> ApiVersion {
        self.inner.version
    }

    fn vendor_string(&self) -> Option<String> {
        let vendor = unsafe { ffi::vaQueryVendorString(self.handle()) };
        if vendor.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(vendor) }.to_string_lossy().into_owned())
    }

    fn profiles(&self) -> Result<Vec<i32>, CapError> {
        let max = unsafe { ffi::vaMaxNumProfiles(self.handle()) }.max(0) as usize;
        let mut profiles = vec![0 as c_int; max];
        let mut num: c_int = 0;
        check(unsafe {
            ffi::vaQueryConfigProfiles(self.handle(), profiles.as_mut_ptr(), &mut num)
        })?;
        profiles.truncate(num.max(0) as usize);
        Ok(profiles)
    }

    fn entrypoints(&self, profile: i32) -> Result<Vec<i32>, CapError> {
        let max = unsafe { ffi::vaMaxNumEntrypoints(self.handle()) }.max(0) as usize;
        let mut entrypoints = vec![0 as c_int; max];
        let mut num: c_int = 0;
        check(unsafe {
            ffi::vaQueryConfigEntrypoints(
                self.handle(),
                profile,
                entrypoints.as_mut_ptr(),
                &mut num,
            )
        })?;
        entrypoints.truncate(num.max(0) as usize);
        Ok(entrypoints)
    }

    fn config_attributes(
        &self,
        profile: i32,
        entrypoint: i32,
    ) -> Result<Vec<ConfigAttribute>, CapError> {
        // Probe every kind at once; unsupported ones come back flagged.
        let mut attribs: Vec<ffi::VAConfigAttrib> = (0..ATTRIB_TYPE_MAX)
            .map(|kind| ffi::VAConfigAttrib { type_: kind, value: 0 })
            .collect();
        check(unsafe {
            ffi::vaGetConfigAttributes(
                self.handle(),
                profile,
                entrypoint,
                attribs.as_mut_ptr(),
                attribs.len() as c_int,
            )
        })?;
        Ok(attribs
            .iter()
            .map(|attr| ConfigAttribute { kind: attr.type_, value: attr.value })
            .collect())
    }

    fn create_config(
        &self,
        profile: i32,
        entrypoint: i32,
        rt_format: u32,
    ) -> Result<VaConfig, CapError> {
        let mut attrib = ffi::VAConfigAttrib { type_: ATTRIB_RT_FORMAT, value: rt_format };
        let mut id: ffi::VAConfigID = ffi::VA_INVALID_ID;
        check(unsafe {
            ffi::vaCreateConfig(self.handle(), profile, entrypoint, &mut attrib, 1, &mut id)
        })?;
        Ok(VaConfig { inner: Rc::clone(&self.inner), id })
    }

    fn surface_attributes(&self, config: &VaConfig) -> Result<Vec<SurfaceAttribute>, CapError> {
        let mut num: c_uint = 0;
        check(unsafe {
            ffi::vaQuerySurfaceAttributes(
                self.handle(),
                config.id,
                std::ptr::null_mut(),
                &mut num,
            )
        })?;
        let mut raw: Vec<ffi::VASurfaceAttrib> =
            vec![unsafe { std::mem::zeroed() }; num as usize];
        check(unsafe {
            ffi::vaQuerySurfaceAttributes(self.handle(), config.id, raw.as_mut_ptr(), &mut num)
        })?;
        raw.truncate(num as usize);

        let mut attributes = Vec::with_capacity(raw.len());
        for attr in &raw {
            let value = match attr.value.type_ {
                ffi::VA_GENERIC_VALUE_TYPE_INTEGER => {
                    SurfaceValue::Integer(i64::from(unsafe { attr.value.value.i }))
                }
                ffi::VA_GENERIC_VALUE_TYPE_POINTER
                    if attr.type_ == SURFACE_ATTRIB_DRM_FORMAT_MODIFIERS =>
                {
                    let p = unsafe { attr.value.value.p };
                    if p.is_null() {
                        continue;
                    }
                    let list = unsafe { &*(p as *const ffi::VADRMFormatModifierList) };
                    let modifiers = unsafe {
                        std::slice::from_raw_parts(list.modifiers, list.num_modifiers as usize)
                    };
                    SurfaceValue::Modifiers(modifiers.to_vec())
                }
                _ => continue,
            };
            attributes.push(SurfaceAttribute { kind: attr.type_, value });
        }
        Ok(attributes)
    }

    fn create_context(
        &self,
        config: &VaConfig,
        width: u32,
        height: u32,
    ) -> Result<VaContext, CapError> {
        let mut id: ffi::VAContextID = ffi::VA_INVALID_ID;
        check(unsafe {
            ffi::vaCreateContext(
                self.handle(),
                config.id,
                width as c_int,
                height as c_int,
                0,
                std::ptr::null_mut(),
                0,
                &mut id,
            )
        })?;
        Ok(VaContext { inner: Rc::clone(&self.inner), id })
    }

    fn filters(&self, context: &VaContext) -> Result<Vec<i32>, CapError> {
        let mut filters = [0 as c_int; 16];
        let mut num = filters.len() as c_uint;
        check(unsafe {
            ffi::vaQueryVideoProcFilters(self.handle(), context.id, filters.as_mut_ptr(), &mut num)
        })?;
        Ok(filters[..(num as usize).min(filters.len())].to_vec())
    }

    fn filter_caps(&self, context: &VaContext, filter: i32) -> Result<FilterCaps, CapError> {
        match filter {
            FILTER_DEINTERLACING => {
                let mut caps =
                    [unsafe { std::mem::zeroed::<ffi::VAProcFilterCapDeinterlacing>() }; 8];
                let n = self.query_filter_caps(context, filter, &mut caps)?;
                Ok(FilterCaps::Deinterlacing(caps[..n].iter().map(|c| c.type_).collect()))
            }
            FILTER_COLOR_BALANCE => {
                let mut caps =
                    [unsafe { std::mem::zeroed::<ffi::VAProcFilterCapColorBalance>() }; 16];
                let n = self.query_filter_caps(context, filter, &mut caps)?;
                Ok(FilterCaps::ColorBalance(
                    caps[..n].iter().map(|c| (c.type_, range_from(&c.range))).collect(),
                ))
            }
            FILTER_TOTAL_COLOR_CORRECTION => {
                let mut caps = [unsafe {
                    std::mem::zeroed::<ffi::VAProcFilterCapTotalColorCorrection>()
                }; 16];
                let n = self.query_filter_caps(context, filter, &mut caps)?;
                Ok(FilterCaps::TotalColorCorrection(
                    caps[..n].iter().map(|c| (c.type_, range_from(&c.range))).collect(),
                ))
            }
            FILTER_HDR_TONE_MAPPING => {
                let mut caps =
                    [unsafe { std::mem::zeroed::<ffi::VAProcFilterCapHighDynamicRange>() }; 4];
                let n = self.query_filter_caps(context, filter, &mut caps)?;
                Ok(FilterCaps::HdrToneMapping(
                    caps[..n].iter().map(|c| (c.metadata_type, c.caps_flag)).collect(),
                ))
            }
            FILTER_3DLUT => {
                let mut caps = [unsafe { std::mem::zeroed::<ffi::VAProcFilterCap3DLUT>() }; 16];
                let n = self.query_filter_caps(context, filter, &mut caps)?;
                Ok(FilterCaps::Lut3d(
                    caps[..n]
                        .iter()
                        .map(|c| Lut3dCap {
                            lut_size: c.lut_size,
                            lut_stride: c.lut_stride,
                            bit_depth: c.bit_depth,
                            num_channel: c.num_channel,
                            channel_mapping: c.channel_mapping,
                        })
                        .collect(),
                ))
            }
            // The value filters, and any filter kind newer than this build.
            // Drivers answer the generic range query for the latter, which
            // keeps forward compatibility.
            _ => {
                let mut caps = [unsafe { std::mem::zeroed::<ffi::VAProcFilterCap>() }; 1];
                let n = self.query_filter_caps(context, filter, &mut caps)?;
                if n == 0 {
                    return Ok(FilterCaps::None);
                }
                Ok(FilterCaps::Range(range_from(&caps[0].range)))
            }
        }
    }

    fn create_filter_params(
        &self,
        context: &VaContext,
        filter: i32,
        params: &FilterParams,
    ) -> Result<VaBuffer, CapError> {
        match params {
            FilterParams::Value(value) => {
                let mut buf = ffi::VAProcFilterParameterBuffer {
                    type_: filter,
                    value: *value as f32,
                    va_reserved: [0; 4],
                };
                self.create_buffer(
                    context,
                    &mut buf as *mut _ as *mut c_void,
                    std::mem::size_of_val(&buf),
                    1,
                )
            }
            FilterParams::Deinterlacing { algorithm } => {
                let mut buf = ffi::VAProcFilterParameterBufferDeinterlacing {
                    type_: filter,
                    algorithm: *algorithm,
                    flags: 0,
                    va_reserved: [0; 4],
                };
                self.create_buffer(
                    context,
                    &mut buf as *mut _ as *mut c_void,
                    std::mem::size_of_val(&buf),
                    1,
                )
            }
            FilterParams::ColorBalance(entries) => {
                let mut bufs: Vec<ffi::VAProcFilterParameterBufferColorBalance> = entries
                    .iter()
                    .map(|(attrib, value)| ffi::VAProcFilterParameterBufferColorBalance {
                        type_: filter,
                        attrib: *attrib,
                        value: *value as f32,
                        va_reserved: [0; 4],
                    })
                    .collect();
                self.create_buffer(
                    context,
                    bufs.as_mut_ptr() as *mut c_void,
                    std::mem::size_of::<ffi::VAProcFilterParameterBufferColorBalance>(),
                    bufs.len(),
                )
            }
            FilterParams::TotalColorCorrection(entries) => {
                let mut bufs: Vec<ffi::VAProcFilterParameterBufferTotalColorCorrection> = entries
                    .iter()
                    .map(|(attrib, value)| {
                        ffi::VAProcFilterParameterBufferTotalColorCorrection {
                            type_: filter,
                            attrib: *attrib,
                            value: *value as f32,
                        }
                    })
                    .collect();
                self.create_buffer(
                    context,
                    bufs.as_mut_ptr() as *mut c_void,
                    std::mem::size_of::<ffi::VAProcFilterParameterBufferTotalColorCorrection>(),
                    bufs.len(),
                )
            }
            FilterParams::HvsNoiseReduction { qp, strength } => {
                let mut buf = ffi::VAProcFilterParameterBufferHVSNoiseReduction {
                    type_: filter,
                    qp: *qp,
                    strength: *strength,
                    va_reserved: [0; 16],
                };
                self.create_buffer(
                    context,
                    &mut buf as *mut _ as *mut c_void,
                    std::mem::size_of_val(&buf),
                    1,
                )
            }
            FilterParams::Hdr10 => {
                // Representative HDR10 mastering metadata; the driver only
                // needs plausible values to size the pipeline.
                let mut metadata = ffi::VAHdrMetaDataHDR10 {
                    display_primaries_x: [13245, 7500, 34000],
                    display_primaries_y: [34500, 3000, 16000],
                    white_point_x: 15635,
                    white_point_y: 15635,
                    max_display_mastering_luminance: 10_000_000,
                    min_display_mastering_luminance: 10,
                    max_content_light_level: 0,
                    max_pic_average_light_level: 0,
                    reserved: [0; 16],
                };
                let mut buf = ffi::VAProcFilterParameterBufferHDRToneMapping {
                    type_: filter,
                    data: ffi::VAHdrMetaData {
                        metadata_type: HDR_METADATA_HDR10 as u32,
                        metadata: &mut metadata as *mut _ as *mut c_void,
                        metadata_size: std::mem::size_of_val(&metadata) as u32,
                        reserved: [0; 4],
                    },
                    va_reserved: [0; 16],
                };
                self.create_buffer(
                    context,
                    &mut buf as *mut _ as *mut c_void,
                    std::mem::size_of_val(&buf),
                    1,
                )
            }
            FilterParams::Lut3d(cap) => {
                let mut buf = ffi::VAProcFilterParameterBuffer3DLUT {
                    type_: filter,
                    lut_surface: ffi::VA_INVALID_ID,
                    lut_size: cap.lut_size,
                    lut_stride: cap.lut_stride,
                    bit_depth: cap.bit_depth,
                    num_channel: cap.num_channel,
                    // Probe with the lowest supported mapping only.
                    channel_mapping: cap.channel_mapping & cap.channel_mapping.wrapping_neg(),
                    va_reserved: [0; 16],
                };
                self.create_buffer(
                    context,
                    &mut buf as *mut _ as *mut c_void,
                    std::mem::size_of_val(&buf),
                    1,
                )
            }
        }
    }

    fn pipeline_caps(
        &self,
        context: &VaContext,
        params: Option<&VaBuffer>,
    ) -> Result<PipelineCaps, CapError> {
        const MAX_COLOR_STANDARDS: usize = 32;
        const MAX_PIXEL_FORMATS: usize = 64;
        let mut input_cs = [0 as c_int; MAX_COLOR_STANDARDS];
        let mut output_cs = [0 as c_int; MAX_COLOR_STANDARDS];
        let mut input_formats = [0u32; MAX_PIXEL_FORMATS];
        let mut output_formats = [0u32; MAX_PIXEL_FORMATS];

        let mut raw: ffi::VAProcPipelineCaps = unsafe { std::mem::zeroed() };
        raw.input_color_standards = input_cs.as_mut_ptr();
        raw.num_input_color_standards = MAX_COLOR_STANDARDS as u32;
        raw.output_color_standards = output_cs.as_mut_ptr();
        raw.num_output_color_standards = MAX_COLOR_STANDARDS as u32;
        raw.input_pixel_formats = input_formats.as_mut_ptr();
        raw.num_input_pixel_formats = MAX_PIXEL_FORMATS as u32;
        raw.output_pixel_formats = output_formats.as_mut_ptr();
        raw.num_output_pixel_formats = MAX_PIXEL_FORMATS as u32;

        let mut filter_ids: Vec<ffi::VABufferID> = params.iter().map(|b| b.id).collect();
        check(unsafe {
            ffi::vaQueryVideoProcPipelineCaps(
                self.handle(),
                context.id,
                filter_ids.as_mut_ptr(),
                filter_ids.len() as c_uint,
                &mut raw,
            )
        })?;

        let take_cs = |buf: &[c_int], num: u32| -> Vec<i32> {
            buf[..(num as usize).min(MAX_COLOR_STANDARDS)].to_vec()
        };
        let take_formats = |buf: &[u32], num: u32| -> Vec<Fourcc> {
            buf[..(num as usize).min(MAX_PIXEL_FORMATS)].iter().map(|&f| Fourcc(f)).collect()
        };
        Ok(PipelineCaps {
            pipeline_flags: raw.pipeline_flags,
            filter_flags: raw.filter_flags,
            num_forward_references: raw.num_forward_references,
            num_backward_references: raw.num_backward_references,
            input_color_standards: take_cs(&input_cs, raw.num_input_color_standards),
            output_color_standards: take_cs(&output_cs, raw.num_output_color_standards),
            rotation_flags: raw.rotation_flags,
            blend_flags: raw.blend_flags,
            mirror_flags: raw.mirror_flags,
            num_additional_outputs: raw.num_additional_outputs,
            input_pixel_formats: take_formats(&input_formats, raw.num_input_pixel_formats),
            output_pixel_formats: take_formats(&output_formats, raw.num_output_pixel_formats),
            max_input_width: raw.max_input_width,
            max_input_height: raw.max_input_height,
            min_input_width: raw.min_input_width,
            min_input_height: raw.min_input_height,
            max_output_width: raw.max_output_width,
            max_output_height: raw.max_output_height,
            min_output_width: raw.min_output_width,
            min_output_height: raw.min_output_height,
        })
    }

    fn image_formats(&self) -> Result<Vec<ImageFormat>, CapError> {
        let max = unsafe { ffi::vaMaxNumImageFormats(self.handle()) }.max(0) as usize;
        let mut raw: Vec<ffi::VAImageFormat> = vec![unsafe { std::mem::zeroed() }; max];
        let mut num: c_int = 0;
        check(unsafe { ffi::vaQueryImageFormats(self.handle(), raw.as_mut_ptr(), &mut num) })?;
        raw.truncate(num.max(0) as usize);
        Ok(raw.iter().map(image_format_from).collect())
    }

    fn subpicture_formats(&self) -> Result<Vec<SubpictureFormat>, CapError> {
        let max = unsafe { ffi::vaMaxNumSubpictureFormats(self.handle()) } as usize;
        let mut raw: Vec<ffi::VAImageFormat> = vec![unsafe { std::mem::zeroed() }; max];
        let mut flags = vec![0 as c_uint; max];
        let mut num: c_uint = 0;
        check(unsafe {
            ffi::vaQuerySubpictureFormats(
                self.handle(),
                raw.as_mut_ptr(),
                flags.as_mut_ptr(),
                &mut num,
            )
        })?;
        let count = (num as usize).min(max);
        Ok(raw[..count]
            .iter()
            .zip(&flags[..count])
            .map(|(format, &flags)| SubpictureFormat {
                format: image_format_from(format),
                flags,
            })
            .collect())
    }
}

fn image_format_from(raw: &ffi::VAImageFormat) -> ImageFormat {
    ImageFormat {
        fourcc: Fourcc(raw.fourcc),
        byte_order: raw.byte_order,
        bits_per_pixel: raw.bits_per_pixel,
        depth: raw.depth,
        red_mask: raw.red_mask,
        green_mask: raw.green_mask,
        blue_mask: raw.blue_mask,
        alpha_mask: raw.alpha_mask,
    }
}
