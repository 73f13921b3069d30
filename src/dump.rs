// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Capability tree traversal.
//!
//! `CapsDumper` walks everything one display exposes, profile by profile,
//! and streams the findings into a [`Report`]. A query that fails mid-walk
//! truncates its own subtree and is logged; nothing past display
//! initialization aborts the walk.

use std::io::Write;

use log::error;

use crate::attributes::{self, AttributeDecoders, ATTRIB_RT_FORMAT};
use crate::device::{CapSource, FilterCaps, ImageFormat, ATTRIB_NOT_SUPPORTED};
use crate::report::Report;
use crate::symbols::{
    lookup, SymbolTables, ENTRYPOINT_VIDEO_PROC, FILTER_HVS_NOISE_REDUCTION, FILTER_NONE,
    PROFILE_NONE,
};
use crate::vpp;

/// Size of the transient context used to probe processing filters.
const PROBE_WIDTH: u32 = 1280;
const PROBE_HEIGHT: u32 = 720;

/// Which parts of the capability tree to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections {
    pub profiles: bool,
    pub entrypoints: bool,
    pub attributes: bool,
    pub surface_formats: bool,
    pub filters: bool,
    pub filter_caps: bool,
    pub pipeline_caps: bool,
    pub image_formats: bool,
    pub subpicture_formats: bool,
}

impl Sections {
    pub fn all() -> Sections {
        Sections {
            profiles: true,
            entrypoints: true,
            attributes: true,
            surface_formats: true,
            filters: true,
            filter_caps: true,
            pipeline_caps: true,
            image_formats: true,
            subpicture_formats: true,
        }
    }

    pub fn any(&self) -> bool {
        *self != Sections::default()
    }

    /// Inner sections only render inside their enclosing ones, so asking for
    /// a leaf switches its ancestors on as well.
    pub fn with_implied(mut self) -> Sections {
        if self.filter_caps || self.pipeline_caps {
            self.filters = true;
        }
        if self.attributes || self.surface_formats || self.filters {
            self.entrypoints = true;
        }
        if self.entrypoints {
            self.profiles = true;
        }
        self
    }
}

/// Streams the capability tree of one source into a report.
pub struct CapsDumper<'a, S: CapSource, W: Write> {
    source: &'a S,
    tables: SymbolTables,
    decoders: AttributeDecoders<W>,
    sections: Sections,
}

impl<'a, S: CapSource, W: Write> CapsDumper<'a, S, W> {
    pub fn new(source: &'a S, sections: Sections) -> CapsDumper<'a, S, W> {
        let version = source.version();
        CapsDumper {
            source,
            tables: SymbolTables::new(version),
            decoders: AttributeDecoders::new(version),
            sections: sections.with_implied(),
        }
    }

    /// Walks the whole tree. Every failed query logs and truncates its own
    /// subtree, so the report always closes well nested.
    pub fn dump(&self, report: &mut Report<W>) {
        report.begin_object(None);

        report.begin_object(Some("api_version"));
        report.write_integer(Some("major"), i64::from(crate::TARGET_API_VERSION.major));
        report.write_integer(Some("minor"), i64::from(crate::TARGET_API_VERSION.minor));
        report.write_integer(Some("micro"), i64::from(crate::TARGET_API_VERSION.micro));
        report.end_object();

        let runtime = self.source.version();
        report.begin_object(Some("driver_version"));
        report.write_integer(Some("major"), i64::from(runtime.major));
        report.write_integer(Some("minor"), i64::from(runtime.minor));
        report.end_object();
        let vendor = self.source.vendor_string();
        report.write_string(Some("driver_vendor"), vendor.as_deref().unwrap_or("unknown"));

        if self.sections.profiles {
            match self.source.profiles() {
                Ok(profiles) => {
                    report.begin_array(Some("profiles"));
                    for profile in profiles {
                        self.dump_profile(report, profile);
                    }
                    report.end_array();
                }
                Err(e) => error!("Failed to enumerate profiles: {e}"),
            }
        }
        if self.sections.image_formats {
            self.dump_image_formats(report);
        }
        if self.sections.subpicture_formats {
            self.dump_subpicture_formats(report);
        }

        report.end_object();
    }

    fn dump_profile(&self, report: &mut Report<W>, profile: i32) {
        report.begin_object(None);
        report.write_integer(Some("profile"), i64::from(profile));
        match self.tables.profile(profile) {
            Some(symbol) => {
                report.write_string(Some("name"), symbol.name);
                report.write_string(Some("description"), symbol.description);
            }
            None => report.write_string(Some("name"), "unknown"),
        }

        if self.sections.entrypoints {
            match self.source.entrypoints(profile) {
                Ok(entrypoints) => {
                    report.begin_array(Some("entrypoints"));
                    for entrypoint in entrypoints {
                        self.dump_entrypoint(report, profile, entrypoint);
                    }
                    report.end_array();
                }
                Err(e) => error!("Failed to enumerate entry points of profile {profile}: {e}"),
            }
        }
        report.end_object();
    }

    fn dump_entrypoint(&self, report: &mut Report<W>, profile: i32, entrypoint: i32) {
        report.begin_object(None);
        report.write_integer(Some("entrypoint"), i64::from(entrypoint));
        match self.tables.entrypoint(entrypoint) {
            Some(symbol) => {
                report.write_string(Some("name"), symbol.name);
                report.write_string(Some("description"), symbol.description);
            }
            None => report.write_string(Some("name"), "unknown"),
        }

        // The render-target format mask steers both the surface format
        // probes and whether processing filters exist at all.
        let mut rt_formats = 0u32;
        match self.source.config_attributes(profile, entrypoint) {
            Ok(attrs) => {
                for attr in &attrs {
                    if attr.kind == ATTRIB_RT_FORMAT && attr.value != ATTRIB_NOT_SUPPORTED {
                        rt_formats = attr.value;
                    }
                }
                if self.sections.attributes {
                    report.begin_object(Some("attributes"));
                    for attr in &attrs {
                        if attr.value != ATTRIB_NOT_SUPPORTED {
                            self.decoders.decode(attr.kind, attr.value, report, &self.tables);
                        }
                    }
                    report.end_object();
                }
            }
            Err(e) => error!(
                "Failed to query attributes of profile {profile} entry point {entrypoint}: {e}"
            ),
        }

        if self.sections.surface_formats && rt_formats != 0 {
            self.dump_surface_formats(report, profile, entrypoint, rt_formats);
        }
        if self.sections.filters && entrypoint == ENTRYPOINT_VIDEO_PROC && rt_formats != 0 {
            self.dump_filters(report, rt_formats);
        }
        report.end_object();
    }

    fn dump_surface_formats(
        &self,
        report: &mut Report<W>,
        profile: i32,
        entrypoint: i32,
        rt_formats: u32,
    ) {
        report.begin_array(Some("surface_formats"));
        for bit in 0..u32::BITS {
            let rt_format = rt_formats & (1 << bit);
            if rt_format == 0 {
                continue;
            }
            let config = match self.source.create_config(profile, entrypoint, rt_format) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to create config for render target {rt_format:#x}: {e}");
                    continue;
                }
            };
            match self.source.surface_attributes(&config) {
                Ok(attrs) => {
                    attributes::write_surface_attributes(report, &self.tables, rt_format, &attrs)
                }
                Err(e) => {
                    error!("Failed to query surface attributes for {rt_format:#x}: {e}")
                }
            }
        }
        report.end_array();
    }

    fn dump_filters(&self, report: &mut Report<W>, rt_formats: u32) {
        let config =
            match self.source.create_config(PROFILE_NONE, ENTRYPOINT_VIDEO_PROC, rt_formats) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to create processing config: {e}");
                    return;
                }
            };
        let context = match self.source.create_context(&config, PROBE_WIDTH, PROBE_HEIGHT) {
            Ok(context) => context,
            Err(e) => {
                error!("Failed to create processing context: {e}");
                return;
            }
        };
        let mut filters = match self.source.filters(&context) {
            Ok(filters) => filters,
            Err(e) => {
                error!("Failed to enumerate processing filters: {e}");
                return;
            }
        };
        // Every driver accepts an empty filter chain, but none report it.
        if filters.first() != Some(&FILTER_NONE) {
            filters.insert(0, FILTER_NONE);
        }

        report.begin_array(Some("filters"));
        for filter in filters {
            self.dump_filter(report, &context, filter);
        }
        report.end_array();
    }

    fn dump_filter(&self, report: &mut Report<W>, context: &S::Context, filter: i32) {
        report.begin_object(None);
        report.write_integer(Some("filter"), i64::from(filter));
        let name = lookup(&self.tables.filters, filter).unwrap_or("unknown");
        report.write_string(Some("name"), name);

        // The empty chain has no capability structure, and HVS noise
        // reduction defines none either.
        let caps = if filter == FILTER_NONE || filter == FILTER_HVS_NOISE_REDUCTION {
            FilterCaps::None
        } else {
            match self.source.filter_caps(context, filter) {
                Ok(caps) => caps,
                Err(e) => {
                    error!("Failed to query capabilities of filter {filter}: {e}");
                    report.end_object();
                    return;
                }
            }
        };
        if self.sections.filter_caps {
            vpp::write_filter_caps(report, &self.tables, &caps);
        }

        if self.sections.pipeline_caps {
            let buffer = match vpp::default_filter_params(filter, &caps) {
                Some(params) => {
                    match self.source.create_filter_params(context, filter, &params) {
                        Ok(buffer) => Some(buffer),
                        Err(e) => {
                            error!("Failed to build parameters for filter {filter}: {e}");
                            report.end_object();
                            return;
                        }
                    }
                }
                None if filter == FILTER_NONE => None,
                // Nothing usable to probe the pipeline with.
                None => {
                    report.end_object();
                    return;
                }
            };
            match self.source.pipeline_caps(context, buffer.as_ref()) {
                Ok(pipeline) => vpp::write_pipeline_caps(report, &self.tables, &pipeline),
                Err(e) => error!("Failed to query pipeline for filter {filter}: {e}"),
            }
        }
        report.end_object();
    }

    fn dump_image_formats(&self, report: &mut Report<W>) {
        let formats = match self.source.image_formats() {
            Ok(formats) => formats,
            Err(e) => {
                error!("Failed to query image formats: {e}");
                return;
            }
        };
        report.begin_array(Some("image_formats"));
        for format in &formats {
            report.begin_object(None);
            write_image_format(report, format);
            report.end_object();
        }
        report.end_array();
    }

    fn dump_subpicture_formats(&self, report: &mut Report<W>) {
        let formats = match self.source.subpicture_formats() {
            Ok(formats) => formats,
            Err(e) => {
                error!("Failed to query subpicture formats: {e}");
                return;
            }
        };
        report.begin_array(Some("subpicture_formats"));
        for subpicture in &formats {
            report.begin_object(None);
            write_image_format(report, &subpicture.format);
            let flag_table = &self.tables.subpicture_flags;
            attributes::write_flags(report, "flags", subpicture.flags, flag_table);
            report.end_object();
        }
        report.end_array();
    }
}

fn write_image_format<W: Write>(report: &mut Report<W>, format: &ImageFormat) {
    report.write_string(Some("fourcc"), &format.fourcc.to_string());
    let byte_order = match format.byte_order {
        1 => "LE",
        2 => "BE",
        _ => "unknown",
    };
    report.write_string(Some("byte_order"), byte_order);
    report.write_integer(Some("bits_per_pixel"), i64::from(format.bits_per_pixel));
    // RGB layouts carry a depth and channel masks, YUV ones leave them zero.
    if format.depth != 0 {
        report.write_integer(Some("depth"), i64::from(format.depth));
        report.write_integer(Some("red_mask"), i64::from(format.red_mask));
        report.write_integer(Some("green_mask"), i64::from(format.green_mask));
        report.write_integer(Some("blue_mask"), i64::from(format.blue_mask));
        report.write_integer(Some("alpha_mask"), i64::from(format.alpha_mask));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_sections_switch_on_their_ancestors() {
        let sections = Sections { pipeline_caps: true, ..Sections::default() };
        let implied = sections.with_implied();
        assert!(implied.filters && implied.entrypoints && implied.profiles);
        assert!(!implied.attributes);
        assert!(!implied.image_formats);
    }

    #[test]
    fn no_selection_is_detectable() {
        assert!(!Sections::default().any());
        assert!(Sections { image_formats: true, ..Sections::default() }.any());
    }
}
