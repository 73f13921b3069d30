// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Dumps everything a VA-API device can do as a JSON report on stdout.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use argh::FromArgs;

use vacaps::backend::vaapi::VaDisplay;
use vacaps::dump::{CapsDumper, Sections};
use vacaps::report::Report;

/// dump the capabilities of a VA-API device as JSON
#[derive(Debug, FromArgs)]
struct Args {
    /// DRM render node to open (default: /dev/dri/renderD128)
    #[argh(option, short = 'd', default = "PathBuf::from(\"/dev/dri/renderD128\")")]
    device: PathBuf,

    /// force a driver name instead of negotiating one
    #[argh(option, short = 'r')]
    driver: Option<String>,

    /// indent width of the pretty output (default: 4)
    #[argh(option, short = 'i', default = "4")]
    indent: usize,

    /// print compact JSON on a single line
    #[argh(switch, short = 'u')]
    ugly: bool,

    /// dump every section (the default when none is selected)
    #[argh(switch, short = 'a')]
    all: bool,

    /// dump codec profiles
    #[argh(switch, short = 'p')]
    profiles: bool,

    /// dump entry points
    #[argh(switch, short = 'e')]
    entrypoints: bool,

    /// dump configuration attributes
    #[argh(switch, short = 't')]
    attributes: bool,

    /// dump surface formats
    #[argh(switch, short = 's')]
    surface_formats: bool,

    /// dump video processing filters
    #[argh(switch, short = 'f')]
    filters: bool,

    /// dump filter capabilities
    #[argh(switch, short = 'c')]
    filter_caps: bool,

    /// dump pipeline capabilities
    #[argh(switch, short = 'l')]
    pipeline_caps: bool,

    /// dump image formats
    #[argh(switch, short = 'm')]
    image_formats: bool,

    /// dump subpicture formats
    #[argh(switch, short = 'b')]
    subpicture_formats: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut sections = Sections {
        profiles: args.profiles,
        entrypoints: args.entrypoints,
        attributes: args.attributes,
        surface_formats: args.surface_formats,
        filters: args.filters,
        filter_caps: args.filter_caps,
        pipeline_caps: args.pipeline_caps,
        image_formats: args.image_formats,
        subpicture_formats: args.subpicture_formats,
    };
    if args.all || !sections.any() {
        sections = Sections::all();
    }

    let display = VaDisplay::open(&args.device, args.driver.as_deref())
        .with_context(|| format!("failed to initialize {}", args.device.display()))?;

    let stdout = io::stdout().lock();
    let mut report =
        if args.ugly { Report::compact(stdout) } else { Report::pretty(stdout, args.indent) };
    CapsDumper::new(&display, sections).dump(&mut report);
    report.finish();
    Ok(())
}
