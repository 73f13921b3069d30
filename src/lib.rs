// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! vacaps dumps everything a VA-API device will admit to supporting: decode,
//! encode and video-processing profiles, entry points, configuration
//! attributes, surface formats, processing filters and pipeline limits. The
//! report is a single JSON document written in one forward pass.
//!
//! The library side is hardware-free and fully testable: the traversal in
//! [`dump`] runs against any [`device::CapSource`]. The real device backend
//! lives in [`backend`] behind the `vaapi` feature.

use std::fmt;

pub mod attributes;
#[cfg(feature = "vaapi")]
pub mod backend;
pub mod device;
pub mod dump;
pub mod report;
pub mod symbols;
pub mod vpp;

/// A capability API revision, ordered lexicographically by
/// (major, minor, micro).
///
/// Symbol tables and attribute decoders are gated on the revision reported by
/// the driver at initialization time, so one binary serves every driver
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32, micro: u32) -> ApiVersion {
        ApiVersion { major, minor, micro }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// The API revision the symbol tables in this build were written against.
pub const TARGET_API_VERSION: ApiVersion = ApiVersion::new(1, 13, 0);

/// A four-character pixel format tag, stored in bitstream (little-endian)
/// byte order as VA reports it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fourcc(pub u32);

impl From<u32> for Fourcc {
    fn from(fourcc: u32) -> Fourcc {
        Fourcc(fourcc)
    }
}

impl From<&[u8; 4]> for Fourcc {
    fn from(n: &[u8; 4]) -> Fourcc {
        Fourcc(u32::from_le_bytes(*n))
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.to_le_bytes() {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fourcc({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_display() {
        assert_eq!(Fourcc::from(b"NV12").to_string(), "NV12");
        assert_eq!(Fourcc(u32::from_le_bytes(*b"I420")).to_string(), "I420");
        assert_eq!(Fourcc(0x01020304).to_string(), "????");
    }

    #[test]
    fn api_version_ordering() {
        assert!(ApiVersion::new(0, 39, 2) < ApiVersion::new(0, 39, 4));
        assert!(ApiVersion::new(0, 40, 0) < ApiVersion::new(1, 0, 0));
        assert!(ApiVersion::new(1, 2, 0) < ApiVersion::new(1, 13, 0));
    }
}
