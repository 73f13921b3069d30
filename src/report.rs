// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Streaming JSON emitter.
//!
//! The report is written strictly top to bottom: nothing is buffered and
//! nothing written can be revisited. The only state is the nesting depth,
//! the formatting mode and whether the current container already holds a
//! value (which decides the comma). Malformed nesting from a caller is a
//! caller bug, not a runtime condition this layer recovers from.

use std::io::Write;

pub struct Report<W: Write> {
    out: W,
    depth: usize,
    indent: usize,
    pretty: bool,
    // Whether the current container already received a value, i.e. the next
    // value needs a comma first.
    has_value: bool,
}

impl<W: Write> Report<W> {
    /// An indented, human-readable report with `indent` spaces per level.
    pub fn pretty(out: W, indent: usize) -> Report<W> {
        Report { out, depth: 0, indent, pretty: true, has_value: false }
    }

    /// A report without any indentation or newlines.
    pub fn compact(out: W) -> Report<W> {
        Report { out, depth: 0, indent: 0, pretty: false, has_value: false }
    }

    pub fn begin_object(&mut self, tag: Option<&str>) {
        self.item_prefix(tag);
        self.raw("{");
        self.depth += 1;
        self.has_value = false;
    }

    pub fn end_object(&mut self) {
        self.close("}");
    }

    pub fn begin_array(&mut self, tag: Option<&str>) {
        self.item_prefix(tag);
        self.raw("[");
        self.depth += 1;
        self.has_value = false;
    }

    pub fn end_array(&mut self) {
        self.close("]");
    }

    pub fn write_integer(&mut self, tag: Option<&str>, value: i64) {
        self.item_prefix(tag);
        self.raw(&value.to_string());
    }

    pub fn write_double(&mut self, tag: Option<&str>, value: f64) {
        self.item_prefix(tag);
        self.raw(&value.to_string());
    }

    pub fn write_boolean(&mut self, tag: Option<&str>, value: bool) {
        self.item_prefix(tag);
        self.raw(if value { "true" } else { "false" });
    }

    pub fn write_string(&mut self, tag: Option<&str>, value: &str) {
        self.item_prefix(tag);
        self.quoted(value);
    }

    /// Terminates the report and returns the sink. All containers must be
    /// closed by this point.
    pub fn finish(mut self) -> W {
        if self.pretty {
            self.raw("\n");
        }
        self.out
    }

    fn item_prefix(&mut self, tag: Option<&str>) {
        if self.has_value {
            self.raw(",");
        }
        self.has_value = true;
        if self.pretty && self.depth > 0 {
            self.raw("\n");
            for _ in 0..self.depth * self.indent {
                self.raw(" ");
            }
        }
        if let Some(tag) = tag {
            self.quoted(tag);
            self.raw(if self.pretty { ": " } else { ":" });
        }
    }

    fn close(&mut self, delim: &str) {
        self.depth -= 1;
        if self.pretty && self.has_value {
            self.raw("\n");
            for _ in 0..self.depth * self.indent {
                self.raw(" ");
            }
        }
        self.raw(delim);
        self.has_value = true;
    }

    fn quoted(&mut self, s: &str) {
        self.raw("\"");
        for c in s.chars() {
            match c {
                '"' => self.raw("\\\""),
                '\\' => self.raw("\\\\"),
                c if (c as u32) < 0x20 => {
                    let escaped = format!("\\u{:04x}", c as u32);
                    self.raw(&escaped);
                }
                c => {
                    let mut buf = [0u8; 4];
                    self.raw(c.encode_utf8(&mut buf));
                }
            }
        }
        self.raw("\"");
    }

    fn raw(&mut self, s: &str) {
        // The sink is stdout or a test buffer; a write failure here leaves
        // nothing sensible to do but bail.
        self.out.write_all(s.as_bytes()).expect("report write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_sample<W: Write>(report: &mut Report<W>) {
        report.begin_object(None);
        report.write_integer(Some("id"), 7);
        report.begin_array(Some("names"));
        report.write_string(None, "A");
        report.write_string(None, "C");
        report.end_array();
        report.begin_object(Some("nested"));
        report.write_boolean(Some("flag"), true);
        report.write_double(Some("step"), 0.5);
        report.end_object();
        report.begin_array(Some("empty"));
        report.end_array();
        report.end_object();
    }

    #[test]
    fn pretty_output() {
        let mut report = Report::pretty(Vec::new(), 4);
        emit_sample(&mut report);
        let text = String::from_utf8(report.finish()).unwrap();
        let expected = "{\n\
                        \x20   \"id\": 7,\n\
                        \x20   \"names\": [\n\
                        \x20       \"A\",\n\
                        \x20       \"C\"\n\
                        \x20   ],\n\
                        \x20   \"nested\": {\n\
                        \x20       \"flag\": true,\n\
                        \x20       \"step\": 0.5\n\
                        \x20   },\n\
                        \x20   \"empty\": []\n\
                        }\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn compact_output() {
        let mut report = Report::compact(Vec::new());
        emit_sample(&mut report);
        let text = String::from_utf8(report.finish()).unwrap();
        let expected =
            r#"{"id":7,"names":["A","C"],"nested":{"flag":true,"step":0.5},"empty":[]}"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn output_is_valid_json() {
        let mut report = Report::pretty(Vec::new(), 2);
        emit_sample(&mut report);
        let text = String::from_utf8(report.finish()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["id"], 7);
        assert_eq!(parsed["names"][1], "C");
        assert_eq!(parsed["nested"]["flag"], true);
    }

    #[test]
    fn indentation_tracks_nesting_depth() {
        let mut report = Report::pretty(Vec::new(), 4);
        report.begin_object(None);
        report.begin_array(Some("a"));
        report.begin_object(None);
        report.write_integer(Some("x"), 1);
        report.end_object();
        report.end_array();
        report.end_object();
        let text = String::from_utf8(report.finish()).unwrap();
        let indents: Vec<usize> = text
            .lines()
            .map(|l| l.len() - l.trim_start().len())
            .collect();
        assert_eq!(indents, vec![0, 4, 8, 12, 8, 4, 0]);
    }

    #[test]
    fn string_escaping() {
        let mut report = Report::compact(Vec::new());
        report.begin_object(None);
        report.write_string(Some("vendor"), "a \"quoted\" \\ name\n");
        report.end_object();
        let text = String::from_utf8(report.finish()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["vendor"], "a \"quoted\" \\ name\n");
    }

    #[test]
    fn doubles_render_as_json_numbers() {
        let mut report = Report::compact(Vec::new());
        report.begin_array(None);
        report.write_double(None, 1.0);
        report.write_double(None, -0.25);
        report.end_array();
        let text = String::from_utf8(report.finish()).unwrap();
        assert_eq!(text, "[1,-0.25]");
    }
}
