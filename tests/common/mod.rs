//! Shared test utilities for acadview integration tests.
//!
//! [`DxfBuilder`] writes DXF text section by section so each test states
//! only the records it cares about.

#![allow(dead_code)]

use acadview::io::dxf::{DxfReader, DxfReaderConfiguration};
use acadview::CadDocument;

/// Builds DXF text from group code/value pairs
#[derive(Debug, Default, Clone)]
pub struct DxfBuilder {
    text: String,
}

impl DxfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one pair, with the code right-aligned as AutoCAD writes it
    pub fn pair(mut self, code: i32, value: impl std::fmt::Display) -> Self {
        self.text.push_str(&format!("{code:>3}\n{value}\n"));
        self
    }

    /// Append several pairs
    pub fn pairs(mut self, pairs: &[(i32, &str)]) -> Self {
        for (code, value) in pairs {
            self = self.pair(*code, value);
        }
        self
    }

    pub fn begin_section(self, name: &str) -> Self {
        self.pair(0, "SECTION").pair(2, name)
    }

    pub fn end_section(self) -> Self {
        self.pair(0, "ENDSEC")
    }

    pub fn header(self, version: &str) -> Self {
        self.begin_section("HEADER")
            .pair(9, "$ACADVER")
            .pair(1, version)
            .end_section()
    }

    pub fn layer(self, name: &str, color: i16, flags: i16) -> Self {
        self.pair(0, "LAYER")
            .pair(2, name)
            .pair(70, flags)
            .pair(62, color)
            .pair(6, "CONTINUOUS")
    }

    pub fn line(self, layer: &str, start: (f64, f64), end: (f64, f64)) -> Self {
        self.pair(0, "LINE")
            .pair(8, layer)
            .pair(10, start.0)
            .pair(20, start.1)
            .pair(30, 0.0)
            .pair(11, end.0)
            .pair(21, end.1)
            .pair(31, 0.0)
    }

    pub fn circle(self, layer: &str, center: (f64, f64), radius: f64) -> Self {
        self.pair(0, "CIRCLE")
            .pair(8, layer)
            .pair(10, center.0)
            .pair(20, center.1)
            .pair(40, radius)
    }

    pub fn insert(self, block: &str, at: (f64, f64), scale: (f64, f64), rotation: f64) -> Self {
        self.pair(0, "INSERT")
            .pair(8, "0")
            .pair(2, block)
            .pair(10, at.0)
            .pair(20, at.1)
            .pair(41, scale.0)
            .pair(42, scale.1)
            .pair(50, rotation)
    }

    pub fn begin_block(self, name: &str, base: (f64, f64)) -> Self {
        self.pair(0, "BLOCK")
            .pair(8, "0")
            .pair(2, name)
            .pair(70, 0)
            .pair(10, base.0)
            .pair(20, base.1)
            .pair(3, name)
    }

    pub fn end_block(self) -> Self {
        self.pair(0, "ENDBLK").pair(8, "0")
    }

    pub fn eof(self) -> Self {
        self.pair(0, "EOF")
    }

    pub fn build(self) -> String {
        self.text
    }
}

/// Read DXF text in strict mode
pub fn read(text: &str) -> CadDocument {
    DxfReader::from_str(text)
        .read()
        .unwrap_or_else(|e| panic!("DXF should parse: {e}"))
}

/// Read DXF text in failsafe mode
pub fn read_failsafe(text: &str) -> CadDocument {
    let config = DxfReaderConfiguration {
        failsafe: true,
        ..Default::default()
    };
    DxfReader::from_str(text)
        .with_configuration(config)
        .read()
        .unwrap_or_else(|e| panic!("failsafe read should not fail: {e}"))
}

/// Route `tracing` output to the test harness, once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn approx(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}
