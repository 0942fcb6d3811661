//! DXF file version ($ACADVER)

use std::fmt;

/// AutoCAD drawing database version, ordered oldest to newest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DxfVersion {
    /// Version string missing or unrecognized
    #[default]
    Unknown,
    /// R11/R12
    AC1009,
    /// R13
    AC1012,
    /// R14
    AC1014,
    /// AutoCAD 2000
    AC1015,
    /// AutoCAD 2004
    AC1018,
    /// AutoCAD 2007, the first release writing UTF-8 DXF
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1027,
    /// AutoCAD 2018
    AC1032,
}

impl DxfVersion {
    /// Parse a `$ACADVER` value such as `AC1015`
    pub fn from_version_string(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "AC1006" | "AC1009" => DxfVersion::AC1009,
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => DxfVersion::Unknown,
        }
    }

    /// Whether text in this version is stored in a legacy code page
    /// rather than UTF-8
    pub fn uses_code_page(&self) -> bool {
        *self != DxfVersion::Unknown && *self < DxfVersion::AC1021
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DxfVersion::Unknown => "Unknown",
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        };
        f.write_str(name)
    }
}
