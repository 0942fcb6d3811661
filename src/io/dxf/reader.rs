//! DXF file reader

pub mod entity_reader;
mod section_reader;
pub mod tokenizer;

pub use tokenizer::{decode_unicode_escapes, tokenize, tokens, DxfCodePair, PairReader};

use section_reader::SectionReader;

use super::code_page::{decode_with, encoding_from_code_page};
use crate::document::CadDocument;
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::DxfVersion;
use encoding_rs::Encoding;

/// First bytes of a binary DXF file
const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Configuration for the DXF reader.
#[derive(Debug, Clone)]
pub struct DxfReaderConfiguration {
    /// When `true`, errors within a section are reported as notifications
    /// and the reader moves on to the next section; invalid UTF-8 in a
    /// UTF-8 file is decoded lossily instead of failing.
    ///
    /// Default: `false` (strict mode, errors propagate).
    pub failsafe: bool,

    /// Encoding for pre-AC1021 text whose `$DWGCODEPAGE` is missing or not
    /// recognized.
    ///
    /// Default: Windows-1252.
    pub fallback_encoding: &'static Encoding,
}

impl Default for DxfReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: false,
            fallback_encoding: encoding_rs::WINDOWS_1252,
        }
    }
}

/// Input handed to [`DxfReader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DxfSource {
    /// Already decoded text
    Text(String),
    /// Raw file bytes; the encoding is detected from the header
    Bytes(Vec<u8>),
}

impl From<String> for DxfSource {
    fn from(text: String) -> Self {
        DxfSource::Text(text)
    }
}

impl From<&str> for DxfSource {
    fn from(text: &str) -> Self {
        DxfSource::Text(text.to_string())
    }
}

impl From<Vec<u8>> for DxfSource {
    fn from(bytes: Vec<u8>) -> Self {
        DxfSource::Bytes(bytes)
    }
}

impl From<&[u8]> for DxfSource {
    fn from(bytes: &[u8]) -> Self {
        DxfSource::Bytes(bytes.to_vec())
    }
}

/// DXF reader
///
/// ```
/// use acadview::io::dxf::DxfReader;
///
/// let text = "0\nSECTION\n2\nENTITIES\n0\nLINE\n8\n0\n10\n0\n20\n0\n11\n10\n21\n10\n0\nENDSEC\n0\nEOF\n";
/// let doc = DxfReader::from_str(text).read()?;
/// assert_eq!(doc.entity_count(), 1);
/// # Ok::<(), acadview::DxfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DxfReader {
    source: DxfSource,
    config: DxfReaderConfiguration,
}

impl DxfReader {
    /// Create a reader over decoded text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self::from_source(DxfSource::Text(text.to_string()))
    }

    /// Create a reader over raw file bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_source(DxfSource::Bytes(bytes.into()))
    }

    /// Create a reader over either kind of input
    pub fn from_source(source: DxfSource) -> Self {
        Self {
            source,
            config: DxfReaderConfiguration::default(),
        }
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the input and return a CadDocument
    pub fn read(self) -> Result<CadDocument> {
        let mut notifications = NotificationCollection::new();

        let text = match self.source {
            DxfSource::Text(text) => {
                if text.is_empty() {
                    return Err(DxfError::EmptyInput);
                }
                if text.as_bytes().starts_with(BINARY_SENTINEL) {
                    return Err(DxfError::BinaryDxfNotSupported);
                }
                text
            }
            DxfSource::Bytes(bytes) => {
                check_binary_input(&bytes)?;
                decode_bytes(&bytes, &self.config, &mut notifications)?
            }
        };

        // Escapes are expanded per value so an encoded line break cannot split a pair
        let mut pairs = tokenize(&text);
        for pair in pairs.iter_mut().filter(|p| p.value.contains('\\')) {
            pair.value = decode_unicode_escapes(&pair.value);
        }
        if pairs.is_empty() {
            return Err(DxfError::Tokenize {
                message: "input contains no group code/value pairs".to_string(),
            });
        }

        let mut document = CadDocument::new();
        document.notifications = notifications;
        read_sections(&pairs, &mut document, self.config.failsafe)?;

        document.finalize_layers();

        tracing::debug!(
            version = %document.header.version,
            entities = document.entities.len(),
            blocks = document.blocks.len(),
            layers = document.layers.len(),
            notifications = document.notifications.len(),
            "DXF document read"
        );
        Ok(document)
    }
}

/// Reject inputs that are not DXF text
fn check_binary_input(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(DxfError::EmptyInput);
    }
    if bytes.len() >= 6 && bytes.starts_with(b"AC1") && bytes[3..6].iter().all(u8::is_ascii_digit)
    {
        return Err(DxfError::DwgNotSupported {
            version: String::from_utf8_lossy(&bytes[..6]).into_owned(),
        });
    }
    if bytes.starts_with(BINARY_SENTINEL) {
        return Err(DxfError::BinaryDxfNotSupported);
    }
    Ok(())
}

/// Decode file bytes to text using the version and code page in the header
fn decode_bytes(
    bytes: &[u8],
    config: &DxfReaderConfiguration,
    notifications: &mut NotificationCollection,
) -> Result<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let (version, code_page) = prescan_header(&String::from_utf8_lossy(bytes));

    let legacy_encoding = |notifications: &mut NotificationCollection| -> &'static Encoding {
        match code_page.as_deref() {
            Some(name) => encoding_from_code_page(name).unwrap_or_else(|| {
                notifications.notify(
                    NotificationType::Warning,
                    format!(
                        "Unknown code page {name}, decoding as {}",
                        config.fallback_encoding.name()
                    ),
                );
                config.fallback_encoding
            }),
            None => config.fallback_encoding,
        }
    };

    if version.uses_code_page() {
        let encoding = legacy_encoding(notifications);
        tracing::debug!(%version, encoding = encoding.name(), "decoding legacy code page");
        let (text, had_errors) = decode_with(bytes, encoding);
        if had_errors {
            notifications.notify(
                NotificationType::Warning,
                format!("Malformed {} sequences were replaced", encoding.name()),
            );
        }
        return Ok(text);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(err) if version == DxfVersion::Unknown => {
            // Without a version, text that is not UTF-8 is taken as legacy
            let encoding = legacy_encoding(notifications);
            notifications.notify(
                NotificationType::Warning,
                format!(
                    "Input is not UTF-8 ({err}) and has no $ACADVER, decoding as {}",
                    encoding.name()
                ),
            );
            Ok(decode_with(bytes, encoding).0)
        }
        Err(err) if config.failsafe => {
            notifications.notify(
                NotificationType::Warning,
                format!("Invalid UTF-8 in {version} file replaced: {err}"),
            );
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        Err(err) => Err(DxfError::decode(
            format!("invalid UTF-8 in {version} file"),
            err,
        )),
    }
}

/// Find `$ACADVER` and `$DWGCODEPAGE` without tokenizing the whole file
fn prescan_header(text: &str) -> (DxfVersion, Option<String>) {
    let mut version = DxfVersion::Unknown;
    let mut code_page = None;
    let mut variable = String::new();

    for pair in tokens(text) {
        if pair.is_marker("ENDSEC") || pair.is_marker("EOF") {
            break;
        }
        match pair.code {
            9 => variable = pair.value.trim().to_string(),
            1 if variable == "$ACADVER" => {
                version = DxfVersion::from_version_string(&pair.value);
            }
            3 if variable == "$DWGCODEPAGE" => code_page = Some(pair.value.trim().to_string()),
            _ => {}
        }
    }
    (version, code_page)
}

/// Dispatch every SECTION to its reader until EOF
fn read_sections(
    pairs: &[DxfCodePair],
    document: &mut CadDocument,
    failsafe: bool,
) -> Result<()> {
    let mut reader = PairReader::new(pairs);

    while let Some(pair) = reader.read_pair() {
        if pair.is_marker("EOF") {
            break;
        }
        if !pair.is_marker("SECTION") {
            continue;
        }

        let name = match reader.peek() {
            Some(p) if p.code == 2 => {
                reader.read_pair();
                Some(p.value.trim().to_string())
            }
            _ => None,
        };

        let result = match name.as_deref() {
            None => Err(DxfError::section("SECTION", "SECTION marker without a name")),
            Some(name) => {
                tracing::debug!(section = name, position = reader.position(), "reading section");
                let mut section_reader = SectionReader::new(&mut reader);
                match name {
                    "HEADER" => section_reader.read_header(document),
                    "TABLES" => section_reader.read_tables(document),
                    "BLOCKS" => section_reader.read_blocks(document),
                    "ENTITIES" => section_reader.read_entities(document),
                    _ => {
                        document.notifications.notify(
                            NotificationType::NotImplemented,
                            format!("Section {name} skipped"),
                        );
                        Ok(section_reader.skip_section())
                    }
                }
            }
        };

        // In failsafe mode, record the error and continue after the section
        if let Err(err) = result {
            if !failsafe {
                return Err(err);
            }
            document
                .notifications
                .notify(NotificationType::Error, err.to_string());
            reader.skip_past("ENDSEC");
        }
    }
    Ok(())
}
