//! DXF (Drawing Exchange Format) reading

pub mod code_page;
pub mod reader;

pub use code_page::encoding_from_code_page;
pub use reader::{DxfReader, DxfReaderConfiguration, DxfSource};
