//! # acadview
//!
//! Reads DXF drawings into a typed document and answers the geometric
//! questions a viewer asks about them.
//!
//! ## Features
//!
//! - ASCII DXF from R12 through 2018, including legacy code-page text
//! - 13 entity kinds: LINE, CIRCLE, ARC, ELLIPSE, POINT, LWPOLYLINE,
//!   POLYLINE, SPLINE, TEXT, MTEXT, INSERT, DIMENSION, HATCH
//! - Layer, line type and text style tables; block definitions
//! - Bounding boxes that resolve nested and arrayed block references
//! - A packed R-tree for area search, picking and snapping
//!
//! ## Quick Start
//!
//! ```rust
//! use acadview::io::dxf::DxfReader;
//! use acadview::spatial::{hit_test, BoundsMode, SpatialIndex};
//! use acadview::Vector2;
//!
//! let text = "0\nSECTION\n2\nENTITIES\n0\nLINE\n8\n0\n10\n0\n20\n0\n11\n10\n21\n0\n0\nENDSEC\n0\nEOF\n";
//! let doc = DxfReader::from_str(text).read()?;
//!
//! let index = SpatialIndex::build(&doc, BoundsMode::ResolveInserts);
//! assert_eq!(hit_test(&doc, &index, Vector2::new(5.0, 0.1), 0.5, None), Some(0));
//! # Ok::<(), acadview::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - `io::dxf` turns text or bytes into a [`CadDocument`]
//! - `entities` and `tables` hold the document model
//! - `geometry` interprets bulges, splines and object coordinate systems
//! - `extents` measures entities and block references
//! - `spatial` indexes entity boxes for queries

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod entities;
pub mod error;
pub mod extents;
pub mod geometry;
pub mod io;
pub mod notification;
pub mod spatial;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{BoundingBox2D, Color, DxfVersion, Handle, LineWeight, Vector2, Vector3};

// Re-export entity types
pub use entities::{
    Arc, Block, Circle, Dimension, Ellipse, Entity, EntityCommon, EntityType, Hatch, Insert, Line,
    LwPolyline, MText, Point, Polyline, Spline, Text,
};

// Re-export table types
pub use tables::{Layer, LineType, Table, TableEntry, TextStyle};

pub use document::{CadDocument, HeaderValue, HeaderVariables};
pub use extents::BlockBoundsCache;
pub use io::dxf::{DxfReader, DxfReaderConfiguration, DxfSource};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use spatial::{BoundsMode, SnapKinds, SnapPoint, SpatialIndex};
