#![forbid(unsafe_code)]

//! Host-side glue around the `weft` layout engine.
//!
//! A host describes its graph as a [`GraphDocument`] (nodes with pins, links between pins).
//! This crate validates the document, turns it into a [`weft::LayoutGraph`], discovers connected
//! components, restricts them to a selection and runs the layout per component. Node sizes that
//! the document does not carry are looked up in an injected [`SizeCache`].

pub mod apply;
pub mod complexity;
pub mod components;
pub mod document;
pub mod error;
pub mod extract;
pub mod size_cache;

pub use apply::{AutoLayoutReport, PixelPosition, auto_layout};
pub use complexity::{ComplexityReport, cyclomatic_complexity, selection_complexity};
pub use components::{connected_components, select_components};
pub use document::{DocLink, DocNode, DocPin, GraphDocument, PinRef, SCHEMA};
pub use error::{HostError, Result};
pub use extract::{ExtractedGraph, extract};
pub use size_cache::{MemorySizeCache, NoSizeCache, SizeCache};
