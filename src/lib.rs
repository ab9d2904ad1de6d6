//! # codemover
//!
//! A line and token oriented engine for scripting mechanical edits to source files.
//!
//! Lines live in a [LineCollection](mover::collection::LineCollection), which owns them in
//! order and answers neighbor queries. Lines can be matched and rewritten with regex patterns,
//! deleted, inserted around other lines, and tokenized. A statement that spans several physical
//! lines (an `array(` that closes three lines later) is tokenized as one unit by balancing its
//! open and close delimiters across line boundaries.
//!
//! See [mover] for the module layout.

pub mod mover;
