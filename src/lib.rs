//! Stock sheet cutting optimizer for stone slabs and other sheet goods.
//!
//! Pieces from a cut list are padded by the saw kerf, split into seamed
//! segments when longer than a sheet, and packed greedily onto as few
//! edge-trimmed sheets as the guillotine heuristic finds.

pub mod config;
pub mod error;
pub mod expand;
pub mod guillotine;
pub mod job;
pub mod packer;
pub mod render;
pub mod report;
pub mod solver;
pub mod types;

pub use config::{PackSettings, SheetSpec, SplitPolicy};
pub use error::{JobError, PackError};
pub use report::Report;
pub use solver::Solver;
pub use types::{PieceId, PieceRequirement, Placement, Solution};
