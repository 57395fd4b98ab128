//! Batch image conversion with legacy 16-color normalization
//!
//! The conversion of one image goes: decode ([`codec::decode_file`]), normalize
//! ([`libindexed::normalize`]), encode ([`codec::encode`]) and write next to the source or into an
//! output directory ([`files::output_path`]).

pub mod batch;
mod bmp;
pub mod codec;
pub mod files;

pub use batch::{convert_all, convert_file, report_line, ConvertJob, Outcome, Summary};
pub use codec::OutputFormat;
pub use files::{collect_images, output_path};
