//! External tool adapters
//!
//! Everything that leaves the process goes through [`ToolRunner`]: `dexdump` for
//! bytecode disassembly and `adb` for device extraction.

pub mod adb;
pub mod dexdump;
pub mod mock;
pub mod runner;

pub use adb::{DeviceBridge, InstalledPackage};
pub use dexdump::{Dexdump, Disassembler};
pub use mock::{MockResponse, MockToolRunner};
pub use runner::{check_output, ProcessRunner, RawOutput, ToolError, ToolRequest, ToolRunner};
