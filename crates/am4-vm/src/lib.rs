//! am4 VM: executes assembled am4 binaries.

pub mod display;
pub mod stack;
pub mod vm;

pub use vm::{Vm, VmConfig, DEFAULT_STACK_CAPACITY};
