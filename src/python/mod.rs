//! python
//!
//! Single interface for all Python interpreter queries.
//!
//! No other module spawns the interpreter for introspection; the executor
//! goes through [`Python`] for version, pointer width, and installed
//! package location.

pub mod interface;

pub use interface::{InterpreterInfo, Python, PythonError};
