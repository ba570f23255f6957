//! # cmake-init - C/C++ Project Scaffolding
//!
//! Reads a `project_template.json` describing a project (name, language
//! standards, libraries, executables) and writes a ready-to-build CMake tree.
//!
//! ## Quick Start
//!
//! ```bash
//! # Uses project_template.json next to the cmake-init binary
//! cmake-init
//!
//! # Explicit template and output location
//! cmake-init --config ./project_template.json ~/src
//! ```
//!
//! ## Generated Layout
//!
//! ```text
//! demo/
//! ├── CMakeLists.txt
//! ├── main.c
//! ├── lib/foo/{CMakeLists.txt, foo.c, include/foo.h}
//! └── tests/{CMakeLists.txt, test_foo.cpp}
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Template loading and validation
//! - [`scaffold`] - Plan computation and filesystem writes
//! - [`templates`] - CMake and placeholder source text

/// Template file parsing and validation (`project_template.json`).
pub mod config;

/// Error types.
pub mod error;

/// Project plan and materialization.
pub mod scaffold;

/// CMake, C and GoogleTest file templates.
pub mod templates;

/// Terminal UI utilities (tables, colors).
pub mod ui;

pub use error::{ScaffoldError, TargetKind, ValidationError};
