//! ZetPkg - Self-Describing, Content-Verified Package Container
//!
//! A ZetPkg bundles named binary assets and metadata into a single text blob.
//! Every asset is bound to a SHA-256 digest in the metadata header, and the
//! whole package is verified asset by asset when it is loaded. Containers of
//! the predecessor PixiPkg dialect are read the same way.
//!
//! ## Layout
//!
//! ```text
//! <metadata JSON, pretty-printed>
//! ---PAYLOAD---
//! <payload JSON, compact>
//! ```
//!
//! - **Metadata**: `format`, `version`, `entry`, `created`, encoding tag,
//!   `assets` (path → base6x SHA-256), plus caller-supplied extras
//! - **Payload**: path → base6x-encoded asset bytes
//! - **Base6x**: 64-symbol JSON/URL-safe alphabet, 6 bits per symbol, no padding
//!
//! ## Example
//!
//! ```
//! use zetpkg::builder::{build, BuildOptions, FileNode};
//! use zetpkg::loader::load;
//!
//! let files = vec![
//!     FileNode::file("main.js", "console.log(1)"),
//!     FileNode::directory("assets/"),
//! ];
//! let built = build(&files, &BuildOptions::new("main.js")).unwrap();
//!
//! let assets = load(&built.content).unwrap();
//! assert_eq!(assets.get("main.js").unwrap(), b"console.log(1)");
//! ```

pub mod builder;
pub mod cli;
pub mod container;
pub mod detect;
pub mod error;
pub mod header;
pub mod loader;
pub mod pipeline;
pub mod validator;

pub use builder::{build, verify, BuildOptions, BuiltPackage, FileContent, FileNode};
pub use container::{Container, Payload, SEPARATOR};
pub use error::{ErrorKind, Failure, Result, ZetPkgError};
pub use header::{AssetTable, Dialect, Encoding, Metadata};
pub use loader::{load, load_with, parse, Assets, LoadOptions};
pub use validator::{validate, Validation};
