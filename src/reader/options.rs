//! Reader configuration.
//!
//! [`ReadOptions`] controls how [`read_frame`](crate::reader::read_frame) stores the sections it
//! reads. It is built either with [`ReadOptions::default`] or with the fluent
//! [`ReadOptionsBuilder`]:
//!
//! ```rust
//! use hallplot::reader::ReadOptions;
//!
//! let options = ReadOptions::builder().sparse(true).build();
//! assert!(options.sparse);
//! ```

/// Options of a frame parse.
///
/// Fields
/// -----------------
/// * `sparse` – Drop a variable from its table when every value of its section is exactly
///   `0.0`. Hall2De writes zero-filled sections for the fields a run did not compute; in
///   sparse mode those fields do not appear as columns. A physical field that is
///   legitimately zero everywhere is dropped as well. Default: `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub sparse: bool,
}

impl ReadOptions {
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::new()
    }
}

/// Builder for [`ReadOptions`].
#[derive(Debug, Clone, Default)]
pub struct ReadOptionsBuilder {
    options: ReadOptions,
}

impl ReadOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: ReadOptions::default(),
        }
    }

    pub fn sparse(mut self, v: bool) -> Self {
        self.options.sparse = v;
        self
    }

    pub fn build(self) -> ReadOptions {
        self.options
    }
}
