pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod reader;
pub mod schema;
pub mod value;

pub use error::{Error, Result};
pub use reader::{ErrorCategory, ErrorPolicy, FileContent, Reader};
pub use schema::{Descriptor, ListMode, Restriction, ViolationPolicy};
pub use value::{RestrictionDomain, Value, ValueType};
