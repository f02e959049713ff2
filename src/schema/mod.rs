// Schema module - keyword descriptors and their validation rules

pub mod descriptor;
pub mod restriction;

pub use descriptor::{Descriptor, ListMode, Metadata, PreParseHook};
pub use restriction::{
    Outcome, PostCheck, PreCheck, Restriction, RestrictionKind, ViolationPolicy,
};
