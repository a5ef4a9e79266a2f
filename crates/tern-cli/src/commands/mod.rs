//! CLI command implementations

pub(crate) mod columns;
pub(crate) mod common;
pub(crate) mod lineage;
pub(crate) mod ls;
pub(crate) mod search;
pub(crate) mod show;
pub(crate) mod summary;
pub(crate) mod validate;
