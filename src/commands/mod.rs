pub(crate) mod build;
pub(crate) mod clean;
pub(crate) mod options;
