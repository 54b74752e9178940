pub(crate) mod assembler;
pub(crate) mod config;
pub(crate) mod observer;
pub(crate) mod plan;
