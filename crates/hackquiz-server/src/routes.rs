pub(crate) mod error;
pub(crate) mod extract;
pub(crate) mod openapi;
pub(crate) mod pages;
pub(crate) mod quiz;
pub(crate) mod sessions;
pub(crate) mod status;
