pub(crate) mod geo;
pub(crate) mod projector;
