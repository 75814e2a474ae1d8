pub(crate) mod input;
pub(crate) mod selection;
