pub(crate) mod clock;
pub(crate) mod fleet;
pub(crate) mod pulse;
pub(crate) mod state;
pub(crate) mod timer;
