pub(crate) mod cpu;
