// Domain layer: row and lookup models plus the ports the pipeline is wired through.

pub mod model;
pub mod ports;
