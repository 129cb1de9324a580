// Domain layer: configuration model, command vocabulary and the executor port.

pub mod model;
pub mod ports;
