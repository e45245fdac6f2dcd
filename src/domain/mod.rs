// Domain layer: records and the hosting-service port. No HTTP here.

pub mod model;
pub mod ports;
