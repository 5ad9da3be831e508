// Domain layer: catalog records, credentials and the ports the client implements.

pub mod model;
pub mod ports;
