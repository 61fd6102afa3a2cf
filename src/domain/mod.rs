// Domain layer: catalog/pricing types and the ports the engines depend on.
pub mod model;
pub mod ports;
