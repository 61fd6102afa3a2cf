// Core engines: pure pricing and color math on top of the domain ports.
pub mod color;
pub mod pricing;
