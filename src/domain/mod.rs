// Domain layer: core models and ports (interfaces). No network or filesystem code here.

pub mod locale;
pub mod model;
pub mod ports;
