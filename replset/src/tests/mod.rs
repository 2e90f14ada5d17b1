pub mod presets;
pub mod service;
