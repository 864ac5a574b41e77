pub mod app;
pub mod settings;

pub use settings::Settings;
