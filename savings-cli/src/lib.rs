pub mod csv_loader;
pub mod form;
pub mod format;
pub mod logging;
pub mod report;
pub mod settings;
pub mod utils;
