pub mod csv_import;
pub mod file;
pub mod sample;

pub use csv_import::{import_csv, parse_csv, CsvImport};
pub use file::{load_snapshot, save_snapshot};
pub use sample::sample_snapshot;
