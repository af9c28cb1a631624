pub mod csv_loader;

pub use csv_loader::{load_backlog, parse_backlog};
