//! gherkin_dict_cli: file-based front end for the Gherkin step dictionary.
//! Maps exported test cases onto source records, writes snapshot documents and
//! queries them from the terminal.

pub mod adapter;
pub mod commands;
pub mod config;
pub mod error;

pub use adapter::{adapt_records, SourceKind};
pub use commands::{run_generate, run_search, run_stats, GenerateArgs, GenerateReport, SearchArgs};
pub use config::{load_config, DictConfig, GenerateConfig};
pub use error::{AdapterError, CliError, ConfigError};
