//! autoconfig: unified configuration loading.
//!
//! Values are read from in-code defaults, `.env` files, JSON/YAML/TOML
//! files and the process environment, merged by precedence, cast to the
//! types a [`Schema`] declares and optionally validated.

pub mod cast;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod merge;
pub mod scan;
pub mod schema;
pub mod sources;
pub mod utils;

pub use cast::{cast, cast_tag, stringify};
pub use domain::{ConfigMapping, ConfigValue, EnvKeys, EnvSource, FieldType, Format, Source};
pub use engine::{cast_mapping, ConfigEngine, LoadedConfig};
pub use error::{CastError, ConfigError, FieldError, Result, ValidationError};
pub use merge::{merge, MergeStrategy, MAX_MERGE_DEPTH};
pub use scan::{extract_env_names, scan_env_names};
pub use schema::{
    FieldSpec, RuleValidator, Schema, SchemaValidator, TypedValidator, Validator, ValidatorChain,
};
pub use sources::{
    load_env_file, load_file, load_json, load_process_env, load_toml, load_yaml, MemoryReporter,
    Reporter, TracingReporter,
};
