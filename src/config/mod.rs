// src/config/mod.rs

//! Configuration for dagsynth.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: `RawConfigFile` -> `ConfigFile`.
//! - `range.rs`: `"(start, stop, step)"` range strings.
//! - `resolved.rs`: typed per-combination [`GeneratorConfig`].
//! - `combo.rs`: enumeration and naming of parameter combinations.

pub mod combo;
pub mod loader;
pub mod model;
pub mod range;
pub mod resolved;
pub mod validate;

pub use combo::{Combination, CombinationLog, ComboGenerator};
pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, ParamSpec, RawConfigFile, ValueList};
pub use resolved::{
    AdditionalConfig, ChainBasedConfig, ComboAxis, DeadlineConfig, FanInFanOutConfig,
    GeneratorConfig, GnpConfig, GraphStructure, MergeConfig, MultiRateConfig, ParamValue,
    PropertiesConfig, VerticalLinkConfig,
};
