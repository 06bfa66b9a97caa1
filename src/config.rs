//! The in-memory form of a `hiera.yaml` document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The only Hiera backend this crate provisions.
pub const BACKEND: &str = "yaml";

/// The logger Hiera is configured to use.
pub const LOGGER: &str = "console";

/// A Hiera configuration document.
///
/// This type is built fresh on every write and serialized with [serde_yaml]; it is never held
/// anywhere between calls. The serialized form is the file Hiera reads on the host:
///
/// ```yaml
/// backends: yaml
/// yaml:
///   datadir: /etc/puppetlabs/code/hieradata
/// hierarchy:
/// - default
/// logger: console
/// ```
///
/// [HieraConfig::deserialize] exists mainly so that tests can decode what was written to a host
/// and assert on it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HieraConfig {
    /// Backend name. Always [BACKEND].
    pub backends: String,

    /// Settings for the YAML backend.
    pub yaml: YamlBackend,

    /// Ordered list of data-source names consulted when resolving a key.
    pub hierarchy: Vec<String>,

    /// Logger name. Always [LOGGER].
    pub logger: String,
}

/// The nested `yaml:` mapping of a [HieraConfig].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct YamlBackend {
    /// Directory on the host where the YAML data files live.
    pub datadir: PathBuf,
}

impl HieraConfig {
    /// Creates a configuration pointing the YAML backend at `datadir` with the given hierarchy.
    pub fn new(datadir: impl Into<PathBuf>, hierarchy: Vec<String>) -> Self {
        HieraConfig {
            backends: BACKEND.to_string(),
            yaml: YamlBackend {
                datadir: datadir.into(),
            },
            hierarchy,
            logger: LOGGER.to_string(),
        }
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
