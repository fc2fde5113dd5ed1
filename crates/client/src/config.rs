//! Runtime configuration.
//!
//! Resolved once at startup and passed explicitly into every command:
//! built-in defaults, then an optional JSON file, then environment and flags
//! (clap folds the environment into the flag values).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tablekit_core::model::{
    BillingMode, IndexDescriptor, IndexProjection, KeyAttribute, TableDescriptor,
};
use tablekit_core::provisioning::PollSettings;
use thiserror::Error;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_TABLE: &str = "CustomersOrdersProducts";
pub const DEFAULT_PARTITION_KEY: &str = "ID";
pub const DEFAULT_SORT_KEY: &str = "Area";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {field} cannot be empty")]
    Empty { field: &'static str },

    #[error("Invalid configuration: {field} has unknown key type {value:?} (expected S or N)")]
    KeyType { field: &'static str, value: String },

    #[error("Invalid configuration: {given} requires {missing}")]
    PartialCapacity {
        given: &'static str,
        missing: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigFile {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub table: Option<String>,
    pub partition_key: Option<String>,
    pub partition_key_type: Option<String>,
    /// An empty string removes the default sort key.
    pub sort_key: Option<String>,
    pub sort_key_type: Option<String>,
    pub read_capacity: Option<i64>,
    pub write_capacity: Option<i64>,
    pub initial_delay_ms: Option<u64>,
    pub max_total_delay_ms: Option<u64>,
    pub not_found_tolerance: Option<u32>,
    pub indexes: Vec<IndexFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexFile {
    pub name: String,
    pub partition_key: String,
    #[serde(default)]
    pub partition_key_type: Option<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub sort_key_type: Option<String>,
    /// Non-key attributes to project. Absent means all attributes.
    #[serde(default)]
    pub include: Option<Vec<String>>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values that came from the environment or the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub table: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub region: String,
    pub endpoint_url: Option<String>,
    pub table: TableDescriptor,
    pub poll: PollSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            table: TableDescriptor::new(DEFAULT_TABLE, KeyAttribute::string(DEFAULT_PARTITION_KEY))
                .with_sort_key(KeyAttribute::string(DEFAULT_SORT_KEY)),
            poll: PollSettings::default(),
        }
    }
}

impl Config {
    /// Loads the optional file at `path` and resolves it against `overrides`.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = path.map(ConfigFile::load).transpose()?;
        Self::resolve(file.unwrap_or_default(), overrides)
    }

    pub fn resolve(file: ConfigFile, overrides: &Overrides) -> Result<Self> {
        let defaults = Config::default();

        let region = pick(&overrides.region, file.region, defaults.region);
        let endpoint_url = overrides
            .endpoint_url
            .clone()
            .or(file.endpoint_url)
            .filter(|url| !url.is_empty());
        let table_name = pick(&overrides.table, file.table, defaults.table.name);

        let partition_key = key_attribute(
            "PartitionKey",
            file.partition_key
                .unwrap_or_else(|| DEFAULT_PARTITION_KEY.to_string()),
            file.partition_key_type.as_deref(),
        )?;
        let sort_key = match file.sort_key {
            Some(name) if name.is_empty() => None,
            Some(name) => Some(key_attribute("SortKey", name, file.sort_key_type.as_deref())?),
            None => Some(key_attribute(
                "SortKey",
                DEFAULT_SORT_KEY.to_string(),
                file.sort_key_type.as_deref(),
            )?),
        };

        if region.is_empty() {
            return Err(ConfigError::Empty { field: "Region" });
        }
        if table_name.is_empty() {
            return Err(ConfigError::Empty { field: "Table" });
        }

        let mut table = TableDescriptor::new(table_name, partition_key);
        if let Some(sort_key) = sort_key {
            table = table.with_sort_key(sort_key);
        }
        let billing_mode = match (file.read_capacity, file.write_capacity) {
            (Some(read), Some(write)) => BillingMode::Provisioned { read, write },
            (None, None) => BillingMode::PayPerRequest,
            (Some(_), None) => {
                return Err(ConfigError::PartialCapacity {
                    given: "ReadCapacity",
                    missing: "WriteCapacity",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::PartialCapacity {
                    given: "WriteCapacity",
                    missing: "ReadCapacity",
                });
            }
        };
        table = table.with_billing_mode(billing_mode);
        for index in file.indexes {
            table = table.with_index(index_descriptor(index)?);
        }

        let poll = PollSettings {
            initial_delay: file
                .initial_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll.initial_delay),
            max_total_delay: file
                .max_total_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll.max_total_delay),
            not_found_tolerance: file
                .not_found_tolerance
                .unwrap_or(defaults.poll.not_found_tolerance),
        };

        Ok(Self {
            region,
            endpoint_url,
            table,
            poll,
        })
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

fn pick(flag: &Option<String>, file: Option<String>, default: String) -> String {
    flag.clone().or(file).unwrap_or(default)
}

fn key_attribute(field: &'static str, name: String, kind: Option<&str>) -> Result<KeyAttribute> {
    if name.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    match kind.unwrap_or("S") {
        "S" | "s" => Ok(KeyAttribute::string(name)),
        "N" | "n" => Ok(KeyAttribute::number(name)),
        other => Err(ConfigError::KeyType {
            field,
            value: other.to_string(),
        }),
    }
}

fn index_descriptor(index: IndexFile) -> Result<IndexDescriptor> {
    if index.name.is_empty() {
        return Err(ConfigError::Empty { field: "Indexes.Name" });
    }
    let partition_key = key_attribute(
        "Indexes.PartitionKey",
        index.partition_key,
        index.partition_key_type.as_deref(),
    )?;
    let sort_key = index
        .sort_key
        .map(|name| key_attribute("Indexes.SortKey", name, index.sort_key_type.as_deref()))
        .transpose()?;
    Ok(IndexDescriptor {
        name: index.name,
        partition_key,
        sort_key,
        projection: match index.include {
            Some(attributes) => IndexProjection::Include(attributes),
            None => IndexProjection::All,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(ConfigFile::default(), &Overrides::default()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.table.name, "CustomersOrdersProducts");
        assert_eq!(config.table.partition_key, KeyAttribute::string("ID"));
        assert_eq!(config.table.sort_key, Some(KeyAttribute::string("Area")));
        assert_eq!(config.table.billing_mode, BillingMode::PayPerRequest);
        assert_eq!(config.poll, PollSettings::default());
    }

    #[test]
    fn test_file_keys_are_pascal_case() {
        let file: ConfigFile = serde_json::from_str(
            r#"{
                "Region": "eu-west-1",
                "Table": "Movies",
                "PartitionKey": "Year",
                "PartitionKeyType": "N",
                "SortKey": "Title",
                "ReadCapacity": 10,
                "WriteCapacity": 5,
                "InitialDelayMs": 250,
                "MaxTotalDelayMs": 4000,
                "Indexes": [
                    {"Name": "StatusIndex", "PartitionKey": "Order_Status", "Include": ["Order_ID"]}
                ]
            }"#,
        )
        .unwrap();

        let config = Config::resolve(file, &Overrides::default()).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.table.name, "Movies");
        assert_eq!(config.table.partition_key, KeyAttribute::number("Year"));
        assert_eq!(config.table.sort_key, Some(KeyAttribute::string("Title")));
        assert_eq!(
            config.table.billing_mode,
            BillingMode::Provisioned { read: 10, write: 5 }
        );
        assert_eq!(config.poll.initial_delay, Duration::from_millis(250));
        assert_eq!(config.poll.max_total_delay, Duration::from_millis(4000));
        assert_eq!(
            config.table.index("StatusIndex").unwrap().projection,
            IndexProjection::Include(vec!["Order_ID".to_string()])
        );
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = ConfigFile {
            region: Some("eu-west-1".to_string()),
            table: Some("FromFile".to_string()),
            ..Default::default()
        };
        let overrides = Overrides {
            region: Some("ap-south-1".to_string()),
            endpoint_url: Some("http://localhost:8000".to_string()),
            table: Some("FromFlag".to_string()),
        };

        let config = Config::resolve(file, &overrides).unwrap();
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.table.name, "FromFlag");
        assert_eq!(config.target_display(), "Local DynamoDB (http://localhost:8000)");
    }

    #[test]
    fn test_empty_sort_key_removes_it() {
        let file = ConfigFile {
            sort_key: Some(String::new()),
            ..Default::default()
        };
        let config = Config::resolve(file, &Overrides::default()).unwrap();
        assert_eq!(config.table.sort_key, None);
    }

    #[test]
    fn test_validation() {
        let overrides = Overrides {
            table: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve(ConfigFile::default(), &overrides),
            Err(ConfigError::Empty { field: "Table" })
        ));

        let file = ConfigFile {
            partition_key: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve(file, &Overrides::default()),
            Err(ConfigError::Empty {
                field: "PartitionKey"
            })
        ));

        let file = ConfigFile {
            partition_key_type: Some("B".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve(file, &Overrides::default()),
            Err(ConfigError::KeyType { .. })
        ));
    }

    #[test]
    fn test_capacity_needs_both_units() {
        let file = ConfigFile {
            read_capacity: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve(file, &Overrides::default()),
            Err(ConfigError::PartialCapacity {
                missing: "WriteCapacity",
                ..
            })
        ));

        let file: ConfigFile = serde_json::from_str(r#"{"WriteCapacity": 5}"#).unwrap();
        let error = Config::resolve(file, &Overrides::default()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid configuration: WriteCapacity requires ReadCapacity"
        );
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(
            Config::load(Some(&path), &Overrides::default()),
            Err(ConfigError::Read { .. })
        ));

        let path = dir.path().join("tablekit.json");
        std::fs::write(&path, r#"{"Table": "Movies"}"#).unwrap();
        let config = Config::load(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.table.name, "Movies");
    }
}
