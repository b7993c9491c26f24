use {
    anyhow::{Context, Result},
    serde::Deserialize,
    serde_json::Value,
    serde_with::{DefaultOnNull, serde_as},
    std::{collections::HashMap, io, path::Path},
};

/// Which contracts to deploy, in which order and with which constructor
/// arguments.
///
/// Missing and `null` entries are treated alike at every level.
#[serde_as]
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Contract names in deployment order. When empty, the order is derived
    /// from the compiled artifacts.
    #[serde_as(as = "DefaultOnNull")]
    pub order: Vec<String>,

    /// Constructor arguments per contract name.
    #[serde_as(as = "DefaultOnNull<HashMap<_, DefaultOnNull>>")]
    pub args: HashMap<String, Vec<Value>>,

    /// Amount of ether, as a decimal string, sent along with the deployment
    /// per contract name.
    #[serde_as(as = "DefaultOnNull<HashMap<_, DefaultOnNull>>")]
    pub values: HashMap<String, String>,
}

impl DeploymentConfig {
    /// Loads the configuration at `path`. A missing file is not an error and
    /// yields the empty configuration.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no deployment config, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read deployment config {}", path.display())
                });
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse deployment config {}", path.display()))
    }

    /// Constructor arguments for `contract`, empty if none are configured.
    pub fn args(&self, contract: &str) -> &[Value] {
        self.args.get(contract).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ether amount to send with the deployment of `contract`. Empty strings
    /// count as "no value".
    pub fn value(&self, contract: &str) -> Option<&str> {
        self.values
            .get(contract)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}
