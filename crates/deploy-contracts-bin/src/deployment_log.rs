//! The JSON record of a deployment run.

use {
    alloy::primitives::Address,
    anyhow::{Context, Result},
    chrono::{DateTime, SecondsFormat, Utc},
    serde::{Deserialize, Serialize, Serializer},
    serde_json::Value,
    std::path::Path,
};

/// A successfully deployed contract.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Deployment {
    pub name: String,
    #[serde(serialize_with = "checksummed")]
    pub address: Address,
    pub args: Vec<Value>,
    /// The ether amount as configured, `null` if none was sent.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentLog {
    pub network: String,
    pub chain_id: u64,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub deployments: Vec<Deployment>,
}

impl DeploymentLog {
    pub fn new(network: String, chain_id: u64, deployments: Vec<Deployment>) -> Self {
        Self {
            network,
            chain_id,
            timestamp: Utc::now(),
            deployments,
        }
    }

    /// Writes the log to `path`, replacing whatever was there before.
    pub async fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write deployment log {}", path.display()))
    }
}

fn checksummed<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

fn iso_millis<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::address,
        chrono::TimeZone,
        serde_json::json,
    };

    fn log() -> DeploymentLog {
        DeploymentLog {
            network: "baseSepolia".to_owned(),
            chain_id: 84532,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
            deployments: vec![
                Deployment {
                    name: "Foo".to_owned(),
                    address: address!("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
                    args: vec![json!(42)],
                    value: None,
                },
                Deployment {
                    name: "Vault".to_owned(),
                    address: address!("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"),
                    args: vec![],
                    value: Some("0.05".to_owned()),
                },
            ],
        }
    }

    #[test]
    fn serializes_to_the_documented_shape() {
        assert_eq!(
            serde_json::to_value(log()).unwrap(),
            json!({
                "network": "baseSepolia",
                "chainId": 84532,
                "timestamp": "2026-10-19T08:30:00.000Z",
                "deployments": [
                    {
                        "name": "Foo",
                        "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                        "args": [42],
                        "value": null,
                    },
                    {
                        "name": "Vault",
                        "address": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
                        "args": [],
                        "value": "0.05",
                    },
                ],
            })
        );
    }

    #[tokio::test]
    async fn write_overwrites_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("deployments.json");
        DeploymentLog::new("hardhat".to_owned(), 31337, vec![])
            .write(&path)
            .await
            .unwrap();

        log().write(&path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("{\n  \"network\": \"baseSepolia\""));
        let written: DeploymentLog = serde_json::from_str(&contents).unwrap();
        assert_eq!(written, log());
    }
}
