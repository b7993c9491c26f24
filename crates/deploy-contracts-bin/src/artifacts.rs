//! Access to compiled contract artifacts.
//!
//! Artifacts are laid out the way Hardhat writes them:
//! `<root>/<File>.sol/<Contract>.json`, next to `<Contract>.dbg.json` debug
//! files which are not artifacts and get ignored.

use {
    alloy::{
        json_abi::JsonAbi,
        primitives::{Bytes, hex},
    },
    serde::Deserialize,
    std::{
        collections::BTreeSet,
        path::{Path, PathBuf},
    },
    tokio::fs,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No artifacts found at {0}. Run the compile step first.")]
    MissingDirectory(PathBuf),
    #[error("no artifact for contract {name:?} in {root}")]
    NotFound { name: String, root: PathBuf },
    #[error(
        "multiple artifacts for contract {name:?}, use one of the fully qualified names: {}",
        .candidates.join(", ")
    )]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse artifact {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {name:?} has invalid bytecode (unlinked libraries?)")]
    InvalidBytecode {
        name: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// The subset of a compiled artifact the deployer cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub abi: JsonAbi,
    #[serde(default)]
    bytecode: Option<Bytecode>,
}

/// Hardhat stores the creation code as a plain hex string, Foundry nests it
/// in an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Bytecode {
    Hex(String),
    Object { object: String },
}

impl Artifact {
    fn bytecode_hex(&self) -> &str {
        let hex = match &self.bytecode {
            Some(Bytecode::Hex(hex)) | Some(Bytecode::Object { object: hex }) => hex.trim(),
            None => "",
        };
        hex.strip_prefix("0x").unwrap_or(hex)
    }

    /// Interfaces and abstract contracts compile to empty bytecode and can't
    /// be deployed.
    pub fn has_code(&self) -> bool {
        !self.bytecode_hex().is_empty()
    }

    /// The creation code without constructor arguments.
    pub fn creation_code(&self) -> Result<Bytes, Error> {
        hex::decode(self.bytecode_hex())
            .map(Bytes::from)
            .map_err(|source| Error::InvalidBytecode {
                name: self.contract_name.clone(),
                source,
            })
    }
}

/// A directory of compiled artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Names of all contracts that have deployable bytecode, de-duplicated and
    /// sorted so that the result is the same on every run.
    ///
    /// This knows nothing about dependencies between contracts. Deployments
    /// that need a specific order have to configure it explicitly.
    pub async fn deployable_contracts(&self) -> Result<Vec<String>, Error> {
        let mut names = BTreeSet::new();
        for dir in self.source_dirs().await? {
            for path in artifact_files(&dir).await? {
                let artifact = read_artifact(&path).await?;
                if artifact.has_code() {
                    names.insert(artifact.contract_name);
                }
            }
        }
        Ok(names.into_iter().collect())
    }

    /// Finds the artifact for `name`, either a bare contract name or a fully
    /// qualified `File.sol:Contract`.
    pub async fn resolve(&self, name: &str) -> Result<Artifact, Error> {
        let not_found = || Error::NotFound {
            name: name.to_owned(),
            root: self.root.clone(),
        };

        if let Some((source, contract)) = name.rsplit_once(':') {
            // Hardhat's fully qualified names carry the path of the source
            // relative to the project (`contracts/Foo.sol`), we only need the
            // file name.
            let source = Path::new(source).file_name().ok_or_else(not_found)?;
            let path = self.root.join(source).join(format!("{contract}.json"));
            if !is_dir(&self.root).await {
                return Err(Error::MissingDirectory(self.root.clone()));
            }
            if !is_file(&path).await {
                return Err(not_found());
            }
            return read_artifact(&path).await;
        }

        let file_name = format!("{name}.json");
        let mut matches = Vec::new();
        for dir in self.source_dirs().await? {
            let path = dir.join(&file_name);
            if is_file(&path).await {
                matches.push(path);
            }
        }

        match matches.len() {
            0 => Err(not_found()),
            1 => read_artifact(&matches.remove(0)).await,
            _ => Err(Error::Ambiguous {
                name: name.to_owned(),
                candidates: matches
                    .iter()
                    .filter_map(|path| {
                        let source = path.parent()?.file_name()?.to_string_lossy();
                        Some(format!("{source}:{name}"))
                    })
                    .collect(),
            }),
        }
    }

    /// Immediate subdirectories of the root, sorted by name.
    async fn source_dirs(&self) -> Result<Vec<PathBuf>, Error> {
        if !is_dir(&self.root).await {
            return Err(Error::MissingDirectory(self.root.clone()));
        }
        let mut dirs = Vec::new();
        for path in read_dir(&self.root).await? {
            if is_dir(&path).await {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|metadata| metadata.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|metadata| metadata.is_file())
}

async fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let io_err = |source| Error::Io {
        path: dir.to_owned(),
        source,
    };
    let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        paths.push(entry.path());
    }
    Ok(paths)
}

/// JSON files in `dir` that are contract artifacts.
async fn artifact_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for path in read_dir(dir).await? {
        let is_artifact = path.file_name().is_some_and(|name| {
            let name = name.to_string_lossy();
            name.ends_with(".json") && !name.ends_with(".dbg.json")
        });
        if is_artifact && is_file(&path).await {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn read_artifact(path: &Path) -> Result<Artifact, Error> {
    let contents = fs::read_to_string(path).await.map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| Error::Json {
        path: path.to_owned(),
        source,
    })
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_util {
    use {serde_json::json, std::path::Path};

    /// Writes a Hardhat style artifact to `<root>/<source>/<contract>.json`
    /// along with its debug file.
    pub fn write_artifact(
        root: &Path,
        source: &str,
        contract: &str,
        bytecode: &str,
        abi: serde_json::Value,
    ) {
        let dir = root.join(source);
        std::fs::create_dir_all(&dir).unwrap();
        let artifact = json!({
            "_format": "hh-sol-artifact-1",
            "contractName": contract,
            "sourceName": format!("contracts/{source}"),
            "abi": abi,
            "bytecode": bytecode,
            "deployedBytecode": bytecode,
            "linkReferences": {},
            "deployedLinkReferences": {},
        });
        std::fs::write(
            dir.join(format!("{contract}.json")),
            serde_json::to_string_pretty(&artifact).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.join(format!("{contract}.dbg.json")),
            r#"{ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/0.json" }"#,
        )
        .unwrap();
    }
}
