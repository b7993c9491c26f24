use {
    alloy::signers::local::PrivateKeySigner,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    tracing::Level,
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deploy_contracts=info")]
    pub log_filter: String,

    /// Events at least as severe as this level are written to stderr.
    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: Level,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

/// Deploys compiled contract artifacts and records their addresses.
#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Name of the network to deploy to. Known networks (`hardhat`,
    /// `localhost`, `baseSepolia`) come with a default node URL and an
    /// expected chain ID. Any other name requires `--node-url`.
    #[clap(long, env, default_value = "hardhat")]
    pub network: String,

    /// The Ethereum node URL to connect to. Overrides the default endpoint of
    /// a known network.
    #[clap(long, env)]
    pub node_url: Option<Url>,

    /// Base Sepolia node URL, used for `--network baseSepolia` when
    /// `--node-url` is not set.
    #[clap(long, env)]
    pub sepolia_rpc_url: Option<Url>,

    /// Hex encoded private key used to sign the deployment transactions. When
    /// omitted, transactions are sent from the first account unlocked on the
    /// node.
    #[clap(long, env)]
    pub private_key: Option<PrivateKeySigner>,

    /// JSON file with the deployment order, constructor arguments and values.
    /// A missing file means "deploy everything with no arguments".
    #[clap(long, env, default_value = "scripts/constructor-args.json")]
    pub config_path: PathBuf,

    /// Directory containing the compiled artifacts, one subdirectory per
    /// source file.
    #[clap(long, env, default_value = "artifacts/contracts")]
    pub artifacts_dir: PathBuf,

    /// Where the deployment log is written. An existing file is overwritten.
    #[clap(long, env, default_value = "deployments.base-sepolia.json")]
    pub output: PathBuf,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            network,
            node_url,
            sepolia_rpc_url,
            private_key,
            config_path,
            artifacts_dir,
            output,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "network: {network}")?;
        display_option(f, "node_url", &node_url.as_ref().map(|_| "SECRET"))?;
        display_option(
            f,
            "sepolia_rpc_url",
            &sepolia_rpc_url.as_ref().map(|_| "SECRET"),
        )?;
        display_option(
            f,
            "private_key",
            &private_key
                .as_ref()
                .map(|signer| format!("SECRET ({})", signer.address().to_checksum(None))),
        )?;
        writeln!(f, "config_path: {}", config_path.display())?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "output: {}", output.display())?;
        Ok(())
    }
}

impl Arguments {
    /// The node URL to use for the selected network, if one was configured.
    pub fn network_node_url(&self) -> Option<Url> {
        self.node_url.clone().or_else(|| match self.network.as_str() {
            "baseSepolia" => self.sepolia_rpc_url.clone(),
            _ => None,
        })
    }
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    match option {
        Some(display) => writeln!(f, "{name}: {display}"),
        None => writeln!(f, "{name}: None"),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    // First account of the well known development mnemonic.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn defaults_match_the_hardhat_layout() {
        let args = Arguments::try_parse_from(["deploy-contracts"]).unwrap();

        assert_eq!(args.network, "hardhat");
        assert!(args.node_url.is_none());
        assert!(args.private_key.is_none());
        assert_eq!(args.config_path, PathBuf::from("scripts/constructor-args.json"));
        assert_eq!(args.artifacts_dir, PathBuf::from("artifacts/contracts"));
        assert_eq!(args.output, PathBuf::from("deployments.base-sepolia.json"));
        assert_eq!(args.logging.log_stderr_threshold, Level::ERROR);
    }

    #[test]
    fn sepolia_rpc_url_only_applies_to_base_sepolia() {
        let parse = |args: &[&str]| {
            Arguments::try_parse_from(
                ["deploy-contracts", "--sepolia-rpc-url", "https://sepolia.example.org"]
                    .iter()
                    .chain(args),
            )
            .unwrap()
            .network_node_url()
            .map(|url| url.to_string())
        };

        assert_eq!(
            parse(&["--network", "baseSepolia"]).as_deref(),
            Some("https://sepolia.example.org/")
        );
        assert_eq!(
            parse(&["--network", "baseSepolia", "--node-url", "http://node.example.org"])
                .as_deref(),
            Some("http://node.example.org/")
        );
        assert_eq!(parse(&["--network", "hardhat"]), None);
    }

    #[test]
    fn display_redacts_secrets() {
        let args = Arguments::try_parse_from([
            "deploy-contracts",
            "--network",
            "baseSepolia",
            "--node-url",
            "https://base-sepolia.example.org/v1/some-api-key",
            "--sepolia-rpc-url",
            "https://base-sepolia.example.org/v1/other-api-key",
            "--private-key",
            DEV_KEY,
        ])
        .unwrap();

        let displayed = args.to_string();
        assert!(displayed.contains("network: baseSepolia"));
        assert!(displayed.contains("node_url: SECRET"));
        assert!(displayed.contains("sepolia_rpc_url: SECRET"));
        assert!(displayed.contains("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!displayed.contains("some-api-key"));
        assert!(!displayed.contains("other-api-key"));
        assert!(!displayed.contains(DEV_KEY.trim_start_matches("0x")));
    }
}
