use {
    crate::{
        artifacts::ArtifactStore,
        config::DeploymentConfig,
        deployer::Deploying,
        deployment_log::Deployment,
        encoding,
        network::Network,
    },
    anyhow::{Context, Result},
};

/// The contracts to deploy: the configured order if there is one, otherwise
/// every contract with deployable bytecode in alphabetical order.
pub async fn deployment_order(
    config: &DeploymentConfig,
    artifacts: &ArtifactStore,
) -> Result<Vec<String>> {
    if !config.order.is_empty() {
        return Ok(config.order.clone());
    }
    let order = artifacts.deployable_contracts().await?;
    tracing::info!(?order, "no deployment order configured, using all artifacts");
    Ok(order)
}

/// Deploys contracts one after the other.
pub struct Runner {
    config: DeploymentConfig,
    artifacts: ArtifactStore,
    network: Network,
    deployer: Box<dyn Deploying>,
}

impl Runner {
    pub fn new(
        config: DeploymentConfig,
        artifacts: ArtifactStore,
        network: Network,
        deployer: Box<dyn Deploying>,
    ) -> Self {
        Self {
            config,
            artifacts,
            network,
            deployer,
        }
    }

    /// Deploys every contract in `order`. The first failure aborts the run,
    /// contracts deployed up to that point are not reported.
    pub async fn deploy_all(&self, order: &[String]) -> Result<Vec<Deployment>> {
        let mut deployments = Vec::with_capacity(order.len());
        for name in order {
            if let Some(deployment) = self.deploy(name).await? {
                deployments.push(deployment);
            }
        }
        Ok(deployments)
    }

    /// Deploys a single contract. Returns `None` if the contract can't be
    /// deployed because it is abstract or an interface.
    pub async fn deploy(&self, name: &str) -> Result<Option<Deployment>> {
        tracing::info!(contract = name, "deploying");
        let artifact = self.artifacts.resolve(name).await?;
        if !artifact.has_code() {
            tracing::info!(
                contract = name,
                "skipping, appears to be abstract or an interface (no bytecode)"
            );
            return Ok(None);
        }

        let args = self.config.args(name);
        let value = self.config.value(name);
        let wei = value
            .map(number::units::parse_ether)
            .transpose()
            .with_context(|| format!("invalid value for {name}"))?;

        let mut code = artifact.creation_code()?.to_vec();
        code.extend_from_slice(
            &encoding::encode_constructor_args(&artifact.abi, args)
                .with_context(|| format!("invalid constructor arguments for {name}"))?,
        );

        let address = self
            .deployer
            .deploy(code.into(), wei)
            .await
            .with_context(|| format!("failed to deploy {name}"))?;
        match self.network.explorer_address_url(address) {
            Some(url) => tracing::info!(contract = name, %address, %url, "deployed"),
            None => tracing::info!(contract = name, %address, "deployed"),
        }

        Ok(Some(Deployment {
            name: name.to_owned(),
            address,
            args: args.to_vec(),
            value: value.map(str::to_owned),
        }))
    }
}
