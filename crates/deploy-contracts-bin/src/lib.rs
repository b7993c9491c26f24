pub mod arguments;
pub mod artifacts;
pub mod config;
pub mod deployer;
pub mod deployment_log;
pub mod encoding;
pub mod network;
pub mod runner;

use {
    crate::{
        arguments::Arguments,
        artifacts::ArtifactStore,
        config::DeploymentConfig,
        deployer::NodeDeployer,
        deployment_log::DeploymentLog,
        network::Network,
        runner::Runner,
    },
    anyhow::Result,
};

/// Deploys the configured contracts and writes the deployment log. Nothing is
/// written if any deployment fails.
pub async fn run(args: Arguments) -> Result<()> {
    let network = Network::resolve(&args.network, args.network_node_url())?;
    let config = DeploymentConfig::from_path(&args.config_path).await?;
    let artifacts = ArtifactStore::new(args.artifacts_dir);
    // Resolve the order before touching the network so that a missing build
    // fails fast.
    let order = runner::deployment_order(&config, &artifacts).await?;

    let deployer = NodeDeployer::connect(&network.node_url, args.private_key).await?;
    let chain_id = deployer.chain_id().await?;
    network.verify_chain_id(chain_id)?;
    tracing::info!(
        network = %network.name,
        chain_id,
        contracts = order.len(),
        "starting deployment"
    );

    let runner = Runner::new(config, artifacts, network.clone(), Box::new(deployer));
    let deployments = runner.deploy_all(&order).await?;

    let log = DeploymentLog::new(network.name, chain_id, deployments);
    log.write(&args.output).await?;
    tracing::info!(
        path = %args.output.display(),
        deployments = log.deployments.len(),
        "saved deployments"
    );
    Ok(())
}
