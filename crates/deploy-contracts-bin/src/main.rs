use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = deploy_contracts::arguments::Arguments::parse();
    observe::tracing::initialize(&observe::Config::new(
        &args.logging.log_filter,
        Some(args.logging.log_stderr_threshold),
        args.logging.use_json_logs,
    ));
    tracing::info!("running deployer with arguments:\n{}", args);

    if let Err(err) = deploy_contracts::run(args).await {
        tracing::error!("deployment failed: {:?}", err);
        std::process::exit(1);
    }
}
