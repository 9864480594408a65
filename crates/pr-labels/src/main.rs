//! GitHub Action binary.
//!
//! Reads inputs from the runner environment, publishes the labels of the
//! commit's pull request and reports failures with `::error::`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use pr_labels::workflow::logging;
use pr_labels::{ActionArgs, Config, FileCommandSink, GitHubClient, LabelResolver};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ActionArgs::parse();
    logging::init(args.verbose);

    match execute(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Action failed with error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: &ActionArgs) -> Result<()> {
    let config = Config::from_args(args)?;

    let client = GitHubClient::new(&config.api_url, &config.token)?;
    let resolver = LabelResolver::new(client, config.retry);
    let mut sink = FileCommandSink::new(config.env_file.clone(), config.output_file.clone());

    pr_labels::run(&config.commit, &resolver, &mut sink).await?;
    Ok(())
}
