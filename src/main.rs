use std::collections::HashMap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let env: HashMap<String, String> = std::env::vars().collect();

    let outcome = match issue_tasks::run::run(args, None, &env, None).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            return Err(anyhow::Error::new(e).context("issue-tasks failed"));
        }
    };
    tracing::debug!(?outcome, "finished");
    Ok(())
}
