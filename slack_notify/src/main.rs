use lambda_runtime::{run, service_fn, Error};
use slack_notify::config::Config;
use std::env;

const TRACING_DEBUG: &str = "TRACING_DEBUG";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let tracing_result = env::var(TRACING_DEBUG);
    tracing_subscriber::fmt()
        .with_max_level(if let Ok(_) = tracing_result {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let config = Config::from_env();
    let http = reqwest::Client::new();
    let config = &config;
    let http = &http;
    run(service_fn(move |event| async move {
        slack_notify::function_handler(config, http, event).await
    }))
    .await
}
