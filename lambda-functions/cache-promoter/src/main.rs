use cache_promoter::{Config, PromotionService, Response};
use clap::Parser;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

async fn function_handler(
    _event: LambdaEvent<Value>,
    service: &Mutex<PromotionService>,
) -> Result<Response, Error> {
    // Invocations are serial, so the lock is uncontended; it only exists to
    // share the warm-process caches with the handler closure.
    let outcome = service.lock().await.handle_event().await?;
    Ok(Response::from_outcome(&outcome))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::parse().normalized();
    let service = Mutex::new(PromotionService::from_env(config).await?);
    let service = &service;

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("detected lambda runtime, starting lambda handler");
        return run(service_fn(move |event: LambdaEvent<Value>| async move {
            function_handler(event, service).await
        }))
        .await;
    }

    info!("no lambda runtime detected, invoking handler directly");
    let outcome = service.lock().await.handle_event().await?;
    info!("handler finished: {:?}", outcome);
    Ok(())
}
