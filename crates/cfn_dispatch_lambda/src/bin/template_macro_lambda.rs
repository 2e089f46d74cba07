use cfn_dispatch_lambda::handlers::template_macro::{handle_macro_event, MacroHandlerConfig};
use cfn_dispatch_lambda::runtime::template::MacroResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &MacroHandlerConfig,
) -> Result<MacroResponse, Error> {
    handle_macro_event(event.payload, config).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = MacroHandlerConfig {
        service_token: std::env::var("LAMBDA_ARN")
            .map_err(|_| Error::from("LAMBDA_ARN must be configured"))?,
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &config))).await
}
