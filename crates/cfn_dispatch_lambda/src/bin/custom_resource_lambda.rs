use cfn_dispatch_lambda::adapters::callback::HttpResponseSender;
use cfn_dispatch_lambda::adapters::capability::ServiceRegistry;
use cfn_dispatch_lambda::handlers::custom_resource::handle_custom_resource_event;
use cfn_dispatch_lambda::runtime::contract::OutcomeReport;
use cfn_dispatch_lambda::services::aws_service_registry;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    registry: ServiceRegistry,
    responder: HttpResponseSender,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<OutcomeReport, Error> {
    handle_custom_resource_event(event.payload, &deps.registry, &deps.responder)
        .map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        registry: aws_service_registry(&aws_config),
        responder: HttpResponseSender::new().map_err(Error::from)?,
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
