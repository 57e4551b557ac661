use coney::ConeyError;
use coney_memory_broker::MemoryBroker;
use coney_tokio_rpc_client::{RpcCall, RpcClient};
use coney_tokio_rpc_server::RpcServer;
use example_coney_rpc_app::register_example_handlers;
use example_coney_rpc_service_definition::{
    Add, AddInput, AddMany, AddManyInput, Divide, DivideInput, Echo, EchoInput,
};
use serde_json::json;
use std::sync::Arc;
use tokio::join;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ConeyError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let broker = Arc::new(MemoryBroker::new());

    let server = {
        let mut server = RpcServer::new(broker.clone());
        register_example_handlers(&mut server)?;
        server.serve().await?
    };

    {
        let rpc_client = RpcClient::new(broker.clone()).await?;

        // `join!` will await all responses before proceeding
        let (res1, res2, res3, res4, res5) = join!(
            Echo::call(&rpc_client, EchoInput { x: json!("hello") }),
            Add::call(&rpc_client, AddInput { a: 1.0, b: 2.0 }),
            AddMany::call(
                &rpc_client,
                AddManyInput {
                    numbers: vec![8.0, 3.0, 7.0]
                }
            ),
            Divide::call(
                &rpc_client,
                DivideInput {
                    numerator: 22.0,
                    denominator: 7.0
                }
            ),
            Divide::call(
                &rpc_client,
                DivideInput {
                    numerator: 1.0,
                    denominator: 0.0
                }
            ),
        );

        println!("Result from echo(): {:?}", res1);
        println!("Result from add() v1: {:?}", res2);
        println!("Result from add() v2: {:?}", res3);
        println!("Result from divide(): {:?}", res4);
        println!("Result from divide() by zero: {:?}", res5);

        if let Some(stats) = broker.queue_stats(rpc_client.reply_queue()).await {
            tracing::info!("Reply queue stats: {:?}", stats);
        }
    }

    server.shutdown().await;
    broker.close().await;

    Ok(())
}
