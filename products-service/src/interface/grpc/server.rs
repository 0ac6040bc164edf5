use practical_proto::products::product_service_server::ProductServiceServer;
use tonic::transport::Server;
use tonic::transport::server::Router;

use crate::interface::grpc::handler::ProductGrpcHandler;

#[derive(Clone)]
pub struct ProductGrpcServer {
    handler: ProductGrpcHandler,
}

impl ProductGrpcServer {
    pub fn new(handler: ProductGrpcHandler) -> Self {
        Self { handler }
    }

    pub fn into_service(self) -> ProductServiceServer<ProductGrpcHandler> {
        ProductServiceServer::new(self.handler)
    }

    /// 业务服务 + grpc.health.v1（业务服务标记为 SERVING）
    pub async fn into_router(self) -> Router {
        let (health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<ProductServiceServer<ProductGrpcHandler>>()
            .await;

        Server::builder()
            .add_service(health_service)
            .add_service(self.into_service())
    }
}
