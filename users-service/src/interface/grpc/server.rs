use practical_proto::users::user_service_server::UserServiceServer;
use tonic::transport::Server;
use tonic::transport::server::Router;

use crate::interface::grpc::handler::UserGrpcHandler;

#[derive(Clone)]
pub struct UserGrpcServer {
    handler: UserGrpcHandler,
}

impl UserGrpcServer {
    pub fn new(handler: UserGrpcHandler) -> Self {
        Self { handler }
    }

    pub fn into_service(self) -> UserServiceServer<UserGrpcHandler> {
        UserServiceServer::new(self.handler)
    }

    /// 业务服务 + grpc.health.v1（业务服务标记为 SERVING）
    pub async fn into_router(self) -> Router {
        let (health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<UserServiceServer<UserGrpcHandler>>()
            .await;

        Server::builder()
            .add_service(health_service)
            .add_service(self.into_service())
    }
}
