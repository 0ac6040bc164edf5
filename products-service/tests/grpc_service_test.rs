//! 商品服务 gRPC 端到端测试（内存仓储 + 临时端口）

use std::sync::Arc;

use practical_core::service_names::PRODUCTS_SERVICE;
use practical_core::{
    BackoffPolicy, BootstrapError, EntityId, EntityRepository, InMemoryRepository,
    ServiceIdentity, ServiceRuntime,
};
use practical_proto::products::product_service_client::ProductServiceClient;
use practical_proto::products::{CreateProductRequest, GetProductRequest, Product as ProtoProduct};
use products_service::domain::model::Product;
use products_service::service::wire;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_test::assert_err;
use tonic::transport::Channel;
use tonic_health::pb::HealthCheckRequest;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;

struct TestService {
    endpoint: String,
    client: ProductServiceClient<Channel>,
    repository: Arc<InMemoryRepository<Product>>,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), BootstrapError>>,
}

impl TestService {
    async fn start() -> Self {
        let repository = Arc::new(InMemoryRepository::<Product>::new());
        let context = wire::build_context(repository.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let runtime = ServiceRuntime::new(
            ServiceIdentity::new(PRODUCTS_SERVICE, 0),
            BackoffPolicy::default(),
        );
        let router = context.grpc_server.into_router().await;

        let (stop, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(runtime.run_until(router, listener, async move {
            let _ = stop_rx.await;
        }));

        let client = ProductServiceClient::connect(endpoint.clone()).await.unwrap();
        Self {
            endpoint,
            client,
            repository,
            stop,
            handle,
        }
    }

    async fn create(&mut self, name: &str, price: f64) -> Result<ProtoProduct, tonic::Status> {
        let response = self
            .client
            .create_product(CreateProductRequest {
                name: name.to_string(),
                price,
            })
            .await?;
        Ok(response.into_inner().product.unwrap())
    }

    async fn get(&mut self, id: &str) -> Result<ProtoProduct, tonic::Status> {
        let response = self
            .client
            .get_product(GetProductRequest { id: id.to_string() })
            .await?;
        Ok(response.into_inner().product.unwrap())
    }

    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let mut service = TestService::start().await;

    let created = service.create("Widget", 9.99).await.unwrap();
    assert!(created.id.parse::<i64>().unwrap() > 0);
    assert_eq!(created.name, "Widget");
    assert_eq!(created.price, 9.99);

    let fetched = service.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    service.shutdown().await;
}

#[tokio::test]
async fn test_prices_are_stored_unchanged() {
    let mut service = TestService::start().await;

    for price in [0.0, -5.0, 1e12, 0.1 + 0.2] {
        let created = service.create("Edge", price).await.unwrap();
        assert_eq!(created.price, price);
        assert_eq!(service.get(&created.id).await.unwrap().price, price);
    }

    service.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_names_are_allowed() {
    let mut service = TestService::start().await;

    let first = service.create("Widget", 1.0).await.unwrap();
    let second = service.create("Widget", 1.0).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(service.repository.len().await, 2);

    service.shutdown().await;
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let mut service = TestService::start().await;

    for id in ["999", "abc", "-1"] {
        let status = assert_err!(service.get(id).await);
        assert_eq!(status.code(), tonic::Code::Unknown);
        assert_eq!(status.message(), "record not found");
    }

    service.shutdown().await;
}

#[tokio::test]
async fn test_soft_deleted_product_is_hidden() {
    let mut service = TestService::start().await;

    let created = service.create("Widget", 9.99).await.unwrap();
    service
        .repository
        .soft_delete(EntityId::parse(&created.id).unwrap())
        .await
        .unwrap();

    let status = service.get(&created.id).await.unwrap_err();
    assert_eq!(status.message(), "record not found");

    // ID 不复用
    let next = service.create("Widget", 9.99).await.unwrap();
    assert_ne!(next.id, created.id);

    service.shutdown().await;
}

#[tokio::test]
async fn test_health_check_reports_serving() {
    let service = TestService::start().await;

    let channel = Channel::from_shared(service.endpoint.clone())
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut health = HealthClient::new(channel);
    let response = health
        .check(HealthCheckRequest {
            service: "products.ProductService".to_string(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(response.status, ServingStatus::Serving as i32);

    service.shutdown().await;
}
