pub mod grpc_user_server;
pub mod layer;
pub mod status;

pub use grpc_user_server::UserGrpcService;
pub use layer::GrpcAuthLayer;
