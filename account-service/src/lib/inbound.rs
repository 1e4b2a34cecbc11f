pub mod access;
pub mod grpc;
pub mod http;
