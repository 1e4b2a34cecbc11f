fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate gRPC code from proto files. The client is only used by the
    // integration tests.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["../proto/user.proto"], &["../proto"])?;

    Ok(())
}
