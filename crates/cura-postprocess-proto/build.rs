use anyhow::Result;
use std::path::PathBuf;

fn main() -> Result<()> {
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    let include = protoc_bin_vendored::include_path()?;
    // Safety: build scripts run in a controlled single-process environment.
    unsafe {
        std::env::set_var("PROTOC", protoc);
    }

    let protos = vec![
        PathBuf::from("proto/cura/plugins/v0/slot_id.proto"),
        PathBuf::from("proto/cura/plugins/v0/engine_settings.proto"),
        PathBuf::from("proto/cura/plugins/slots/handshake/v0/handshake.proto"),
        PathBuf::from("proto/cura/plugins/slots/broadcast/v0/broadcast.proto"),
        PathBuf::from("proto/cura/plugins/slots/postprocess/v0/postprocess.proto"),
    ];
    for proto in &protos {
        println!("cargo:rerun-if-changed={}", proto.display());
    }

    let includes = vec![PathBuf::from("proto"), include];
    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&protos, &includes)?;
    Ok(())
}
