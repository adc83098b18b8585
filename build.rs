use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    // Use the bundled protoc so builds do not depend on a system install.
    if env::var_os("PROTOC").is_none() {
        env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("worker_descriptor.bin"))
        .compile_protos(&["proto/worker.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/worker.proto");
    Ok(())
}
