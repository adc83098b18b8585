//! Generated `pb.Workers` messages and service glue.
//!
//! Built from `proto/worker.proto` by `build.rs`.

tonic::include_proto!("pb");

/// Encoded descriptors for `proto/worker.proto`, served by reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("worker_descriptor");
