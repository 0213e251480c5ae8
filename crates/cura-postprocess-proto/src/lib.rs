//! Generated gRPC contracts spoken between CuraEngine and its backend plugins.
//!
//! Module nesting mirrors the protobuf package names; prost resolves
//! cross-package references with relative `super::` paths.

pub mod cura {
    pub mod plugins {
        pub mod v0 {
            tonic::include_proto!("cura.plugins.v0");
        }

        pub mod slots {
            pub mod handshake {
                pub mod v0 {
                    tonic::include_proto!("cura.plugins.slots.handshake.v0");
                }
            }

            pub mod broadcast {
                pub mod v0 {
                    tonic::include_proto!("cura.plugins.slots.broadcast.v0");
                }
            }

            pub mod postprocess {
                pub mod v0 {
                    tonic::include_proto!("cura.plugins.slots.postprocess.v0");
                }
            }
        }
    }
}

pub use cura::plugins::slots::{broadcast, handshake, postprocess};
pub use cura::plugins::v0 as plugins;
