//! Filesystem primitives shared across features.

pub mod digest;
pub mod materialize;

pub use digest::{LocalArtifactState, sha256_file};
pub use materialize::{
    EULA_FILE, PLUGINS_DIR, copy_template_tree, ensure_server_skeleton, write_artifact,
    write_eula_acceptance,
};
