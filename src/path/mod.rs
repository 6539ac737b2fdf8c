//! Virtual path grammar (spec §4.2): pure functions that split a namespace-
//! relative path into its typed components, with no repository access.

pub mod grammar;

pub use grammar::{
    demux_date, demux_hash, demux_ref, get_full_ref, is_metadata_dir, is_metadata_file,
    is_metadata_symlink, metadata_names, DatePath, HashPath, RefPath, METADATA_DIRS,
    METADATA_FILES,
};
