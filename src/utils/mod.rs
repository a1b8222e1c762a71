pub mod record_patch;
