pub mod context_tag;
pub mod patch_version;
pub mod role;
