#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/merge.rs"]
mod merge;

#[path = "integration/split.rs"]
mod split;

#[path = "integration/rotate.rs"]
mod rotate;

#[path = "integration/compress_preview.rs"]
mod compress_preview;

#[path = "integration/archive.rs"]
mod archive;

#[path = "integration/resilience.rs"]
mod resilience;

#[path = "integration/services.rs"]
mod services;
