//! Durable storage for uploaded listing images.

mod local_image_store;

pub use local_image_store::{LocalImageStore, LocalImageStoreConfig};
