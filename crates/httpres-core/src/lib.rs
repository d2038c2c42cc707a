pub mod config;
pub mod error;
pub mod logging;

pub mod check;
pub mod checksum;
pub mod fetch;
pub mod materialize;
pub mod protocol;
pub mod publish;
pub mod source;
pub mod storage;
pub mod version;

pub use check::check;
pub use error::{ErrorClass, ResourceError, Result};
pub use fetch::Fetcher;
pub use materialize::{materialize, materialize_into, Download, DOWNLOAD_FILENAME};
pub use publish::publish;
pub use source::Source;
pub use version::{ExpectedVersion, ObservedVersion, Version};
