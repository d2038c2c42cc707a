//! The `out` operation. Publishing to an HTTP resource is not supported.

use crate::error::{ResourceError, Result};
use crate::protocol::OutResponse;
use std::path::Path;

/// Always fails with [`ResourceError::Unimplemented`].
pub fn publish(_dir: &Path) -> Result<OutResponse> {
    Err(ResourceError::Unimplemented { operation: "out" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn publish_always_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = publish(dir.path()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unimplemented);
        assert_eq!(err.to_string(), "out is not implemented");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
