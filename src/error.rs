use thiserror::Error;

/// Signaled by a dispatcher without an `otherwise` handler when the value matches none of its
/// declared cases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("unknown case was encountered in an instance of `{dispatcher}`")]
pub struct UnknownCase {
    dispatcher: &'static str,
}

impl UnknownCase {
    pub fn new(dispatcher: &'static str) -> Self {
        Self { dispatcher }
    }

    /// Type name of the dispatcher that failed.
    pub fn dispatcher(&self) -> &'static str {
        self.dispatcher
    }
}
