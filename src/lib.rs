#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

// Lets expansions refer to `::const_switch` from inside this crate as well.
extern crate self as const_switch;

mod error;

pub use const_switch_macros::const_switch;
pub use error::UnknownCase;

/// Items used by the code `#[const_switch]` generates. Not public API.
#[doc(hidden)]
pub mod __private {
    use crate::UnknownCase;

    /// Default fallback of a dispatcher of type `T`.
    #[cold]
    pub fn unknown_case<T: ?Sized>() -> UnknownCase {
        let dispatcher = core::any::type_name::<T>();
        tracing::debug!(target: "const_switch", dispatcher, "no declared case matched");
        UnknownCase::new(dispatcher)
    }
}
