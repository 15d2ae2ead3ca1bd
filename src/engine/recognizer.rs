use super::raw::RawMatch;
use crate::Instant;

/// The call contract every recognition engine implements.
///
/// Given the text and an optional reference instant, return every match the
/// engine found, in the engine's own order. With no reference the engine must
/// resolve against the wall clock *at call time*.
///
/// `recognize` takes `&mut self` because engines are free to stage a result
/// between submitting the text and reading fields back; [`Engine`] holds the
/// handle under a single lock for the whole call.
///
/// Implementations must not fail: anything that goes wrong after construction
/// is reported as "no matches".
///
/// [`Engine`]: super::Engine
pub trait Recognizer: Send {
    /// Short human-readable engine name, used in logs and reports.
    fn name(&self) -> &str;

    fn recognize(&mut self, text: &str, reference: Option<Instant>) -> Vec<RawMatch>;
}
