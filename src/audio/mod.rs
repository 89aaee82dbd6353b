//! Note output: a mixer on the device callback, or nothing at all.

mod mixer;
mod sink;
mod system;

pub use mixer::Mixer;
pub use sink::{NoteSink, SilentSink};
pub use system::AudioSystem;
