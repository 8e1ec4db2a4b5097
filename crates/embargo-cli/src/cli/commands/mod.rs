mod dispatch;
pub(crate) mod rm;
pub(crate) mod run;
mod stores;
pub(crate) mod sync;

pub use dispatch::dispatch;
