pub mod change;
pub mod config;
pub mod local;
pub mod navigation;
pub mod record;
pub mod services;
pub mod snapshot;
pub mod suggest;
#[cfg(test)]
pub(crate) mod test_support;
