pub mod port;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;
