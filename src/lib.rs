pub mod config;
pub mod constants;
pub mod errors;
pub mod markup;
pub mod models;
pub mod services;
pub mod session;

#[cfg(test)]
pub mod test_utils;
