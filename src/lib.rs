#[macro_use]
extern crate tracing;

pub mod cli;
pub mod host;
pub mod layout;
pub mod thumbnail;
pub mod thumbnails_box;
pub mod utils;

#[cfg(test)]
mod tests;
