#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod decode;
mod error;
pub mod purl;
pub mod reference;
mod resolve;
pub mod server;

pub use error::*;
pub use crate::purl::Purl;
pub use crate::reference::{OciReference, ResolveError, Suffix};
pub use resolve::*;
