//! HTTP request handlers.

pub mod common;
pub mod convert;
pub mod download;
pub mod uploads;
pub mod wordlist;

pub use common::*;
pub use convert::*;
pub use download::*;
pub use uploads::*;
pub use wordlist::*;
