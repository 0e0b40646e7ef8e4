#![allow(dead_code)]

mod attribute;
mod hdr;
mod ldr;

pub use attribute::Attribute;
pub use hdr::HdrTexture;
pub use ldr::{AddressMode, Filter, LdrTexture};
