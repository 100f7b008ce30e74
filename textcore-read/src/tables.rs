//! The various font tables

pub mod aat;
pub mod ankr;
pub mod avar;
pub mod bitmap;
pub mod cmap;
pub mod feat;
pub mod fvar;
pub mod gdef;
pub mod glyf;
pub mod gpos;
pub mod gsub;
pub mod head;
pub mod hvar;
pub mod hvhea;
pub mod hvmtx;
pub mod kern;
pub mod kerx;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod morx;
pub mod mvar;
pub mod name;
pub mod os2;
pub mod post;
pub mod sbix;
pub mod trak;
pub mod variations;
