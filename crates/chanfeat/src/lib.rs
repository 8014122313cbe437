#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use chanfeat_image as image;

#[doc(inline)]
pub use chanfeat_imgproc as imgproc;
