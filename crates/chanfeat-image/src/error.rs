/// An error type for image buffer operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the buffer shape.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel depth is invalid for the operation.
    #[error("Invalid channel depth ({0}), expected {1}")]
    InvalidChannelDepth(usize, &'static str),

    /// Error when a channel index is out of bounds.
    #[error("Channel index ({0}) out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a kernel radius does not fit the image.
    #[error("Kernel radius ({0}) too large for image dimension ({1})")]
    InvalidKernelRadius(usize, usize),

    /// Error when a subsampling stride is invalid for the operation.
    #[error("Invalid subsampling stride ({0})")]
    InvalidStride(usize),

    /// Error when a requested output extent is empty.
    #[error("Output extent ({0}x{1}) must be non-empty")]
    EmptyExtent(usize, usize),

    /// Error when pixel values fall outside the range an operation expects.
    #[error("Pixel value ({0}) exceeds the expected maximum ({1})")]
    InvalidPixelRange(f32, f32),

    /// Error when a numeric cast fails.
    #[error("Failed to cast image data")]
    CastError,
}
