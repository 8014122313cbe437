use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use chanfeat_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a multi-channel image with dense pixel data.
///
/// The image is a flat contiguous buffer in column-major planar order: the
/// element at `(y, x, c)` lives at offset `c * h * w + x * h + y`, so a column
/// is one contiguous run of `height` values and each channel plane is a
/// contiguous `height * width` block. The channel depth is a runtime value
/// since several operations change it (RGB to gray, gradient reduction).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    size: ImageSize,
    channels: usize,
    data: Vec<T>,
}

impl<T> Image<T>
where
    T: Copy,
{
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The channel depth; must be at least 1.
    /// * `data` - The pixel data in column-major planar order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the shape, an error is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use chanfeat_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32>::new(
    ///     ImageSize { width: 10, height: 20 },
    ///     3,
    ///     vec![0f32; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// assert_eq!(image.height(), 20);
    /// assert_eq!(image.channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<T>) -> Result<Self, ImageError> {
        if channels == 0 {
            return Err(ImageError::InvalidChannelDepth(channels, "at least 1"));
        }

        if data.len() != size.width * size.height * channels {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * channels,
            ));
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new image with the given shape filled with a constant value.
    pub fn from_size_val(size: ImageSize, channels: usize, val: T) -> Result<Self, ImageError> {
        let data = vec![val; size.width * size.height * channels];
        Image::new(size, channels, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the channel depth of the image.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Get the number of pixels per channel plane.
    pub fn num_pixels(&self) -> usize {
        self.size.width * self.size.height
    }

    /// Whether the image has an empty spatial extent.
    pub fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Flat offset of the element at `(y, x, c)`.
    ///
    /// All offset arithmetic over the buffer goes through here (and the
    /// plane/column accessors below) so the storage order is written down in
    /// exactly one place.
    #[inline]
    pub fn offset(&self, y: usize, x: usize, c: usize) -> usize {
        (c * self.size.width + x) * self.size.height + y
    }

    /// Get a reference to the element at `(y, x, c)`, if in bounds.
    pub fn get(&self, y: usize, x: usize, c: usize) -> Option<&T> {
        if y >= self.size.height || x >= self.size.width || c >= self.channels {
            return None;
        }
        self.data.get(self.offset(y, x, c))
    }

    /// Get the channel plane `c` as a contiguous slice of `h * w` values.
    pub fn plane(&self, c: usize) -> Result<&[T], ImageError> {
        if c >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(c, self.channels));
        }
        let n = self.num_pixels();
        Ok(&self.data[c * n..(c + 1) * n])
    }

    /// Get the channel plane `c` as a mutable contiguous slice.
    pub fn plane_mut(&mut self, c: usize) -> Result<&mut [T], ImageError> {
        if c >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(c, self.channels));
        }
        let n = self.num_pixels();
        Ok(&mut self.data[c * n..(c + 1) * n])
    }

    /// Get column `x` of channel plane `c` as a contiguous slice of `h` values.
    pub fn col(&self, c: usize, x: usize) -> Result<&[T], ImageError> {
        if c >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(c, self.channels));
        }
        if x >= self.size.width {
            return Err(ImageError::InvalidImageSize(
                x,
                0,
                self.size.width,
                self.size.height,
            ));
        }
        let start = self.offset(0, x, c);
        Ok(&self.data[start..start + self.size.height])
    }

    /// Extract a single channel as a new one-plane image.
    pub fn channel(&self, c: usize) -> Result<Image<T>, ImageError> {
        let plane = self.plane(c)?.to_vec();
        Image::new(self.size, 1, plane)
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return the underlying pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Cast the pixel data of the image to a different type.
    pub fn cast<U>(&self) -> Result<Image<U>, ImageError>
    where
        U: num_traits::NumCast + Copy,
        T: num_traits::NumCast,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, self.channels, casted_data)
    }

    /// Cast the pixel data to a different type and scale it.
    ///
    /// # Examples
    ///
    /// ```
    /// use chanfeat_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8>::new(
    ///     ImageSize { width: 1, height: 2 },
    ///     1,
    ///     vec![0, 255],
    /// ).unwrap();
    ///
    /// let scaled = image.cast_and_scale::<f32>(1.0 / 255.0).unwrap();
    /// assert_eq!(scaled.get(1, 0, 0), Some(&1.0f32));
    /// ```
    pub fn cast_and_scale<U>(&self, scale: U) -> Result<Image<U>, ImageError>
    where
        U: num_traits::NumCast + std::ops::Mul<Output = U> + Copy,
        T: num_traits::NumCast,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                let xu = U::from(x).ok_or(ImageError::CastError)?;
                Ok(xu * scale)
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, self.channels, casted_data)
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageSize};
    use crate::error::ImageError;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            3,
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.width(), 10);
        assert_eq!(image.height(), 20);
        assert_eq!(image.channels(), 3);

        Ok(())
    }

    #[test]
    fn image_shape_mismatch() {
        let res = Image::<f32>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            1,
            vec![0.0; 5],
        );
        assert_eq!(res.err(), Some(ImageError::InvalidChannelShape(5, 4)));
    }

    #[test]
    fn image_column_major_layout() -> Result<(), ImageError> {
        // 2x3 single plane, columns contiguous
        let image = Image::<f32>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            1,
            vec![0., 1., 2., 3., 4., 5.],
        )?;
        assert_eq!(image.get(0, 0, 0), Some(&0.0));
        assert_eq!(image.get(1, 0, 0), Some(&1.0));
        assert_eq!(image.get(0, 1, 0), Some(&2.0));
        assert_eq!(image.get(1, 2, 0), Some(&5.0));
        assert_eq!(image.col(0, 1)?, &[2.0, 3.0]);

        Ok(())
    }

    #[test]
    fn image_planes() -> Result<(), ImageError> {
        let image = Image::<f32>::new(
            ImageSize {
                width: 1,
                height: 2,
            },
            3,
            vec![0., 1., 2., 3., 4., 5.],
        )?;
        assert_eq!(image.plane(0)?, &[0.0, 1.0]);
        assert_eq!(image.plane(2)?, &[4.0, 5.0]);
        assert_eq!(image.get(1, 0, 2), Some(&5.0));

        let last = image.channel(2)?;
        assert_eq!(last.channels(), 1);
        assert_eq!(last.as_slice(), &[4.0, 5.0]);

        Ok(())
    }

    #[test]
    fn image_cast() -> Result<(), ImageError> {
        let image_u8 = Image::<u8>::new(
            ImageSize {
                width: 1,
                height: 2,
            },
            3,
            vec![0, 1, 2, 3, 4, 5],
        )?;
        let image_f32 = image_u8.cast::<f32>()?;
        assert_eq!(image_f32.get(1, 0, 2), Some(&5.0f32));

        Ok(())
    }

    #[test]
    fn image_zero_channels_rejected() {
        let res = Image::<f32>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
            vec![],
        );
        assert!(res.is_err());
    }

    #[test]
    fn image_empty_extent() -> Result<(), ImageError> {
        let image = Image::<f32>::new(
            ImageSize {
                width: 0,
                height: 4,
            },
            2,
            vec![],
        )?;
        assert!(image.is_empty());
        assert_eq!(image.plane(1)?, &[]);

        Ok(())
    }
}
