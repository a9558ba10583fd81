use crate::AssetError;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, Frame, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Delay used for animation frames that declare none.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);
/// Largest edge a decoded texture keeps; bigger images are scaled down.
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// One frame of an animated texture.
#[derive(Debug, Clone)]
pub struct AnimatedFrame {
    pub image: RgbaImage,
    pub delay: Duration,
}

/// Frames of an animated texture.
///
/// Only built by [`TextureAsset`] constructors, which guarantee at least one
/// frame and equal frame sizes.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<AnimatedFrame>,
}

impl Animation {
    pub fn frames(&self) -> &[AnimatedFrame] {
        &self.frames
    }
}

/// Decoded texture pixels, ready for upload.
///
/// Animated textures loop forever; every frame has the same dimensions.
#[derive(Debug, Clone)]
pub enum TextureAsset {
    Still(RgbaImage),
    Animated(Animation),
}

impl TextureAsset {
    /// Decode a single image (format guessed from the file contents).
    pub fn decode_still(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let image = ImageReader::open(path.as_ref())?
            .with_guessed_format()?
            .decode()?
            .to_rgba8();
        Ok(Self::Still(image).limit_size(MAX_TEXTURE_SIZE))
    }

    /// Decode an animated image (GIF, APNG or animated WebP).
    ///
    /// Files that turn out to hold a single frame come back as [`TextureAsset::Still`].
    pub fn decode_animated(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let reader = || -> Result<BufReader<File>, AssetError> { Ok(BufReader::new(File::open(path)?)) };

        let frames = match ImageFormat::from_path(path) {
            Ok(ImageFormat::Gif) => GifDecoder::new(reader()?)?.into_frames().collect_frames()?,
            Ok(ImageFormat::Png) => {
                let decoder = PngDecoder::new(reader()?)?;
                if !decoder.is_apng()? {
                    return Self::decode_still(path);
                }
                decoder.apng()?.into_frames().collect_frames()?
            }
            Ok(ImageFormat::WebP) => {
                let decoder = WebPDecoder::new(reader()?)?;
                if !decoder.has_animation() {
                    return Self::decode_still(path);
                }
                decoder.into_frames().collect_frames()?
            }
            _ => return Self::decode_still(path),
        };

        Self::from_frames(frames)
    }

    fn from_frames(frames: Vec<Frame>) -> Result<Self, AssetError> {
        let mut frames: Vec<AnimatedFrame> = frames
            .into_iter()
            .map(|frame| {
                let delay = Duration::from(frame.delay());
                AnimatedFrame {
                    image: frame.into_buffer(),
                    delay: if delay.is_zero() {
                        DEFAULT_FRAME_DELAY
                    } else {
                        delay
                    },
                }
            })
            .collect();

        let Some(first) = frames.first() else {
            return Err(AssetError::Empty);
        };
        let expected = first.image.dimensions();
        for (index, frame) in frames.iter().enumerate() {
            let got = frame.image.dimensions();
            if got != expected {
                return Err(AssetError::FrameSize {
                    index,
                    expected,
                    got,
                });
            }
        }

        if frames.len() == 1 {
            return Ok(Self::Still(frames.remove(0).image).limit_size(MAX_TEXTURE_SIZE));
        }
        Ok(Self::Animated(Animation { frames }).limit_size(MAX_TEXTURE_SIZE))
    }

    /// Scale down, keeping the aspect ratio, so neither edge exceeds `max`.
    pub fn limit_size(self, max: u32) -> Self {
        let (w, h) = self.dimensions();
        if w <= max && h <= max {
            return self;
        }
        let scale = max as f32 / w.max(h) as f32;
        let nw = ((w as f32 * scale).round() as u32).clamp(1, max);
        let nh = ((h as f32 * scale).round() as u32).clamp(1, max);
        tracing::debug!("scaling texture from {w}x{h} to {nw}x{nh}");
        let shrink = |image: &RgbaImage| image::imageops::resize(image, nw, nh, FilterType::Triangle);
        match self {
            Self::Still(image) => Self::Still(shrink(&image)),
            Self::Animated(animation) => Self::Animated(Animation {
                frames: animation
                    .frames
                    .into_iter()
                    .map(|f| AnimatedFrame {
                        image: shrink(&f.image),
                        delay: f.delay,
                    })
                    .collect(),
            }),
        }
    }

    /// Build an animation from already decoded frames.
    pub fn animated(frames: Vec<AnimatedFrame>) -> Result<Self, AssetError> {
        Self::from_frames(
            frames
                .into_iter()
                .map(|f| {
                    Frame::from_parts(
                        f.image,
                        0,
                        0,
                        image::Delay::from_saturating_duration(f.delay),
                    )
                })
                .collect(),
        )
    }

    /// Square checkerboard, used when a texture cannot be loaded.
    pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let image = RgbaImage::from_fn(size, size, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Rgba(a)
            } else {
                Rgba(b)
            }
        });
        Self::Still(image)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frame(0).dimensions()
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    pub fn frame_count(&self) -> usize {
        match self {
            Self::Still(_) => 1,
            Self::Animated(animation) => animation.frames.len(),
        }
    }

    /// Pixels of the given frame; the index wraps around.
    pub fn frame(&self, index: usize) -> &RgbaImage {
        match self {
            Self::Still(image) => image,
            Self::Animated(animation) => {
                let frames = &animation.frames;
                &frames[index % frames.len()].image
            }
        }
    }

    /// Total length of one loop of the animation (zero for stills).
    pub fn loop_duration(&self) -> Duration {
        match self {
            Self::Still(_) => Duration::ZERO,
            Self::Animated(animation) => animation.frames.iter().map(|f| f.delay).sum(),
        }
    }

    /// Index of the frame showing `elapsed` after playback started, looping.
    pub fn frame_at(&self, elapsed: Duration) -> usize {
        let Self::Animated(Animation { frames }) = self else {
            return 0;
        };
        let total = self.loop_duration();
        if total.is_zero() {
            return 0;
        }
        let mut t = Duration::from_nanos((elapsed.as_nanos() % total.as_nanos()) as u64);
        for (index, frame) in frames.iter().enumerate() {
            if t < frame.delay {
                return index;
            }
            t -= frame.delay;
        }
        frames.len() - 1
    }
}
