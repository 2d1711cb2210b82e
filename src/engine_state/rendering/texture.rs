//! Texture handling for the rendering pipeline.
//!
//! This module decodes the block atlas into an RGBA8 pixel buffer and creates the GPU
//! textures the renderer samples from and depth-tests against.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

use super::meshing::face::ATLAS_CELLS;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded texture atlas of 16x16 equally sized cells.
#[derive(Debug, Clone)]
pub struct AtlasImage {
    /// RGBA8 pixels, row 0 at the top.
    pub image: RgbaImage,
}

impl AtlasImage {
    /// Loads and decodes an atlas image from disk.
    ///
    /// # Arguments
    /// * `path` - Path to a PNG file
    ///
    /// # Returns
    /// The decoded atlas, or the decoder's error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::from_rgba(image))
    }

    /// A plain white atlas, bound until the real one is uploaded.
    pub fn blank() -> Self {
        Self::from_rgba(RgbaImage::from_pixel(
            ATLAS_CELLS as u32,
            ATLAS_CELLS as u32,
            image::Rgba([255, 255, 255, 255]),
        ))
    }

    fn from_rgba(image: RgbaImage) -> Self {
        if image.width() % ATLAS_CELLS as u32 != 0 || image.height() % ATLAS_CELLS as u32 != 0 {
            log::warn!(
                "Atlas size {}x{} is not a multiple of {} cells",
                image.width(),
                image.height(),
                ATLAS_CELLS
            );
        }
        AtlasImage { image }
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGBA8 bytes, tightly packed.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Texture extent for a GPU upload.
    pub fn extent(&self) -> wgpu::Extent3d {
        let (width, height) = self.dimensions();
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        }
    }
}

/// A GPU texture together with its view and sampler.
pub struct Texture {
    /// The underlying WebGPU texture resource.
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    /// The texture view used for binding the texture to the pipeline.
    pub view: wgpu::TextureView,
    /// The sampler used for texture filtering and addressing.
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface size.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads the block atlas as an sRGB texture with nearest-neighbor sampling.
    pub fn from_atlas(device: &wgpu::Device, queue: &wgpu::Queue, atlas: &AtlasImage) -> Self {
        let size = atlas.extent();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Atlas Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}
