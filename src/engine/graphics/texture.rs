use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{info, warn};
use wgpu;

use crate::game::catalog::{Color, Item};

/// Side length of a composed icon texture
pub const ICON_SIZE: u32 = 150;
/// Side length of the item artwork inside the icon
pub const ARTWORK_SIZE: u32 = 120;
/// Alpha of the colored disc behind the artwork
pub const HALO_ALPHA: f32 = 0.2;

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
}

impl Texture {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Icon Texture Bind Group Layout"),
            entries: &[
                // Texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &RgbaImage,
        label: &str,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let dimensions = rgba.dimensions();
        let texture_size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some(label),
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            texture_size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Icons get scaled by the bounce, so filter linearly
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            texture,
            view,
            bind_group,
        }
    }
}

/// Build the icon for `item`: a faint disc of its color with the artwork on top.
///
/// Missing or unreadable artwork is replaced by a solid disc of the item color.
pub fn compose_icon(item: &Item, size: u32) -> RgbaImage {
    let mut icon = RgbaImage::new(size, size);
    fill_disc(&mut icon, size as f32 / 2.0, item.color.with_alpha(HALO_ALPHA));

    let artwork = size * ARTWORK_SIZE / ICON_SIZE;
    let inset = ((size - artwork) / 2) as i64;

    let loaded = item.image.and_then(|path| match image::open(path) {
        Ok(img) => {
            info!("[texture] Loaded {} artwork from {}", item.name, path);
            Some(img.to_rgba8())
        }
        Err(e) => {
            warn!("[texture] Could not load {} ({}), drawing placeholder", path, e);
            None
        }
    });

    match loaded {
        Some(img) => {
            let scaled = imageops::resize(&img, artwork, artwork, FilterType::Triangle);
            imageops::overlay(&mut icon, &scaled, inset, inset);
        }
        None => fill_disc(&mut icon, artwork as f32 / 2.0, item.color.with_alpha(1.0)),
    }
    icon
}

fn fill_disc(img: &mut RgbaImage, radius: f32, color: Color) {
    let center = img.width() as f32 / 2.0;
    let pixel = Rgba(color.to_rgba8());
    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        if dx * dx + dy * dy <= radius * radius {
            *px = pixel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{Instrument, SoundSource};

    fn item(image: Option<&'static str>) -> Item {
        Item {
            name: "drum",
            image,
            color: Color::from_argb(0xFF2196F3),
            sound: SoundSource::Synth(Instrument::Drum),
        }
    }

    #[test]
    fn placeholder_has_solid_center_and_faint_halo() {
        let icon = compose_icon(&item(None), ICON_SIZE);
        assert_eq!(icon.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(icon.get_pixel(75, 75).0, [0x21, 0x96, 0xF3, 0xFF]);
        // Between the artwork and the halo edge
        assert_eq!(icon.get_pixel(5, 75).0, [0x21, 0x96, 0xF3, 51]);
        assert_eq!(icon.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn unreadable_image_falls_back() {
        let icon = compose_icon(&item(Some("/nonexistent/drum.png")), ICON_SIZE);
        assert_eq!(icon.get_pixel(75, 75).0, [0x21, 0x96, 0xF3, 0xFF]);
    }

    #[test]
    fn artwork_is_scaled_into_the_center() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let path: &'static str = Box::leak(path.to_string_lossy().into_owned().into_boxed_str());

        let icon = compose_icon(&item(Some(path)), ICON_SIZE);
        assert_eq!(icon.get_pixel(75, 75).0, [255, 0, 0, 255]);
        assert_eq!(icon.get_pixel(16, 16).0, [255, 0, 0, 255]);
        // Outside the 120px artwork only the halo shows
        assert_eq!(icon.get_pixel(5, 75).0[3], 51);
    }
}
