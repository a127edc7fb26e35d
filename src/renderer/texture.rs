//! Asynchronous texture loading with last-load-wins invalidation.
//!
//! Image decode runs on a background thread; completion is delivered back
//! to the event loop through a channel carrying a generation counter, so a
//! superseding load invalidates the effect of any earlier one still in
//! flight. Decode failure logs a warning and leaves the placeholder bound.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Decoded RGBA8 image plus the load generation that produced it.
pub struct DecodedImage {
    pub generation: u64,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Hands decode work to background threads and filters stale completions.
pub struct TextureLoader {
    sender: Sender<DecodedImage>,
    receiver: Receiver<DecodedImage>,
    generation: u64,
}

impl TextureLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            generation: 0,
        }
    }

    /// Start decoding `path`. Any load still in flight is superseded.
    pub fn request(&mut self, path: PathBuf) {
        self.generation += 1;
        let generation = self.generation;
        let sender = self.sender.clone();
        thread::spawn(move || match image::open(&path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                // a closed receiver means the viewer shut down; nothing to do
                let _ = sender.send(DecodedImage {
                    generation,
                    width,
                    height,
                    rgba: rgba.into_raw(),
                });
            }
            Err(err) => {
                log::warn!("texture decode failed for {}: {}", path.display(), err);
            }
        });
    }

    /// Poll for a finished decode. Results of superseded loads are dropped.
    pub fn poll(&mut self) -> Option<DecodedImage> {
        let mut latest = None;
        while let Ok(img) = self.receiver.try_recv() {
            if img.generation == self.generation {
                latest = Some(img);
            } else {
                log::debug!(
                    "discarding stale texture load (generation {} of {})",
                    img.generation,
                    self.generation
                );
            }
        }
        latest
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a GPU texture from RGBA8 pixels and return its view.
pub fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    rgba: &[u8],
    width: u32,
    height: u32,
    label: &str,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
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
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// 1x1 white texture bound until a real image arrives, so a slow or failed
/// load degrades to an untextured Phong draw.
pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
    upload_rgba(device, queue, &[255, 255, 255, 255], 1, 1, "surface-texture-placeholder")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_generations_are_discarded() {
        let mut loader = TextureLoader::new();
        // simulate two overlapping loads completing out of order
        loader.generation = 2;
        loader
            .sender
            .send(DecodedImage {
                generation: 2,
                width: 1,
                height: 1,
                rgba: vec![0; 4],
            })
            .unwrap();
        loader
            .sender
            .send(DecodedImage {
                generation: 1,
                width: 1,
                height: 1,
                rgba: vec![0; 4],
            })
            .unwrap();
        let got = loader.poll().expect("current generation should survive");
        assert_eq!(got.generation, 2);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn missing_file_does_not_deliver() {
        let mut loader = TextureLoader::new();
        loader.request(PathBuf::from("/nonexistent/definitely-missing.png"));
        // decode fails on the worker; the channel stays quiet
        std::thread::sleep(std::time::Duration::from_millis(200));
        assert!(loader.poll().is_none());
    }
}
