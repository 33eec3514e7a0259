use glam::{IVec2, UVec2};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, Texture};

/// Per-quad uniform: clip-space rectangle (left, top, right, bottom)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Placement {
    pub rect: [f32; 4],
}

impl Placement {
    /// Map a pixel rectangle of the viewport into clip space
    pub fn for_rect(position: IVec2, size: UVec2, viewport: UVec2) -> Self {
        let vw = viewport.x.max(1) as f32;
        let vh = viewport.y.max(1) as f32;
        let left = position.x as f32 / vw * 2.0 - 1.0;
        let right = (position.x as f32 + size.x as f32) / vw * 2.0 - 1.0;
        let top = 1.0 - position.y as f32 / vh * 2.0;
        let bottom = 1.0 - (position.y as f32 + size.y as f32) / vh * 2.0;
        Self {
            rect: [left, top, right, bottom],
        }
    }

    /// The whole viewport
    pub fn fullscreen() -> Self {
        Self {
            rect: [-1.0, 1.0, 1.0, -1.0],
        }
    }
}

/// Render pipeline drawing textured, uniform-placed quads
///
/// Shared by the hardware plane device (one quad per plane) and the software
/// presenter (one fullscreen quad).
pub struct QuadPipeline {
    pipeline: RenderPipeline,
    layout: BindGroupLayout,
    sampler: Sampler,
    texture_format: wgpu::TextureFormat,
}

/// A texture plus the uniform that places it on screen
pub struct TexturedQuad {
    texture: Texture,
    placement: Buffer,
    bind_group: BindGroup,
    size: UVec2,
}

impl QuadPipeline {
    pub fn new(device: &Device, surface_format: wgpu::TextureFormat, blend: wgpu::BlendState) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Plane Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../plane.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Plane Quad Bind Group Layout"),
            entries: &[
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
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Plane Quad Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Plane Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Planes are placed on whole pixels, so sample without filtering
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Plane Quad Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let texture_format = if surface_format.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        Self {
            pipeline,
            layout,
            sampler,
            texture_format,
        }
    }

    /// Allocate a quad backed by a `size` texture
    pub fn create_quad(&self, device: &Device, size: UVec2, label: &str) -> TexturedQuad {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.texture_format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let placement = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&Placement::fullscreen()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: placement.as_entire_binding(),
                },
            ],
        });

        TexturedQuad {
            texture,
            placement,
            bind_group,
            size,
        }
    }

    /// Record one quad draw into an open render pass
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, quad: &TexturedQuad) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &quad.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}

impl TexturedQuad {
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Upload RGBA pixels covering the whole texture
    pub fn upload(&self, queue: &Queue, pixels: &[u8]) {
        queue.write_texture(
            self.texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.x),
                rows_per_image: Some(self.size.y),
            },
            wgpu::Extent3d {
                width: self.size.x,
                height: self.size.y,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Move the quad; a 16 byte uniform write
    pub fn place(&self, queue: &Queue, placement: Placement) {
        queue.write_buffer(&self.placement, 0, bytemuck::bytes_of(&placement));
    }
}
