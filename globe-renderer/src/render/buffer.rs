use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// GPU buffer that grows to fit whatever slice is written into it.
pub struct Buffer {
    pub raw: wgpu::Buffer,
    label: &'static str,
    capacity: u64,
    usage: wgpu::BufferUsages,
}

impl Buffer {
    pub fn empty(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        Self {
            raw: Self::allocate(device, label, 0, usage),
            label,
            capacity: 0,
            usage,
        }
    }

    pub fn with_contents<T: Pod>(
        device: &wgpu::Device,
        label: &'static str,
        contents: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(contents);
        Self {
            raw: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage,
            }),
            label,
            capacity: bytes.len() as u64,
            usage,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    /// Replaces the buffer contents, reallocating when they don't fit.
    /// Returns the number of elements now in the buffer.
    pub fn write<T: Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        contents: &[T],
    ) -> u32 {
        let bytes: &[u8] = bytemuck::cast_slice(contents);
        if bytes.is_empty() {
            return 0;
        }

        let size = bytes.len() as u64;
        if size > self.capacity {
            log::debug!("Growing {} from {} to {size} bytes", self.label, self.capacity);
            self.raw = Self::allocate(device, self.label, size, self.usage);
            self.capacity = size;
        }
        queue.write_buffer(&self.raw, 0, bytes);

        contents.len() as u32
    }
}
