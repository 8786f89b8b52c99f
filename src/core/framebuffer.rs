use crate::core::color::to_rgb8;
use atomic_float::AtomicF32;
use nalgebra::Vector3;
use std::sync::Mutex;
use std::sync::atomic::Ordering;

/// Number of striped locks guarding depth-test-then-write sequences.
const LOCK_COUNT: usize = 1024;

/// Represents a 2D buffer containing color and depth information.
///
/// Pixels are addressed by `(col, row)` with row 0 at the bottom of the image.
/// Thread-safe for parallel rendering: cells are atomics and the depth compare plus
/// color write of one pixel happens under a striped lock.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Linear RGB per pixel, row-major.
    color_buffer: Vec<[AtomicF32; 3]>,

    /// NDC depth per pixel; smaller is closer.
    depth_buffer: Vec<AtomicF32>,

    /// Striped locks to make depth-test-and-write atomic per pixel.
    /// We map pixel coordinates to a lock index to reduce contention.
    locks: Vec<Mutex<()>>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        let color_buffer = (0..size)
            .map(|_| [AtomicF32::new(0.0), AtomicF32::new(0.0), AtomicF32::new(0.0)])
            .collect();
        let depth_buffer = (0..size).map(|_| AtomicF32::new(f32::INFINITY)).collect();
        let locks = (0..LOCK_COUNT).map(|_| Mutex::new(())).collect();

        Self {
            width,
            height,
            color_buffer,
            depth_buffer,
            locks,
        }
    }

    /// Resets every pixel to `color` and every depth to `depth`.
    pub fn clear(&mut self, color: Vector3<f32>, depth: f32) {
        for idx in 0..self.color_buffer.len() {
            self.store_color(idx, color);
        }
        for d in &self.depth_buffer {
            d.store(depth, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height
    }

    #[inline(always)]
    fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[inline(always)]
    fn store_color(&self, idx: usize, color: Vector3<f32>) {
        let cell = &self.color_buffer[idx];
        cell[0].store(color.x, Ordering::Relaxed);
        cell[1].store(color.y, Ordering::Relaxed);
        cell[2].store(color.z, Ordering::Relaxed);
    }

    /// Current stored depth, or `None` outside the buffer.
    #[inline]
    pub fn depth_at(&self, col: usize, row: usize) -> Option<f32> {
        if !self.in_bounds(col, row) {
            return None;
        }
        Some(self.depth_buffer[self.index(col, row)].load(Ordering::Relaxed))
    }

    /// Thread-safe depth test and update.
    ///
    /// Writes `depth` and `color` only if `depth` is strictly less than the stored depth,
    /// so among equal depths the first writer wins. Returns whether the write happened.
    #[inline]
    pub fn depth_test_and_set(
        &self,
        col: usize,
        row: usize,
        depth: f32,
        color: Vector3<f32>,
    ) -> bool {
        if !self.in_bounds(col, row) {
            return false;
        }
        let idx = self.index(col, row);
        let lock_idx = idx % self.locks.len();
        let _guard = self.locks[lock_idx]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let depth_cell = &self.depth_buffer[idx];
        if !(depth < depth_cell.load(Ordering::Relaxed)) {
            return false; // Failed test
        }
        depth_cell.store(depth, Ordering::Relaxed);
        self.store_color(idx, color);
        true
    }

    /// Unconditional pixel write (no depth test), used by wireframe drawing.
    #[inline]
    pub fn set_pixel(&self, col: usize, row: usize, color: Vector3<f32>) {
        if self.in_bounds(col, row) {
            self.store_color(self.index(col, row), color);
        }
    }

    pub fn get_pixel(&self, col: usize, row: usize) -> Option<Vector3<f32>> {
        if !self.in_bounds(col, row) {
            return None;
        }
        let cell = &self.color_buffer[self.index(col, row)];
        Some(Vector3::new(
            cell[0].load(Ordering::Relaxed),
            cell[1].load(Ordering::Relaxed),
            cell[2].load(Ordering::Relaxed),
        ))
    }

    /// Packs the image as RGB8 triples, rows from the top of the image (NDC y = +1) down.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width * self.height * 3);
        for row in (0..self.height).rev() {
            for col in 0..self.width {
                if let Some(color) = self.get_pixel(col, row) {
                    bytes.extend_from_slice(&to_rgb8(color));
                }
            }
        }
        bytes
    }
}
