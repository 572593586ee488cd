//! The frame source boundary the pipeline driver consumes. The actual
//! capture device (a V4L2 memory-mapped YUYV stream, typically) is an
//! external collaborator; this module only defines the contract and
//! ships an in-memory fixture standing in for it in tests and the CLI.

use std::collections::VecDeque;

use crate::error::{Error, Result};

/// A source of interleaved YUV 4:2:2 frame buffers, each `2*w*h` bytes.
///
/// Mirrors a V4L2 mmap-capture device: `dequeue` blocks (bounded by a
/// timeout) until a filled buffer is available and returns its index;
/// the pipeline reads the buffer's bytes via [`FrameSource::buffer`] and
/// must hand the index back via [`FrameSource::enqueue`] before the
/// frame is considered complete.
pub trait FrameSource {
    fn open(&mut self, path: &str, w: u32, h: u32, fps: u32) -> Result<()>;
    fn set_control(&mut self, id: i32, value: i32) -> Result<()>;
    fn get_control(&self, id: i32) -> Result<i32>;
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    /// Blocks up to [`crate::constants::DEQUEUE_TIMEOUT_SECS`] for a
    /// filled buffer, returning its index.
    fn dequeue(&mut self) -> Result<usize>;
    /// Borrows the bytes of a dequeued buffer.
    fn buffer(&self, index: usize) -> &[u8];
    fn enqueue(&mut self, index: usize) -> Result<()>;
}

/// An in-memory stand-in for a capture device: a small fixed pool of
/// buffers (3, matching the original source's request count), filled by
/// [`MemoryFrameSource::push_frame`] ahead of a `dequeue` call and
/// cycled back to the available pool on `enqueue`.
///
/// This is a test/demo fixture, not a device driver — `dequeue` never
/// actually blocks; it returns a `DeviceIo` error immediately if no
/// frame has been queued, instead of waiting out the 2-second timeout a
/// real device boundary would.
pub struct MemoryFrameSource {
    opened: bool,
    started: bool,
    width: u32,
    height: u32,
    buffers: Vec<Vec<u8>>,
    pending: VecDeque<usize>,
    available: VecDeque<usize>,
    controls: std::collections::HashMap<i32, i32>,
}

const BUFFER_COUNT: usize = 3;

impl MemoryFrameSource {
    pub fn new() -> Self {
        Self {
            opened: false,
            started: false,
            width: 0,
            height: 0,
            buffers: Vec::new(),
            pending: VecDeque::new(),
            available: VecDeque::new(),
            controls: std::collections::HashMap::new(),
        }
    }

    /// Copies `data` (expected `2*w*h` bytes) into the next available
    /// buffer slot and marks it ready for `dequeue`.
    pub fn push_frame(&mut self, data: &[u8]) -> Result<()> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        let slot = self.available.pop_front().ok_or_else(|| {
            Error::DeviceIo("no free buffer to fill (all 3 outstanding)".to_owned())
        })?;
        let n = data.len().min(self.buffers[slot].len());
        self.buffers[slot][..n].copy_from_slice(&data[..n]);
        self.pending.push_back(slot);
        Ok(())
    }
}

impl Default for MemoryFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MemoryFrameSource {
    fn open(&mut self, _path: &str, w: u32, h: u32, _fps: u32) -> Result<()> {
        self.width = w;
        self.height = h;
        let frame_len = 2 * (w as usize) * (h as usize);
        self.buffers = (0..BUFFER_COUNT).map(|_| vec![0u8; frame_len]).collect();
        self.pending.clear();
        self.available = (0..BUFFER_COUNT).collect();
        self.opened = true;
        Ok(())
    }

    fn set_control(&mut self, id: i32, value: i32) -> Result<()> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        self.controls.insert(id, value);
        Ok(())
    }

    fn get_control(&self, id: i32) -> Result<i32> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        Ok(*self.controls.get(&id).unwrap_or(&-1))
    }

    fn start(&mut self) -> Result<()> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        self.started = false;
        Ok(())
    }

    fn dequeue(&mut self) -> Result<usize> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        self.pending
            .pop_front()
            .ok_or_else(|| Error::DeviceIo("dequeue timed out: no frame queued".to_owned()))
    }

    fn buffer(&self, index: usize) -> &[u8] {
        &self.buffers[index]
    }

    fn enqueue(&mut self, index: usize) -> Result<()> {
        if !self.opened {
            return Err(Error::NotOpen);
        }
        self.available.push_back(index);
        Ok(())
    }
}
