//! # Dilated Queue
//!
//! Per-layer circular buffer used during sample-by-sample generation.
//!
//! Each generation step a layer writes its newest input column with
//! [`DilatedQueue::enqueue`] and reads back the strided window its dilated
//! kernel needs with [`DilatedQueue::dequeue`]. Both are O(1) in the
//! sequence length; the buffer never grows.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use tracing::debug;

use super::window::StridedWindow;
use crate::error::{Result, WaveNetError};

/// Fixed-capacity circular buffer of shape (channels, max_length)
#[derive(Debug, Clone)]
pub struct DilatedQueue {
    data: Array2<f64>,
    in_pos: usize,
    out_pos: usize,
    num_deq: usize,
    dilation: usize,
    max_length: usize,
    num_channels: usize,
}

impl DilatedQueue {
    /// Create a zeroed queue.
    ///
    /// `dilation` and `num_deq` are the defaults for [`dequeue_default`]
    /// and fix the smallest window the capacity has to hold.
    ///
    /// [`dequeue_default`]: DilatedQueue::dequeue_default
    pub fn new(max_length: usize, num_channels: usize, dilation: usize, num_deq: usize) -> Result<Self> {
        Self::with_data(Array2::zeros((num_channels, max_length)), dilation, num_deq)
    }

    /// Adopt an existing (channels, max_length) buffer
    pub fn with_data(data: Array2<f64>, dilation: usize, num_deq: usize) -> Result<Self> {
        let (num_channels, max_length) = data.dim();
        if num_channels == 0 || dilation == 0 || num_deq == 0 {
            return Err(WaveNetError::InvalidInput(format!(
                "queue needs channels, dilation and num_deq > 0 (got {}, {}, {})",
                num_channels, dilation, num_deq
            )));
        }
        Self::check_capacity(max_length, num_deq, dilation)?;

        Ok(Self {
            data,
            in_pos: 0,
            out_pos: 0,
            num_deq,
            dilation,
            max_length,
            num_channels,
        })
    }

    /// Fails unless a window of `num_deq` taps at `dilation` fits in `max_length`
    pub fn check_capacity(max_length: usize, num_deq: usize, dilation: usize) -> Result<()> {
        let required = StridedWindow::required_capacity(num_deq, dilation);
        if max_length < required {
            return Err(WaveNetError::InsufficientCapacity {
                required,
                capacity: max_length,
            });
        }
        Ok(())
    }

    /// Write one (channels,) column at `in_pos` and advance it
    pub fn enqueue(&mut self, sample: ArrayView1<f64>) -> Result<()> {
        if sample.len() != self.num_channels {
            return Err(WaveNetError::shape([self.num_channels], sample.shape()));
        }
        self.data.column_mut(self.in_pos).assign(&sample);
        self.in_pos = (self.in_pos + 1) % self.max_length;
        Ok(())
    }

    /// Read `num_deq` entries spaced `dilation` apart, ending at `out_pos`,
    /// oldest first, then advance `out_pos`.
    ///
    /// Returns a (channels, num_deq) copy; the buffer is not modified.
    ///
    /// Precondition: `max_length >= dilation * (num_deq - 1) + 1`. Only
    /// checked in debug builds; [`check_capacity`] validates a pair ahead
    /// of time.
    ///
    /// [`check_capacity`]: DilatedQueue::check_capacity
    pub fn dequeue(&mut self, num_deq: usize, dilation: usize) -> Array2<f64> {
        let window = StridedWindow::new(self.out_pos, num_deq, dilation, self.max_length);
        let indices: Vec<usize> = window.indices().collect();
        let out = self.data.select(Axis(1), &indices);

        self.out_pos = (self.out_pos + 1) % self.max_length;
        out
    }

    /// [`dequeue`](DilatedQueue::dequeue) with the queue's own `num_deq` and `dilation`
    pub fn dequeue_default(&mut self) -> Array2<f64> {
        self.dequeue(self.num_deq, self.dilation)
    }

    /// Zero the buffer and rewind both cursors
    pub fn reset(&mut self) {
        debug!(
            channels = self.num_channels,
            max_length = self.max_length,
            dilation = self.dilation,
            "resetting dilated queue"
        );
        self.data.fill(0.0);
        self.in_pos = 0;
        self.out_pos = 0;
    }

    pub fn in_pos(&self) -> usize {
        self.in_pos
    }

    pub fn out_pos(&self) -> usize {
        self.out_pos
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn dilation(&self) -> usize {
        self.dilation
    }

    pub fn num_deq(&self) -> usize {
        self.num_deq
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}
