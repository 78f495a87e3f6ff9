// Copyright 2026 The Flatser Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The buffer contract (spec §4.1) and two concrete policies: a growing heap
//! buffer and a fixed-capacity buffer. Writers are generic over any
//! implementation; the layout engine never downcasts to a concrete type.

use crate::error::Error;

/// Storage that a writer can size and grow while serialising.
///
/// Implementations may reallocate on [`extend`](Buffer::extend); callers must
/// not cache a pointer or slice across a call to it. On failure the buffer's
/// observable state is unchanged (strong exception guarantee) — a growing
/// buffer that fails to allocate, or a fixed buffer that has no room left,
/// leaves `span()` exactly as it was before the call.
pub trait Buffer {
    /// Sets the logical size to exactly `size` bytes, discarding any previous
    /// content. Fails with [`Error::CapacityExceeded`] if `size` cannot be
    /// accommodated.
    fn initialise(&mut self, size: usize) -> Result<(), Error>;

    /// Grows the logical size by `count` bytes, preserving existing content.
    /// Fails with [`Error::CapacityExceeded`] if the new size cannot be
    /// accommodated.
    fn extend(&mut self, count: usize) -> Result<(), Error>;

    /// The current contents, read-only.
    fn span(&self) -> &[u8];

    /// The current contents, mutable.
    fn span_mut(&mut self) -> &mut [u8];
}

/// A growing heap buffer backed by a `Vec<u8>`. Doubles (times a geometric
/// factor of at least 1.5) whenever more capacity is needed, the same policy
/// the teacher's own growable containers use.
#[derive(Debug, Default, Clone)]
pub struct HeapBuffer {
    data: Vec<u8>,
}

impl HeapBuffer {
    /// Creates an empty buffer that preallocates `reserved_size` bytes of
    /// capacity up front, to avoid reallocating during the first serialise.
    pub fn with_capacity(reserved_size: usize) -> Self {
        HeapBuffer { data: Vec::with_capacity(reserved_size) }
    }

    fn grow_capacity_for(&mut self, needed: usize) {
        if self.data.capacity() < needed {
            let grown = ((self.data.capacity() as f64) * 1.5) as usize;
            self.data.reserve(grown.max(needed) - self.data.len());
        }
    }
}

impl Buffer for HeapBuffer {
    fn initialise(&mut self, size: usize) -> Result<(), Error> {
        self.grow_capacity_for(size);
        self.data.clear();
        self.data.resize(size, 0);
        Ok(())
    }

    fn extend(&mut self, count: usize) -> Result<(), Error> {
        let new_len = self.data.len() + count;
        self.grow_capacity_for(new_len);
        self.data.resize(new_len, 0);
        Ok(())
    }

    fn span(&self) -> &[u8] {
        &self.data
    }

    fn span_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// A buffer over a fixed-size, caller-owned byte array. Never reallocates;
/// any growth past `capacity()` fails with [`Error::CapacityExceeded`]. Used
/// by tests and benchmarks that want to observe allocation-free serialising
/// into preallocated storage.
#[derive(Debug)]
pub struct FixedBuffer {
    data: Box<[u8]>,
    used: usize,
}

impl FixedBuffer {
    /// Creates a buffer with the given fixed capacity, all bytes zeroed.
    pub fn new(capacity: usize) -> Self {
        FixedBuffer { data: vec![0u8; capacity].into_boxed_slice(), used: 0 }
    }

    /// The total number of bytes this buffer can ever hold.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl Buffer for FixedBuffer {
    fn initialise(&mut self, size: usize) -> Result<(), Error> {
        if size > self.data.len() {
            log::debug!("fixed buffer capacity {} exceeded by initialise({size})", self.data.len());
            return Err(Error::CapacityExceeded { requested: size, capacity: self.data.len() });
        }
        self.used = size;
        Ok(())
    }

    fn extend(&mut self, count: usize) -> Result<(), Error> {
        let new_used = self.used + count;
        if new_used > self.data.len() {
            log::debug!("fixed buffer capacity {} exceeded by extend to {new_used}", self.data.len());
            return Err(Error::CapacityExceeded { requested: new_used, capacity: self.data.len() });
        }
        self.used = new_used;
        Ok(())
    }

    fn span(&self) -> &[u8] {
        &self.data[..self.used]
    }

    fn span_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.used]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_buffer_initialise_replaces_content() {
        let mut buffer = HeapBuffer::default();
        buffer.initialise(4).unwrap();
        buffer.span_mut().copy_from_slice(&[1, 2, 3, 4]);
        buffer.initialise(2).unwrap();
        assert_eq!(buffer.span().len(), 2);
    }

    #[test]
    fn heap_buffer_extend_preserves_content() {
        let mut buffer = HeapBuffer::default();
        buffer.initialise(2).unwrap();
        buffer.span_mut().copy_from_slice(&[9, 8]);
        buffer.extend(2).unwrap();
        assert_eq!(&buffer.span()[..2], &[9, 8]);
        assert_eq!(buffer.span().len(), 4);
    }

    #[test]
    fn fixed_buffer_rejects_growth_past_capacity() {
        let mut buffer = FixedBuffer::new(4);
        buffer.initialise(4).unwrap();
        assert!(matches!(buffer.extend(1), Err(Error::CapacityExceeded { .. })));
        // Failed extend must not change the observable state.
        assert_eq!(buffer.span().len(), 4);
    }

    #[test]
    fn fixed_buffer_rejects_oversized_initialise() {
        let mut buffer = FixedBuffer::new(2);
        assert!(matches!(buffer.initialise(3), Err(Error::CapacityExceeded { .. })));
    }
}
