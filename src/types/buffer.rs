//! Reference-counted byte buffers shared by zero or more views

use std::sync::Arc;

/// Compute backend a buffer lives on
///
/// `copy_to` on a view is the only sanctioned way to move bytes between
/// backends. The CUDA backend is recognized by the tag but its kernels are
/// not linked into this build, so transfers involving it fail atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cpu,
    Cuda,
}

/// An opaque, reference-counted block of raw bytes
///
/// Buffers are written only at creation time (allocation, gather, merge,
/// reduce, backend copy) and never mutated afterwards, so any number of views
/// may alias one buffer and concurrent readers never race.
#[derive(Debug, Clone)]
pub struct Buffer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    bytes: Vec<u8>,
    backend: Backend,
}

impl Buffer {
    /// Wrap freshly produced bytes as an immutable CPU buffer
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::with_backend(bytes, Backend::Cpu)
    }

    pub fn with_backend(bytes: Vec<u8>, backend: Backend) -> Self {
        Buffer {
            inner: Arc::new(Inner { bytes, backend }),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    pub fn len(&self) -> usize {
        self.inner.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bytes.is_empty()
    }

    pub fn backend(&self) -> Backend {
        self.inner.backend
    }

    /// Whether two handles share one allocation (used to verify zero-copy)
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliasing() {
        let a = Buffer::from_bytes(vec![1, 2, 3]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(b.bytes(), &[1, 2, 3]);

        let c = Buffer::from_bytes(vec![1, 2, 3]);
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn backend_tag() {
        let a = Buffer::from_bytes(vec![]);
        assert_eq!(a.backend(), Backend::Cpu);
        assert!(a.is_empty());
    }
}
