use super::{AnyBuffer, Buffer, Element, Result};

/// A typed accessor bound to the storage of one container.
///
/// Containers store their buffers with the element type erased. An image
/// binds a `LinkedType` once, when it is constructed, so that element access
/// does not need to check the element type again.
#[derive(Debug, Clone)]
pub struct LinkedType<T> {
    buffers: Box<[Buffer<T>]>,
}

impl<T: Element> LinkedType<T> {
    /// Binds to `buffers`, failing with `TypeMismatch` if any of them does not
    /// store `T`s. The buffers are shared, not copied.
    pub fn bind<'a>(buffers: impl IntoIterator<Item=&'a AnyBuffer>) -> Result<Self> {
        let buffers = buffers.into_iter()
            .map(|b| b.typed::<T>().cloned())
            .collect::<Result<_>>()?;
        Ok(Self {buffers})
    }

    /// The bound buffers, in storage order.
    pub fn buffers(&self) -> &[Buffer<T>] { &self.buffers }

    /// Reads element `offset` of buffer `buffer`.
    #[inline(always)]
    pub fn get(&self, (buffer, offset): (usize, usize)) -> T {
        self.buffers[buffer].get(offset)
    }

    /// Writes element `offset` of buffer `buffer`.
    #[inline(always)]
    pub fn set(&self, (buffer, offset): (usize, usize), value: T) {
        self.buffers[buffer].set(offset, value)
    }
}

// ----------------------------------------------------------------------------
