use crate::Error;
use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// Uninitialized memory for a fixed number of `T` slots.
///
/// The block never constructs, reads or drops a `T`. Whatever lives in the
/// slots is the business of the owner, which must destroy every live element
/// before the block is dropped or swapped away. Dropping a block only
/// returns its bytes to the allocator.
///
/// A block with zero capacity holds no allocation, and neither does a block
/// of zero-sized elements.
pub struct Block<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for Block<T> {}
unsafe impl<T: Sync> Sync for Block<T> {}

impl<T> Block<T> {
    /// Empty block, no allocation.
    pub const fn new() -> Block<T> {
        Block {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Block<T>, Error> {
        if capacity == 0 {
            return Ok(Block::new());
        }
        if mem::size_of::<T>() == 0 {
            return Ok(Block {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        let layout = Self::layout_for(capacity)?;
        let raw = unsafe { alloc::alloc(layout) } as *mut T;
        let ptr = NonNull::new(raw).ok_or(Error::OutOfMemory { bytes: layout.size() })?;
        debug!("allocate block of {} items ({} bytes)", capacity, layout.size());

        Ok(Block {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    fn layout_for(capacity: usize) -> Result<Layout, Error> {
        Layout::array::<T>(capacity).map_err(|_| Error::CapacityOverflow { requested: capacity })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if the block owns an allocation that is released on drop.
    #[inline(always)]
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0 && mem::size_of::<T>() != 0
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of slot `index`. The slot is not required to be initialized.
    ///
    /// # Safety
    ///
    /// `index` must not exceed `capacity`. The one-past-the-end address is
    /// allowed but must not be dereferenced.
    #[inline(always)]
    pub unsafe fn address_at(&self, index: usize) -> *const T {
        debug_assert!(index <= self.capacity, "address_at index <= capacity");
        self.ptr.as_ptr().add(index)
    }

    /// Mutable address of slot `index`.
    ///
    /// # Safety
    ///
    /// Same contract as `address_at`.
    #[inline(always)]
    pub unsafe fn address_at_mut(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity, "address_at_mut index <= capacity");
        self.ptr.as_ptr().add(index)
    }

    /// Exchanges allocations and capacities with `other`. No slot is touched.
    pub fn swap(&mut self, other: &mut Block<T>) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Moves the allocation out, leaving this block empty.
    pub fn take(&mut self) -> Block<T> {
        mem::replace(self, Block::new())
    }
}

impl<T> Default for Block<T> {
    fn default() -> Self {
        Block::new()
    }
}

impl<T> std::fmt::Debug for Block<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T> Drop for Block<T> {
    fn drop(&mut self) {
        if !self.is_allocated() {
            return;
        }
        if let Ok(layout) = Self::layout_for(self.capacity) {
            debug!("release block of {} items ({} bytes)", self.capacity, layout.size());
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
        }
    }
}

/// Reports an allocation failure from a context that can not return it.
pub(crate) fn handle_error<T>(error: Error) -> ! {
    match error {
        Error::OutOfMemory { bytes } => match Layout::from_size_align(bytes, mem::align_of::<T>()) {
            Ok(layout) => alloc::handle_alloc_error(layout),
            Err(_) => panic!("{}", error),
        },
        Error::CapacityOverflow { .. } => panic!("{}", error),
    }
}
