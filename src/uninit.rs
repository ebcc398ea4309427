use std::convert::Infallible;
use std::mem;
use std::ptr;

/// Run of slots being initialized front to back.
///
/// If the guard is dropped before `finish`, for example while a constructor
/// unwinds, every slot it initialized is destroyed again, so a failed bulk
/// construction never leaves live elements behind.
pub(crate) struct PartialInit<T> {
    start: *mut T,
    initialized: usize,
}

impl<T> PartialInit<T> {
    /// # Safety
    ///
    /// `start` must point to enough uninitialized slots for every `push`.
    pub unsafe fn new(start: *mut T) -> PartialInit<T> {
        PartialInit { start, initialized: 0 }
    }

    #[inline(always)]
    pub unsafe fn push(&mut self, value: T) {
        self.start.add(self.initialized).write(value);
        self.initialized += 1;
    }

    /// Keeps the initialized slots alive and returns their count.
    pub fn finish(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        trace!("roll back {} partially initialized items", self.initialized);
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.initialized)) };
    }
}

/// Constructs `count` elements at `dst` with `make(index)`.
///
/// On `Err` or panic the elements constructed by this call are destroyed
/// before the failure propagates.
///
/// # Safety
///
/// `dst` must point to `count` uninitialized slots.
pub(crate) unsafe fn try_fill<T, E, F>(dst: *mut T, count: usize, mut make: F) -> Result<(), E>
    where F: FnMut(usize) -> Result<T, E>
{
    let mut guard = PartialInit::new(dst);
    for index in 0..count {
        let value = make(index)?;
        guard.push(value);
    }
    guard.finish();
    Ok(())
}

/// Infallible `try_fill`. A panicking `make` still rolls back.
pub(crate) unsafe fn fill<T, F>(dst: *mut T, count: usize, mut make: F)
    where F: FnMut(usize) -> T
{
    let filled: Result<(), Infallible> = try_fill(dst, count, |index| Ok(make(index)));
    if let Err(never) = filled {
        match never {}
    }
}
