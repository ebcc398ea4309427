use crate::block::{self, Block};
use crate::uninit;
use crate::Error;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;

/// Growable contiguous array that manages its own `Block` of storage.
///
/// Slots `[0, size)` of the block hold live elements, slots
/// `[size, capacity)` are uninitialized. Capacity only grows on its own:
/// shrinking the array destroys trailing elements but keeps the block.
///
/// Operations that allocate return `Result` with an allocation `Error`.
/// Element constructors may fail too, either by panicking or, through the
/// `try_*` operations, by returning an error. In both cases the array is left
/// exactly as it was before the call, except where a method documents
/// otherwise.
///
/// Any mutation may move the elements, so addresses taken from the array
/// are only valid until the next mutating call. Positions (indices) stay
/// meaningful.
pub struct Vector<T> {
    data: Block<T>,
    size: usize,
}

impl<T> Vector<T> {
    /// Empty array, no allocation.
    pub const fn new() -> Vector<T> {
        Vector {
            data: Block::new(),
            size: 0,
        }
    }

    /// Empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Vector<T>, Error> {
        Ok(Vector {
            data: Block::with_capacity(capacity)?,
            size: 0,
        })
    }

    /// Array of `size` default-constructed elements, with capacity exactly `size`.
    pub fn with_size(size: usize) -> Result<Vector<T>, Error> where T: Default {
        Self::try_with_size_with(size, || Ok(T::default()))
    }

    /// Array of `size` elements produced by `make`, with capacity exactly `size`.
    ///
    /// If `make` fails, the elements produced so far are destroyed and the
    /// storage is released before the error is returned.
    pub fn try_with_size_with<E, F>(size: usize, mut make: F) -> Result<Vector<T>, E>
        where
            E: From<Error>,
            F: FnMut() -> Result<T, E>
    {
        let mut data = Block::with_capacity(size)?;
        unsafe { uninit::try_fill(data.as_mut_ptr(), size, |_| make())? };
        Ok(Vector { data, size })
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.size) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.data.as_mut_ptr(), self.size) }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Copy of this array with capacity equal to its size.
    ///
    /// If a `clone` panics, the copies made so far are destroyed and `self`
    /// is untouched.
    pub fn try_clone(&self) -> Result<Vector<T>, Error> where T: Clone {
        let source = self.as_slice();
        let mut data = Block::with_capacity(source.len())?;
        unsafe { uninit::fill(data.as_mut_ptr(), source.len(), |index| source[index].clone()) };
        Ok(Vector {
            data,
            size: source.len(),
        })
    }

    /// Makes this array an element-wise copy of `source`.
    ///
    /// When `source` fits into the current capacity the existing elements are
    /// reused: the common prefix is overwritten with `clone_from`, then the
    /// surplus is destroyed or the missing tail is cloned in. A panic in this
    /// path leaves a valid array holding a mix of old and new elements.
    ///
    /// Otherwise a full copy is built first and swapped in, so a failure
    /// leaves `self` unchanged.
    pub fn try_clone_from(&mut self, source: &Vector<T>) -> Result<(), Error> where T: Clone {
        if source.size > self.capacity() {
            trace!("clone_from: {} items exceed capacity {}, copy and swap", source.size, self.capacity());
            let mut copy = source.try_clone()?;
            self.swap(&mut copy);
            return Ok(());
        }

        let common = self.size.min(source.size);
        for (dst, src) in self.as_mut_slice()[..common].iter_mut().zip(&source.as_slice()[..common]) {
            dst.clone_from(src);
        }

        if self.size > source.size {
            self.truncate(source.size);
        } else if self.size < source.size {
            let tail = &source.as_slice()[self.size..];
            unsafe { uninit::fill(self.data.address_at_mut(self.size), tail.len(), |index| tail[index].clone()) };
            self.size = source.size;
        }
        Ok(())
    }

    /// Exchanges contents with `other` without touching any element.
    pub fn swap(&mut self, other: &mut Vector<T>) {
        self.data.swap(&mut other.data);
        mem::swap(&mut self.size, &mut other.size);
    }

    /// Moves the contents out, leaving this array empty with no capacity.
    pub fn take(&mut self) -> Vector<T> {
        mem::replace(self, Vector::new())
    }

    /// Grows capacity to exactly `new_capacity`, relocating the elements.
    /// Does nothing if the capacity is already large enough.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), Error> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }

        let mut new_data = Block::with_capacity(new_capacity)?;
        debug!("relocate {} items, capacity {} -> {}", self.size, self.capacity(), new_capacity);
        unsafe { ptr::copy_nonoverlapping(self.data.as_ptr(), new_data.as_mut_ptr(), self.size) };
        // the old block now holds only moved-out bytes
        self.data.swap(&mut new_data);
        Ok(())
    }

    /// Sets the size to `new_size`, destroying trailing elements or appending
    /// default-constructed ones.
    ///
    /// Growth past capacity reserves `max(capacity * 2, new_size)`.
    pub fn resize(&mut self, new_size: usize) -> Result<(), Error> where T: Default {
        self.try_resize_with(new_size, || Ok(T::default()))
    }

    pub fn resize_with<F>(&mut self, new_size: usize, mut make: F) -> Result<(), Error>
        where F: FnMut() -> T
    {
        self.try_resize_with(new_size, || Ok(make()))
    }

    /// Like `resize`, with appended elements produced by `make`.
    ///
    /// If `make` fails, the elements appended by this call are destroyed and
    /// the size is restored. Capacity grown by the call is kept.
    pub fn try_resize_with<E, F>(&mut self, new_size: usize, mut make: F) -> Result<(), E>
        where
            E: From<Error>,
            F: FnMut() -> Result<T, E>
    {
        if new_size <= self.size {
            self.truncate(new_size);
            return Ok(());
        }

        if new_size > self.capacity() {
            let grown = self.capacity()
                .checked_mul(2)
                .map_or(new_size, |doubled| doubled.max(new_size));
            self.reserve(grown)?;
        }

        let count = new_size - self.size;
        unsafe { uninit::try_fill(self.data.address_at_mut(self.size), count, |_| make())? };
        self.size = new_size;
        Ok(())
    }

    /// Destroys all elements. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    fn truncate(&mut self, new_size: usize) {
        if new_size >= self.size {
            return;
        }
        let count = self.size - new_size;
        trace!("destroy {} trailing items", count);
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.data.address_at_mut(new_size), count);
            self.size = new_size;
            ptr::drop_in_place(tail);
        }
    }

    /// Appends `value`.
    pub fn push_back(&mut self, value: T) -> Result<(), Error> {
        self.insert(self.size, value)?;
        Ok(())
    }

    /// Appends the element produced by `make` and returns it.
    pub fn emplace_back<F>(&mut self, make: F) -> Result<&mut T, Error>
        where F: FnOnce() -> T
    {
        self.try_emplace_back(|| Ok(make()))
    }

    /// Appends the element produced by a fallible `make` and returns it.
    pub fn try_emplace_back<E, F>(&mut self, make: F) -> Result<&mut T, E>
        where
            E: From<Error>,
            F: FnOnce() -> Result<T, E>
    {
        let pos = self.try_emplace(self.size, make)?;
        Ok(&mut self.as_mut_slice()[pos])
    }

    /// Removes and returns the last element, if any.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        self.size -= 1;
        Some(unsafe { ptr::read(self.data.address_at(self.size)) })
    }

    /// Inserts `value` before position `pos` and returns `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > size`.
    pub fn insert(&mut self, pos: usize, value: T) -> Result<usize, Error> {
        self.try_emplace(pos, || Ok(value))
    }

    /// Inserts the element produced by `make` before position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > size`.
    pub fn emplace<F>(&mut self, pos: usize, make: F) -> Result<usize, Error>
        where F: FnOnce() -> T
    {
        self.try_emplace(pos, || Ok(make()))
    }

    /// Inserts the element produced by a fallible `make` before position `pos`
    /// and returns `pos`.
    ///
    /// With spare capacity the value is built first, then `[pos, size)` moves
    /// one slot forward. Without it a block of `max(size * 2, 1)` slots is
    /// allocated, the value is built directly in its final slot, and the
    /// neighbours are relocated around it. Either way nothing in the array
    /// changes until the value exists, so a failing `make` leaves the array
    /// as it was.
    ///
    /// # Panics
    ///
    /// Panics if `pos > size`.
    pub fn try_emplace<E, F>(&mut self, pos: usize, make: F) -> Result<usize, E>
        where
            E: From<Error>,
            F: FnOnce() -> Result<T, E>
    {
        assert!(pos <= self.size, "insert position {} out of range for size {}", pos, self.size);
        trace!("emplace at {} of {}", pos, self.size);

        if self.capacity() > self.size {
            let value = make()?;
            self.place_with_spare_capacity(pos, value);
        } else {
            self.try_place_with_relocation(pos, make)?;
        }
        self.size += 1;
        Ok(pos)
    }

    fn place_with_spare_capacity(&mut self, pos: usize, value: T) {
        debug_assert!(self.size < self.capacity(), "place_with_spare_capacity size < capacity");
        unsafe {
            let slot = self.data.address_at_mut(pos);
            ptr::copy(slot, slot.add(1), self.size - pos);
            ptr::write(slot, value);
        }
    }

    fn try_place_with_relocation<E, F>(&mut self, pos: usize, make: F) -> Result<(), E>
        where
            E: From<Error>,
            F: FnOnce() -> Result<T, E>
    {
        let new_capacity = self.size
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow { requested: self.size })?
            .max(1);
        let mut new_data = Block::with_capacity(new_capacity)?;

        unsafe {
            ptr::write(new_data.address_at_mut(pos), make()?);

            debug!("relocate {} items around {}, capacity {} -> {}", self.size, pos, self.capacity(), new_capacity);
            ptr::copy_nonoverlapping(self.data.as_ptr(), new_data.as_mut_ptr(), pos);
            ptr::copy_nonoverlapping(
                self.data.address_at(pos),
                new_data.address_at_mut(pos + 1),
                self.size - pos,
            );
        }

        self.data.swap(&mut new_data);
        Ok(())
    }

    /// Destroys the element at `pos`, moving the following ones one slot
    /// toward the front, and returns `pos`. Capacity is kept.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= size`.
    pub fn erase(&mut self, pos: usize) -> usize {
        assert!(pos < self.size, "erase position {} out of range for size {}", pos, self.size);
        trace!("erase at {} of {}", pos, self.size);

        let removed = unsafe {
            let slot = self.data.address_at_mut(pos);
            let removed = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.size - pos - 1);
            removed
        };
        self.size -= 1;
        mem::drop(removed);
        pos
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.data.as_mut_ptr(), self.size));
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Vector::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(error) => block::handle_error::<T>(error),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(error) = self.try_clone_from(source) {
            block::handle_error::<T>(error);
        }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> std::fmt::Debug for Vector<T> where T: std::fmt::Debug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}
