//! This module is for testing only

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type DropFlag<T> = Rc<RefCell<T>>;

pub fn flag<T>(value: T) -> DropFlag<T> {
    Rc::new(RefCell::new(value))
}

pub struct Droppable {
    pub dropflag: DropFlag<bool>,
}

impl Drop for Droppable {
    fn drop(&mut self) {
        *self.dropflag.borrow_mut() = true;
    }
}

/// Value that keeps a shared count of its live instances.
#[derive(Debug)]
pub struct Tracked {
    pub value: i32,
    live: DropFlag<i64>,
}

impl Tracked {
    pub fn new(value: i32, live: &DropFlag<i64>) -> Tracked {
        *live.borrow_mut() += 1;
        Tracked { value, live: live.clone() }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Tracked::new(self.value, &self.live)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        *self.live.borrow_mut() -= 1;
    }
}

/// Like `Tracked`, but `clone` panics once the shared clone budget runs out.
#[derive(Debug)]
pub struct Fragile {
    pub value: i32,
    budget: DropFlag<usize>,
    live: DropFlag<i64>,
}

impl Fragile {
    pub fn new(value: i32, budget: &DropFlag<usize>, live: &DropFlag<i64>) -> Fragile {
        *live.borrow_mut() += 1;
        Fragile { value, budget: budget.clone(), live: live.clone() }
    }
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        let left = *self.budget.borrow();
        if left == 0 {
            panic!("clone budget exhausted at value {}", self.value);
        }
        *self.budget.borrow_mut() = left - 1;
        Fragile::new(self.value, &self.budget, &self.live)
    }
}

impl Drop for Fragile {
    fn drop(&mut self) {
        *self.live.borrow_mut() -= 1;
    }
}

thread_local! {
    static DEFAULT_BUDGET: Cell<Option<usize>> = Cell::new(None);
    static DEFAULT_LIVE: Cell<i64> = Cell::new(0);
}

/// Default-constructible value whose `default` panics once the per-thread
/// budget set with `set_default_budget` runs out.
#[derive(Debug, PartialEq)]
pub struct FragileDefault(pub i32);

impl FragileDefault {
    pub fn set_default_budget(budget: Option<usize>) {
        DEFAULT_BUDGET.with(|b| b.set(budget));
    }

    pub fn live() -> i64 {
        DEFAULT_LIVE.with(|l| l.get())
    }
}

impl Default for FragileDefault {
    fn default() -> Self {
        DEFAULT_BUDGET.with(|b| match b.get() {
            Some(0) => panic!("default budget exhausted"),
            Some(left) => b.set(Some(left - 1)),
            None => (),
        });
        DEFAULT_LIVE.with(|l| l.set(l.get() + 1));
        FragileDefault(0)
    }
}

impl Drop for FragileDefault {
    fn drop(&mut self) {
        DEFAULT_LIVE.with(|l| l.set(l.get() - 1));
    }
}

#[test]
fn dropflag() {
    let flag = flag(false);
    let droppable = Droppable { dropflag: flag.clone() };
    assert_eq!(false, *flag.borrow());
    std::mem::drop(droppable);
    assert_eq!(true, *flag.borrow());
}

#[test]
fn fragile_clone_spends_budget() {
    let budget = flag(1usize);
    let live = flag(0i64);
    let original = Fragile::new(7, &budget, &live);
    let copy = original.clone();
    assert_eq!(7, copy.value);
    assert_eq!(2, *live.borrow());
    assert_eq!(0, *budget.borrow());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| original.clone()));
    assert!(result.is_err(), "clone past budget panics");
    assert_eq!(2, *live.borrow());
}
