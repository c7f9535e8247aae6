use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Marks values that stand for "no value".
///
/// The table refuses absent keys and values: `set`, `get`, `contains` and
/// `delete` fail with [`TableError::InvalidKey`] or
/// [`TableError::InvalidValue`] instead of storing or searching for them.
///
/// `None` is the only absent value among the provided implementations.
/// Smart pointers and references defer to what they point at.
///
/// [`TableError::InvalidKey`]: crate::TableError::InvalidKey
/// [`TableError::InvalidValue`]: crate::TableError::InvalidValue
///
/// # Examples
///
/// ```rust
/// use probe_table::Absent;
///
/// assert!(None::<u32>.is_absent());
/// assert!(!Some(3u32).is_absent());
/// assert!(!"key".is_absent());
/// ```
pub trait Absent {
    /// Returns `true` if `self` is the "no value" sentinel.
    fn is_absent(&self) -> bool;
}

macro_rules! never_absent {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Absent for $ty {
                #[inline(always)]
                fn is_absent(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_absent!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    str,
    String,
);

impl<T> Absent for Option<T> {
    #[inline(always)]
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T> Absent for Vec<T> {
    #[inline(always)]
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T: Absent + ?Sized> Absent for &T {
    #[inline(always)]
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Absent + ?Sized> Absent for Box<T> {
    #[inline(always)]
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Absent + ?Sized> Absent for Rc<T> {
    #[inline(always)]
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Absent + ?Sized> Absent for Arc<T> {
    #[inline(always)]
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn plain_values_are_present() {
        assert!(!0u64.is_absent());
        assert!(!(-1i32).is_absent());
        assert!(!"".is_absent());
        assert!(!String::new().is_absent());
        assert!(!vec![1, 2].is_absent());
        assert!(!f64::NAN.is_absent());
    }

    #[test]
    fn none_is_absent_through_pointers() {
        let none: Option<&str> = None;
        assert!(none.is_absent());
        assert!((&none).is_absent());
        assert!(Box::new(none).is_absent());
        assert!(Rc::new(none).is_absent());
        assert!(Arc::new(none).is_absent());
        assert!(!Some("a".to_string()).is_absent());
    }
}
