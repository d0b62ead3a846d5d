//! Resource traits: authorship and visibility.
//!
//! Authorization decisions are expressed against these traits so that the
//! policy layer never needs to know the concrete content types.

use crate::id::UserId;

/// A resource with an immutable owning author.
pub trait Authored {
    fn author_id(&self) -> UserId;
}

/// A resource whose visibility to anonymous actors is gated by a published flag.
pub trait Publishable {
    fn is_published(&self) -> bool;
}

impl<T: Authored + ?Sized> Authored for &T {
    fn author_id(&self) -> UserId {
        (**self).author_id()
    }
}

impl<T: Publishable + ?Sized> Publishable for &T {
    fn is_published(&self) -> bool {
        (**self).is_published()
    }
}
