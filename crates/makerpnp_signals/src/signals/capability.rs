use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, Weak};

/// A value that can change and whose changes are tracked.
///
/// The identity of a source is its address, so a source must stay at a stable
/// location (usually inside an `Arc`) for as long as it is tracked.
pub trait Source: Send + Sync {
    type Value;

    fn current_value(&self) -> Self::Value;
}

/// A consumer that refreshes itself when a source changes.
pub trait Dependent<S: ?Sized>: Send + Sync {
    /// Called synchronously while the source is being signalled, on whichever thread signalled it.
    fn request_refresh(&self, source: &S);
}

impl<S: ?Sized, F> Dependent<S> for F
where
    F: Fn(&S) + Send + Sync,
{
    fn request_refresh(&self, source: &S) {
        self(source)
    }
}

/// A push-based consumer of a source's values.
pub trait Observer<V>: Send + Sync {
    fn on_next(&self, value: &V);

    fn on_completed(&self);
}

/// An [`Observer`] built from a pair of closures.
pub struct FnObserver<V> {
    on_next: Box<dyn Fn(&V) + Send + Sync>,
    on_completed: Box<dyn Fn() + Send + Sync>,
}

impl<V> FnObserver<V> {
    pub fn new<N, C>(on_next: N, on_completed: C) -> Self
    where
        N: Fn(&V) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        Self {
            on_next: Box::new(on_next),
            on_completed: Box::new(on_completed),
        }
    }
}

impl<V> Observer<V> for FnObserver<V> {
    fn on_next(&self, value: &V) {
        (self.on_next)(value)
    }

    fn on_completed(&self) {
        (self.on_completed)()
    }
}

impl<V> Debug for FnObserver<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// Identity of a source, derived from its address.
///
/// Two sources compare equal only if they are the same object; their values are never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(usize);

impl SourceId {
    pub fn of<S>(source: &S) -> Self {
        Self(source as *const S as usize)
    }

    pub fn of_arc<S>(source: &Arc<S>) -> Self {
        Self(Arc::as_ptr(source) as usize)
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Identity comparison of subscribers, ignoring vtable metadata.
pub(crate) fn same_subscriber<T: ?Sized, U: ?Sized>(weak: &Weak<T>, strong: &Arc<U>) -> bool {
    std::ptr::addr_eq(weak.as_ptr(), Arc::as_ptr(strong))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter(AtomicUsize);

    impl Source for Counter {
        type Value = usize;

        fn current_value(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn source_id_is_identity_not_equality() {
        // given
        let a = Arc::new(Counter(AtomicUsize::new(1)));
        let b = Arc::new(Counter(AtomicUsize::new(1)));

        // expect
        assert_eq!(a.current_value(), b.current_value());
        assert_ne!(SourceId::of_arc(&a), SourceId::of_arc(&b));
        assert_eq!(SourceId::of_arc(&a), SourceId::of(&*a));
    }

    #[test]
    fn closure_is_a_dependent() {
        // given
        let source = Counter(AtomicUsize::new(7));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_for_closure = seen.clone();
        let dependent: Arc<dyn Dependent<Counter>> = Arc::new(move |source: &Counter| {
            seen_for_closure.store(source.current_value(), Ordering::SeqCst);
        });

        // when
        dependent.request_refresh(&source);

        // then
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn same_subscriber_ignores_trait_object_metadata() {
        // given
        let concrete = Arc::new(FnObserver::<usize>::new(|_| {}, || {}));
        let erased: Arc<dyn Observer<usize>> = concrete.clone();
        let other: Arc<dyn Observer<usize>> = Arc::new(FnObserver::new(|_: &usize| {}, || {}));

        // expect
        assert!(same_subscriber(&Arc::downgrade(&erased), &concrete));
        assert!(!same_subscriber(&Arc::downgrade(&erased), &other));
    }
}
