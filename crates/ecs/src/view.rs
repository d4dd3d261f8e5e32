use crate::component::{Component, ComponentKind};
use crate::store::ComponentStore;
use ember_common::EntityHandle;
use std::marker::PhantomData;

/// A tuple of component kinds that can be queried together.
///
/// Implemented for `()` and tuples of one to six [`Component`] types. The
/// first kind drives iteration; the others are probed per entity.
pub trait ViewQuery {
    type Item<'a>;

    fn kinds() -> Vec<ComponentKind>;

    #[doc(hidden)]
    fn driver(store: &ComponentStore) -> Box<dyn Iterator<Item = EntityHandle> + '_>;

    #[doc(hidden)]
    fn fetch(store: &ComponentStore, entity: EntityHandle) -> Option<Self::Item<'_>>;
}

impl ViewQuery for () {
    type Item<'a> = ();

    fn kinds() -> Vec<ComponentKind> {
        Vec::new()
    }

    fn driver(_store: &ComponentStore) -> Box<dyn Iterator<Item = EntityHandle> + '_> {
        Box::new(std::iter::empty())
    }

    fn fetch(_store: &ComponentStore, _entity: EntityHandle) -> Option<()> {
        Some(())
    }
}

macro_rules! impl_view_query {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Component $(, $rest: Component)*> ViewQuery for ($first, $($rest,)*) {
            type Item<'a> = (&'a $first, $(&'a $rest,)*);

            fn kinds() -> Vec<ComponentKind> {
                vec![<$first as Component>::KIND $(, <$rest as Component>::KIND)*]
            }

            fn driver(store: &ComponentStore) -> Box<dyn Iterator<Item = EntityHandle> + '_> {
                Box::new(<$first as Component>::table(store).handles())
            }

            fn fetch(store: &ComponentStore, entity: EntityHandle) -> Option<Self::Item<'_>> {
                Some((
                    <$first as Component>::table(store).get(entity)?,
                    $(<$rest as Component>::table(store).get(entity)?,)*
                ))
            }
        }
    };
}

impl_view_query!(A);
impl_view_query!(A, B);
impl_view_query!(A, B, C);
impl_view_query!(A, B, C, D);
impl_view_query!(A, B, C, D, E);
impl_view_query!(A, B, C, D, E, F);

/// Lazy iterator over entities holding every kind in `Q`.
///
/// Yields `(entity, components)` and restarts from the beginning each time
/// [`ComponentStore::view`] is called.
pub struct View<'a, Q: ViewQuery> {
    store: &'a ComponentStore,
    driver: Box<dyn Iterator<Item = EntityHandle> + 'a>,
    _query: PhantomData<fn() -> Q>,
}

impl<'a, Q: ViewQuery> View<'a, Q> {
    pub(crate) fn new(store: &'a ComponentStore) -> Self {
        Self {
            store,
            driver: Q::driver(store),
            _query: PhantomData,
        }
    }
}

impl<'a, Q: ViewQuery> Iterator for View<'a, Q> {
    type Item = (EntityHandle, Q::Item<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        self.driver
            .by_ref()
            .find_map(|entity| Q::fetch(store, entity).map(|item| (entity, item)))
    }
}
