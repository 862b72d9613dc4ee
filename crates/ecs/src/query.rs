use crate::store::Store;
use tickscene_common::EntityId;

/// Entities present in every one of `stores`.
///
/// Iterates the smallest store and filters by membership in the rest. On
/// equal sizes the earliest store in the slice is the base. An empty slice
/// yields nothing. The result is a point-in-time copy; stores are not touched.
pub fn query(stores: &[&dyn Store]) -> Vec<EntityId> {
    let Some((base_index, base)) = stores
        .iter()
        .enumerate()
        .min_by_key(|(_, store)| store.len())
    else {
        return Vec::new();
    };

    base.entities()
        .filter(|entity| {
            stores
                .iter()
                .enumerate()
                .all(|(i, store)| i == base_index || store.contains(*entity))
        })
        .collect()
}
