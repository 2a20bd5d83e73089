//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every persisted record in the workspace is an entity keyed by a surrogate
/// identity assigned by its store.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy
        + Eq
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + From<i64>
        + Into<i64>
        + Send
        + Sync
        + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// An entity owned by exactly one store, assembled from a surrogate identity
/// and its mutable fields.
pub trait Record: Entity + Clone + Send + Sync + 'static {
    /// Everything except the identity (what a create/update writes).
    type Fields: Clone + Send + Sync + 'static;

    /// Build a record once the store has assigned its identity.
    fn assemble(id: Self::Id, fields: Self::Fields) -> Self;

    /// Split the record back into its mutable fields.
    fn fields(&self) -> Self::Fields;
}
