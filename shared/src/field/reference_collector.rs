use std::collections::HashMap;

use crate::types::{FieldIndex, LocalKey, NetId};

/// Resolves network ids to objects already materialized on this side
pub trait ObjectLookup {
    fn lookup(&self, net_id: NetId) -> Option<LocalKey>;
}

impl ObjectLookup for HashMap<NetId, LocalKey> {
    fn lookup(&self, net_id: NetId) -> Option<LocalKey> {
        self.get(&net_id).copied()
    }
}

/// Receives every object reference met while decoding one field
pub trait ReferenceCollector {
    /// Returns the local key of `net_id` if it is known. Otherwise records
    /// `path` so the slot can be patched once the object arrives.
    ///
    /// `path` locates the slot inside the field: list element index,
    /// composite sub-field index, and so on, outermost first.
    fn collect(&mut self, net_id: NetId, path: Vec<FieldIndex>) -> Option<LocalKey>;
}

/// Prefixes every collected path with one index of the enclosing value
pub struct ScopedCollector<'a> {
    outer: &'a mut dyn ReferenceCollector,
    index: FieldIndex,
}

impl<'a> ScopedCollector<'a> {
    pub fn new(outer: &'a mut dyn ReferenceCollector, index: FieldIndex) -> Self {
        Self { outer, index }
    }
}

impl ReferenceCollector for ScopedCollector<'_> {
    fn collect(&mut self, net_id: NetId, mut path: Vec<FieldIndex>) -> Option<LocalKey> {
        path.insert(0, self.index);
        self.outer.collect(net_id, path)
    }
}

/// Collector for one top-level field of an incoming message
pub(crate) struct FieldCollector<'a> {
    objects: &'a dyn ObjectLookup,
    referenced: Vec<NetId>,
    deferred: Vec<(NetId, Vec<FieldIndex>)>,
}

impl<'a> FieldCollector<'a> {
    pub fn new(objects: &'a dyn ObjectLookup) -> Self {
        Self {
            objects,
            referenced: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (Vec<NetId>, Vec<(NetId, Vec<FieldIndex>)>) {
        (self.referenced, self.deferred)
    }
}

impl ReferenceCollector for FieldCollector<'_> {
    fn collect(&mut self, net_id: NetId, path: Vec<FieldIndex>) -> Option<LocalKey> {
        self.referenced.push(net_id);
        let key = self.objects.lookup(net_id);
        if key.is_none() {
            self.deferred.push((net_id, path));
        }
        key
    }
}
