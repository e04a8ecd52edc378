//! Ordered annotation storage.

use super::types::{Annotation, AnnotationId};

/// Owns every persisted annotation. Insertion order is z-order: the latest
/// added renders on top and wins hit-test ties.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn add(&mut self, annotation: Annotation) -> AnnotationId {
        let id = annotation.id;
        self.annotations.push(annotation);
        id
    }

    /// Remove by id. Unknown ids are a no-op and report `false`.
    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        self.annotations.len() != before
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    /// Iterate in insertion (z-bottom to z-top) order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Iterate topmost first, for hit-testing.
    pub fn iter_topmost_first(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().rev()
    }

    /// Duplicate an annotation in place: new id, deep-copied anchors, no
    /// positional offset.
    pub fn duplicate(&mut self, id: AnnotationId) -> Option<AnnotationId> {
        let source = self.get(id)?;
        let copy = Annotation {
            id: AnnotationId::new(),
            kind: source.kind,
            anchors: source.anchors.clone(),
            style: source.style.clone(),
        };
        Some(self.add(copy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::types::AnnotationKind;
    use chartmark_core::DataPoint;

    fn line(t0: i64, p0: f64, t1: i64, p1: f64) -> Annotation {
        Annotation::new(
            AnnotationKind::TrendLine,
            vec![DataPoint::new(t0, p0), DataPoint::new(t1, p1)],
        )
    }

    #[test]
    fn test_add_remove() {
        let mut store = AnnotationStore::new();
        let id = store.add(line(0, 1.0, 10, 2.0));
        assert_eq!(store.len(), 1);
        assert!(store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = AnnotationStore::new();
        store.add(line(0, 1.0, 10, 2.0));
        assert!(!store.remove(AnnotationId::new()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_topmost_first_order() {
        let mut store = AnnotationStore::new();
        let first = store.add(line(0, 1.0, 10, 2.0));
        let second = store.add(line(0, 1.0, 10, 2.0));
        let order: Vec<_> = store.iter_topmost_first().map(|a| a.id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn test_duplicate_deep_copies() {
        let mut store = AnnotationStore::new();
        let id = store.add(line(0, 1.0, 10, 2.0));
        let copy_id = store.duplicate(id).unwrap();
        assert_ne!(id, copy_id);

        // Mutating the copy leaves the original untouched.
        store.get_mut(copy_id).unwrap().anchors[0] = DataPoint::new(99, 99.0);
        assert_eq!(store.get(id).unwrap().anchors[0], DataPoint::new(0, 1.0));
        // No positional offset on the copy's untouched anchor.
        assert_eq!(store.get(copy_id).unwrap().anchors[1], DataPoint::new(10, 2.0));
    }

    #[test]
    fn test_duplicate_unknown() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.duplicate(AnnotationId::new()), None);
    }
}
