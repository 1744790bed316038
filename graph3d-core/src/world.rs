/// World space: the live collection of objects under transformation
use std::sync::{Arc, Mutex, PoisonError};

use crate::geometry::{GeometryError, Object, Point};

/// An ordered collection of uniquely named objects. Draw order is insertion
/// order, which also implies back-to-front priority for the renderer.
#[derive(Debug, Default)]
pub struct WorldSpace {
    objects: Vec<Object>,
}

impl WorldSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object; names must be unique.
    pub fn insert(&mut self, object: Object) -> Result<(), GeometryError> {
        if self.objects.iter().any(|o| o.name == object.name) {
            return Err(GeometryError::DuplicateName(object.name));
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// All objects in draw order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Swaps in a new point list for the named object. The point count per
    /// object never changes after insertion, so edge and surface indices
    /// stay valid for the object's entire lifetime.
    pub fn replace_points(&mut self, name: &str, points: Vec<Point>) -> Result<(), GeometryError> {
        let object = self
            .objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| GeometryError::UnknownObject(name.to_string()))?;
        if points.len() != object.points.len() {
            return Err(GeometryError::PointCountMismatch {
                object: name.to_string(),
                expected: object.points.len(),
                got: points.len(),
            });
        }
        object.points = points;
        Ok(())
    }
}

/// Cloneable handle to a world space shared between the animator (writer)
/// and a renderer (reader). The lock is held only for the duration of a
/// single read or point-list replacement, never for a whole animation
/// increment, so a renderer may observe a partially-animated world.
#[derive(Debug, Clone, Default)]
pub struct SharedWorld {
    inner: Arc<Mutex<WorldSpace>>,
}

impl SharedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WorldSpace> {
        // A panicked writer leaves whole-list replacements intact, so a
        // poisoned lock is still safe to read and write.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, object: Object) -> Result<(), GeometryError> {
        self.lock().insert(object)
    }

    pub fn object_names(&self) -> Vec<String> {
        self.lock().object_names()
    }

    /// Clones the named object's current point list.
    pub fn points(&self, name: &str) -> Option<Vec<Point>> {
        self.lock().get(name).map(|o| o.points.clone())
    }

    pub fn replace_points(&self, name: &str, points: Vec<Point>) -> Result<(), GeometryError> {
        self.lock().replace_points(name, points)
    }

    /// Clones the full object list for rendering.
    pub fn snapshot(&self) -> Vec<Object> {
        self.lock().objects().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Edge;

    fn object(name: &str, points: usize) -> Object {
        Object {
            name: name.to_string(),
            points: (0..points).map(|i| Point::new(i as f64, 0.0, 0.0)).collect(),
            ..Object::default()
        }
    }

    #[test]
    fn insert_keeps_draw_order() {
        let mut world = WorldSpace::new();
        world.insert(object("axes", 2)).unwrap();
        world.insert(object("Equation", 3)).unwrap();
        let names: Vec<_> = world.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["axes", "Equation"]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut world = WorldSpace::new();
        world.insert(object("axes", 2)).unwrap();
        let err = world.insert(object("axes", 2)).unwrap_err();
        assert_eq!(err, GeometryError::DuplicateName("axes".to_string()));
    }

    #[test]
    fn replace_points_keeps_count() {
        let mut world = WorldSpace::new();
        world.insert(object("graph", 3)).unwrap();
        let moved = vec![
            Point::new(9.0, 0.0, 0.0),
            Point::new(8.0, 0.0, 0.0),
            Point::new(7.0, 0.0, 0.0),
        ];
        world.replace_points("graph", moved).unwrap();
        assert_eq!(world.get("graph").unwrap().points[0].x, 9.0);

        let err = world
            .replace_points("graph", vec![Point::new(0.0, 0.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, GeometryError::PointCountMismatch { expected: 3, got: 1, .. }));
    }

    #[test]
    fn replace_points_unknown_object() {
        let mut world = WorldSpace::new();
        let err = world.replace_points("ghost", vec![]).unwrap_err();
        assert_eq!(err, GeometryError::UnknownObject("ghost".to_string()));
    }

    #[test]
    fn shared_world_snapshot_is_detached() {
        let world = SharedWorld::new();
        let mut obj = object("graph", 1);
        obj.edges = vec![Edge(0, 0)];
        world.insert(obj).unwrap();

        let snapshot = world.snapshot();
        world
            .replace_points("graph", vec![Point::new(42.0, 0.0, 0.0)])
            .unwrap();

        assert_eq!(snapshot[0].points[0].x, 0.0);
        assert_eq!(world.points("graph").unwrap()[0].x, 42.0);
    }
}
