/// Scene object model: points, edges, surfaces, and named objects
use thiserror::Error;

use crate::matrix;

/// Horizontal alignment for a point's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// A point in world space. Label fields are cosmetic and travel with the
/// point through every transform unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub label: Option<String>,
    pub align: LabelAlign,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            label: None,
            align: LabelAlign::default(),
        }
    }

    pub fn labeled(x: f64, y: f64, z: f64, label: &str, align: LabelAlign) -> Self {
        Self {
            x,
            y,
            z,
            label: Some(label.to_string()),
            align,
        }
    }
}

/// An ordered pair of indices into an object's point list. Edges are purely
/// topological and never hold coordinates themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge(pub usize, pub usize);

/// An ordered loop of point indices describing a closed polygon; the last
/// index connects back to the first implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface(pub Vec<usize>);

/// Construction-time invariant violations. These represent static data bugs
/// and fail fast at import, never at runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("object `{object}`: edge ({from}, {to}) references point {index} out of {count}")]
    EdgeIndex {
        object: String,
        from: usize,
        to: usize,
        index: usize,
        count: usize,
    },
    #[error("object `{object}`: surface references point {index} out of {count}")]
    SurfaceIndex {
        object: String,
        index: usize,
        count: usize,
    },
    #[error("an object named `{0}` is already in world space")]
    DuplicateName(String),
    #[error("no object named `{0}` in world space")]
    UnknownObject(String),
    #[error("object `{object}`: point count would change from {expected} to {got}")]
    PointCountMismatch {
        object: String,
        expected: usize,
        got: usize,
    },
}

/// A named drawable entity composed of points, edges, and surfaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    /// Colour name used by the renderer (e.g. "grey", "blue", "red").
    pub color: String,
    pub points: Vec<Point>,
    pub edges: Vec<Edge>,
    pub surfaces: Vec<Surface>,
    pub name: String,
    /// Human-readable equation for graph and derivative objects.
    pub equation: Option<String>,
}

impl Object {
    /// Checks that every edge and surface index is in range for `points`.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let count = self.points.len();
        for e in &self.edges {
            for index in [e.0, e.1] {
                if index >= count {
                    return Err(GeometryError::EdgeIndex {
                        object: self.name.clone(),
                        from: e.0,
                        to: e.1,
                        index,
                        count,
                    });
                }
            }
        }
        for s in &self.surfaces {
            for &index in &s.0 {
                if index >= count {
                    return Err(GeometryError::SurfaceIndex {
                        object: self.name.clone(),
                        index,
                        count,
                    });
                }
            }
        }
        Ok(())
    }

    /// The grey X/Y axes cross: a thin filled polygon along both axes with
    /// end-of-axis labels.
    pub fn axes() -> Self {
        Self {
            color: "grey".to_string(),
            name: "axes".to_string(),
            points: vec![
                Point::new(-0.1, 0.1, 0.0),
                Point::new(-0.1, 10.0, 0.0),
                Point::new(0.1, 10.0, 0.0),
                Point::new(0.1, 0.1, 0.0),
                Point::new(10.0, 0.1, 0.0),
                Point::new(10.0, -0.1, 0.0),
                Point::new(0.1, -0.1, 0.0),
                Point::new(0.1, -10.0, 0.0),
                Point::new(-0.1, -10.0, 0.0),
                Point::new(-0.1, -0.1, 0.0),
                Point::new(-10.0, -0.1, 0.0),
                Point::new(-10.0, 0.1, 0.0),
                Point::labeled(10.0, -1.0, 0.0, "X", LabelAlign::Center),
                Point::labeled(-10.0, -1.0, 0.0, "-X", LabelAlign::Center),
                Point::labeled(0.0, 10.5, 0.0, "Y", LabelAlign::Center),
                Point::labeled(0.0, -11.0, 0.0, "-Y", LabelAlign::Center),
            ],
            edges: vec![
                Edge(0, 1),
                Edge(1, 2),
                Edge(2, 3),
                Edge(3, 4),
                Edge(4, 5),
                Edge(5, 6),
                Edge(6, 7),
                Edge(7, 8),
                Edge(8, 9),
                Edge(9, 10),
                Edge(10, 11),
                Edge(11, 0),
            ],
            surfaces: vec![Surface(vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11])],
            equation: None,
        }
    }
}

/// Produces a new object whose every point is the template's point
/// translated by `origin`; edges, surfaces, and metadata are copied
/// verbatim. This is the sole construction path for placing an object into
/// world space, and it validates edge/surface indices up front.
pub fn import_object(template: &Object, origin: (f64, f64, f64)) -> Result<Object, GeometryError> {
    template.validate()?;
    let m = matrix::translate(origin.0, origin.1, origin.2);
    Ok(Object {
        color: template.color.clone(),
        points: template.points.iter().map(|p| matrix::apply(&m, p)).collect(),
        edges: template.edges.clone(),
        surfaces: template.surfaces.clone(),
        name: template.name.clone(),
        equation: template.equation.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn import_preserves_structure() {
        let template = Object::axes();
        let imported = import_object(&template, (2.0, -3.0, 1.0)).unwrap();
        assert_eq!(imported.points.len(), template.points.len());
        assert_eq!(imported.edges, template.edges);
        assert_eq!(imported.surfaces, template.surfaces);
        assert_eq!(imported.name, template.name);
        assert_eq!(imported.color, template.color);
    }

    #[test]
    fn import_translates_points() {
        let template = Object {
            points: vec![Point::new(1.0, 2.0, 3.0)],
            name: "p".to_string(),
            ..Object::default()
        };
        let imported = import_object(&template, (0.5, -1.0, 2.0)).unwrap();
        assert_relative_eq!(imported.points[0].x, 1.5);
        assert_relative_eq!(imported.points[0].y, 1.0);
        assert_relative_eq!(imported.points[0].z, 5.0);
    }

    #[test]
    fn import_at_origin_is_copy() {
        let template = Object::axes();
        let imported = import_object(&template, (0.0, 0.0, 0.0)).unwrap();
        assert_eq!(imported, template);
    }

    #[test]
    fn bad_edge_index_fails_at_import() {
        let template = Object {
            points: vec![Point::new(0.0, 0.0, 0.0)],
            edges: vec![Edge(0, 7)],
            name: "broken".to_string(),
            ..Object::default()
        };
        let err = import_object(&template, (0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, GeometryError::EdgeIndex { index: 7, .. }));
    }

    #[test]
    fn bad_surface_index_fails_at_import() {
        let template = Object {
            points: vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)],
            surfaces: vec![Surface(vec![0, 1, 2])],
            name: "broken".to_string(),
            ..Object::default()
        };
        let err = template.validate().unwrap_err();
        assert!(matches!(err, GeometryError::SurfaceIndex { index: 2, .. }));
    }

    #[test]
    fn axes_object_is_valid() {
        assert!(Object::axes().validate().is_ok());
    }
}
