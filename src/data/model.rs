use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point2D – a single landmark
// ---------------------------------------------------------------------------

/// A 2D landmark position in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, as `sqrt(dx² + dy²)`.
    pub fn dist(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Point2D;

    fn mul(self, k: f32) -> Point2D {
        Point2D::new(self.x * k, self.y * k)
    }
}

// ---------------------------------------------------------------------------
// Rectangle – integer bounding box, top-left + extents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Geometric center computed from the bounds.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    pub fn is_square(&self) -> bool {
        self.w == self.h
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}x{}]", self.x, self.y, self.w, self.h)
    }
}

// ---------------------------------------------------------------------------
// ObjectOnImage / ImageFileMetadata – one annotated image
// ---------------------------------------------------------------------------

/// One annotated object. Landmark order is meaningful (eye, nose, mouth
/// corners, ...) and is never changed after loading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectOnImage {
    pub rect: Rectangle,
    pub landmarks: Vec<Point2D>,
}

/// All annotations for a single image file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageFileMetadata {
    pub filepath: String,
    pub objects: Vec<ObjectOnImage>,
}

impl ImageFileMetadata {
    pub fn new(filepath: impl Into<String>, objects: Vec<ObjectOnImage>) -> Self {
        Self {
            filepath: filepath.into(),
            objects,
        }
    }
}

impl From<(String, Vec<ObjectOnImage>)> for ImageFileMetadata {
    fn from((filepath, objects): (String, Vec<ObjectOnImage>)) -> Self {
        Self { filepath, objects }
    }
}
