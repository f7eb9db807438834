use crate::core::color::{HexColor, palette_color};
use crate::core::types::Point;
use crate::error::{DigitizerError, DigitizerResult};

/// A named, colored curve. Point order is insertion order and defines the
/// curve direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    color: HexColor,
    points: Vec<Point>,
    visible: bool,
    use_secondary_y: bool,
}

impl Dataset {
    /// Creates an empty, visible dataset on the primary Y axis.
    pub fn new(name: impl Into<String>, color: &str) -> DigitizerResult<Self> {
        Ok(Self::with_color(name, HexColor::parse(color)?))
    }

    #[must_use]
    pub fn with_color(name: impl Into<String>, color: HexColor) -> Self {
        Self {
            name: name.into(),
            color,
            points: Vec::new(),
            visible: true,
            use_secondary_y: false,
        }
    }

    /// Creates a dataset colored by the default palette slot `index`.
    #[must_use]
    pub fn with_palette_index(name: impl Into<String>, index: usize) -> Self {
        Self::with_color(name, palette_color(index))
    }

    #[must_use]
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_secondary_y(mut self, use_secondary_y: bool) -> Self {
        self.use_secondary_y = use_secondary_y;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn color(&self) -> &HexColor {
        &self.color
    }

    pub fn set_color(&mut self, color: &str) -> DigitizerResult<()> {
        self.color = HexColor::parse(color)?;
        Ok(())
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn uses_secondary_y(&self) -> bool {
        self.use_secondary_y
    }

    pub fn set_use_secondary_y(&mut self, use_secondary_y: bool) {
        self.use_secondary_y = use_secondary_y;
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.extend(points);
    }

    pub fn insert(&mut self, index: usize, point: Point) -> DigitizerResult<()> {
        if index > self.points.len() {
            return Err(self.index_error(index));
        }
        self.points.insert(index, point);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> DigitizerResult<Point> {
        if index >= self.points.len() {
            return Err(self.index_error(index));
        }
        Ok(self.points.remove(index))
    }

    /// Replaces the point at `index`, returning the previous value.
    pub fn replace(&mut self, index: usize, point: Point) -> DigitizerResult<Point> {
        if index >= self.points.len() {
            return Err(self.index_error(index));
        }
        Ok(std::mem::replace(&mut self.points[index], point))
    }

    /// Removes the last occurrence of `point`, if any.
    pub fn remove_point(&mut self, point: Point) -> bool {
        match self.points.iter().rposition(|p| *p == point) {
            Some(index) => {
                self.points.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    fn index_error(&self, index: usize) -> DigitizerError {
        DigitizerError::InvalidData(format!(
            "point index {index} out of range for dataset `{}` ({} points)",
            self.name,
            self.points.len()
        ))
    }
}
