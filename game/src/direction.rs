use crate::position::PositionDelta;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub(crate) enum Dir4 {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Dir4 {
    pub(crate) fn delta(self) -> PositionDelta {
        match self {
            Dir4::Up => PositionDelta::new(0, -1),
            Dir4::Down => PositionDelta::new(0, 1),
            Dir4::Left => PositionDelta::new(-1, 0),
            Dir4::Right => PositionDelta::new(1, 0),
        }
    }

    /// Neighbor scan order shared by every grid search.
    pub(crate) fn all() -> [Self; 4] {
        [Self::Up, Self::Down, Self::Left, Self::Right]
    }

    /// Direction of a single-axis step toward `delta`.
    /// When both axes differ the larger one wins; ties go horizontal.
    /// Returns None if `delta` is zero.
    pub(crate) fn toward(delta: PositionDelta) -> Option<Self> {
        let PositionDelta { dx, dy } = delta;
        if dx == 0 && dy == 0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx < 0 { Self::Left } else { Self::Right })
        } else {
            Some(if dy < 0 { Self::Up } else { Self::Down })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toward_prefers_larger_axis_and_breaks_ties_horizontally() {
        assert_eq!(Dir4::toward(PositionDelta::new(0, 0)), None);
        assert_eq!(Dir4::toward(PositionDelta::new(3, -5)), Some(Dir4::Up));
        assert_eq!(Dir4::toward(PositionDelta::new(-5, 3)), Some(Dir4::Left));
        assert_eq!(Dir4::toward(PositionDelta::new(4, 4)), Some(Dir4::Right));
        assert_eq!(Dir4::toward(PositionDelta::new(0, 2)), Some(Dir4::Down));
    }
}
