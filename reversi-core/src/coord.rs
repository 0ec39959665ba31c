#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevCoord {
    pub x: i32,
    pub y: i32,
}

impl RevCoord {
    pub fn new(x: i32, y: i32) -> Self {
        RevCoord { x, y }
    }

    pub fn iter_board(width: usize, height: usize) -> impl Iterator<Item = RevCoord> {
        (0..height).flat_map(move |y| (0..width).map(move |x| RevCoord::new(x as i32, y as i32)))
    }

    pub fn is_valid(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        RevCoord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn offset_dir(&self, dir: RevDir) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    pub fn try_get<'a, T>(&self, board: &'a [T], width: usize, height: usize) -> Option<&'a T> {
        if self.is_valid(width, height) {
            let index = (self.y as usize) * width + (self.x as usize);
            board.get(index)
        } else {
            None
        }
    }

    pub fn get<'a, T>(&self, board: &'a [T], width: usize, height: usize) -> &'a T {
        self.try_get(board, width, height)
            .expect("RevCoord should be valid")
    }

    pub fn try_get_mut<'a, T>(
        &self,
        board: &'a mut [T],
        width: usize,
        height: usize,
    ) -> Option<&'a mut T> {
        if self.is_valid(width, height) {
            let index = (self.y as usize) * width + (self.x as usize);
            board.get_mut(index)
        } else {
            None
        }
    }

    pub fn get_mut<'a, T>(&self, board: &'a mut [T], width: usize, height: usize) -> &'a mut T {
        self.try_get_mut(board, width, height)
            .expect("RevCoord should be valid")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevDir {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl RevDir {
    pub const ALL: [RevDir; 8] = [
        RevDir::North,
        RevDir::NorthEast,
        RevDir::East,
        RevDir::SouthEast,
        RevDir::South,
        RevDir::SouthWest,
        RevDir::West,
        RevDir::NorthWest,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            RevDir::North => (0, 1),
            RevDir::NorthEast => (1, 1),
            RevDir::East => (1, 0),
            RevDir::SouthEast => (1, -1),
            RevDir::South => (0, -1),
            RevDir::SouthWest => (-1, -1),
            RevDir::West => (-1, 0),
            RevDir::NorthWest => (-1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_bounds() {
        assert!(RevCoord::new(0, 0).is_valid(8, 6));
        assert!(RevCoord::new(7, 5).is_valid(8, 6));
        assert!(!RevCoord::new(8, 0).is_valid(8, 6));
        assert!(!RevCoord::new(0, 6).is_valid(8, 6));
        assert!(!RevCoord::new(-1, 0).is_valid(8, 6));
        assert!(!RevCoord::new(0, -1).is_valid(8, 6));
    }

    #[test]
    fn test_iter_board_covers_every_cell() {
        let coords: Vec<_> = RevCoord::iter_board(3, 2).collect();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], RevCoord::new(0, 0));
        assert_eq!(coords[2], RevCoord::new(2, 0));
        assert_eq!(coords[5], RevCoord::new(2, 1));
    }

    #[test]
    fn test_all_directions_are_distinct_unit_steps() {
        let mut seen = std::collections::HashSet::new();
        for dir in RevDir::ALL {
            let (dx, dy) = dir.delta();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
            assert!(seen.insert((dx, dy)));
        }
        assert_eq!(seen.len(), 8);
    }
}
