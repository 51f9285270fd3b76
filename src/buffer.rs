use crate::snake::Point;

const MIN_CAPACITY: usize = 4;

/// Ordered, growable storage for the cells of a snake. Appends double the
/// capacity when the buffer is full; slots are only ever appended or
/// overwritten in place.
#[derive(Clone, Debug, Default)]
pub struct PositionBuffer {
    points: Vec<Point>,
}

impl PositionBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        PositionBuffer { points: Vec::with_capacity(capacity) }
    }

    pub fn append(&mut self, point: Point) {
        if self.points.len() == self.points.capacity() {
            let grow_by = self.points.capacity().max(MIN_CAPACITY);
            self.points.reserve_exact(grow_by);
        }

        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    pub fn get(&self, index: usize) -> Point {
        assert!(index < self.points.len(), "index out of bounds: {} >= {}", index, self.points.len());
        self.points[index]
    }

    pub fn set(&mut self, index: usize, point: Point) {
        assert!(index < self.points.len(), "index out of bounds: {} >= {}", index, self.points.len());
        self.points[index] = point;
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Frees the backing storage. The buffer stays usable: the next append
    /// allocates again.
    pub fn release(&mut self) {
        self.points = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn appends_in_order() {
        let mut buf = PositionBuffer::with_capacity(2);
        buf.append(p(0, 0));
        buf.append(p(0, 1));
        buf.append(p(0, 2));

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_slice(), &[p(0, 0), p(0, 1), p(0, 2)]);
        assert_eq!(buf.get(2), p(0, 2));
    }

    #[test]
    fn capacity_doubles_when_full() {
        let mut buf = PositionBuffer::with_capacity(6);
        let initial = buf.capacity();
        assert!(initial >= 6);

        for i in 0..initial {
            buf.append(p(0, i as i32));
        }
        assert_eq!(buf.capacity(), initial);

        buf.append(p(1, 0));
        assert!(buf.capacity() >= initial * 2);
        assert_eq!(buf.len(), initial + 1);
    }

    #[test]
    fn set_overwrites_slot() {
        let mut buf = PositionBuffer::with_capacity(4);
        buf.append(p(1, 1));
        buf.append(p(2, 2));
        buf.set(1, p(3, 3));

        assert_eq!(buf.get(0), p(1, 1));
        assert_eq!(buf.get(1), p(3, 3));
        assert!(buf.contains(&p(3, 3)));
        assert!(!buf.contains(&p(2, 2)));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn set_past_end_panics() {
        let mut buf = PositionBuffer::with_capacity(4);
        buf.append(p(0, 0));
        buf.set(1, p(0, 1));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn get_on_empty_panics() {
        PositionBuffer::with_capacity(4).get(0);
    }

    #[test]
    fn release_frees_and_allows_reuse() {
        let mut buf = PositionBuffer::with_capacity(8);
        buf.append(p(0, 0));
        buf.release();

        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);

        buf.append(p(5, 5));
        assert_eq!(buf.as_slice(), &[p(5, 5)]);
        assert!(buf.capacity() >= MIN_CAPACITY);
    }
}
