use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game.
///
/// Movement is split in two phases so the caller can decide about growth:
/// [`Snake::advance`] pushes a new head, then exactly one of [`Snake::grow`]
/// or [`Snake::shrink`] settles the tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: VecDeque<Position>,
    /// Current direction of movement
    direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction.
    /// Extra segments are laid out behind the head, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = VecDeque::with_capacity(length.max(1));
        body.push_back(head);

        let back = direction.opposite();
        let mut prev = head;
        for _ in 1..length {
            prev = prev.moved_in_direction(back);
            body.push_back(prev);
        }

        Self { body, direction }
    }

    /// Build a snake from a head and the segments trailing it
    #[cfg(test)]
    pub(crate) fn from_segments(
        head: Position,
        tail: impl IntoIterator<Item = Position>,
        direction: Direction,
    ) -> Self {
        let mut body = VecDeque::from([head]);
        body.extend(tail);
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Change heading. A 180-degree reversal is ignored and `false` returned.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.direction.is_opposite(requested) {
            return false;
        }
        self.direction = requested;
        true
    }

    /// Where the head would land on the next advance
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Push a new head one cell along the current direction
    pub fn advance(&mut self) -> Position {
        let new_head = self.next_head();
        self.body.push_front(new_head);
        new_head
    }

    /// Keep the tail after [`Snake::advance`]; length grows by one
    pub fn grow(&mut self) {
        debug_assert!(self.body.len() >= 2, "grow called without advance");
    }

    /// Drop the tail after [`Snake::advance`]; length is unchanged
    pub fn shrink(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// True if the head sits on any other segment
    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&p| p == head)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Segments, head first
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// The set of cells the snake covers
    pub fn occupied(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Ready,
    Playing,
    Paused,
    GameOver,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Ready => "ready",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "game over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let segments: Vec<_> = snake.segments().collect();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(segments[1], Position::new(4, 5));
        assert_eq!(segments[2], Position::new(3, 5));
    }

    #[test]
    fn test_set_direction_rejects_only_reversal() {
        for current in Direction::ALL {
            for requested in Direction::ALL {
                let mut snake = Snake::new(Position::new(5, 5), current, 1);
                let accepted = snake.set_direction(requested);

                assert_eq!(accepted, !current.is_opposite(requested));
                let expected = if accepted { requested } else { current };
                assert_eq!(snake.direction(), expected);
            }
        }
    }

    #[test]
    fn test_advance_then_shrink_keeps_length() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        let head = snake.advance();
        assert_eq!(head, Position::new(6, 5));
        assert_eq!(snake.len(), 4);

        snake.shrink();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.segments().last(), Some(Position::new(4, 5)));
    }

    #[test]
    fn test_advance_then_grow_adds_segment() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 1);

        snake.advance();
        snake.grow();

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.segments().last(), Some(Position::new(5, 5)));
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,5) about to move down into (5,6), which the body occupies
        let mut snake = Snake::from_segments(
            Position::new(5, 5),
            [
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
                Position::new(4, 6),
            ],
            Direction::Down,
        );
        assert!(!snake.collides_with_self());

        snake.advance();
        snake.shrink();
        assert!(snake.collides_with_self());
    }

    #[test]
    fn test_chasing_tail_is_not_a_collision() {
        // A 2x2 loop: the head moves into the cell the tail vacates this tick
        let mut snake = Snake::from_segments(
            Position::new(5, 5),
            [Position::new(6, 5), Position::new(6, 6), Position::new(5, 6)],
            Direction::Down,
        );

        snake.advance();
        snake.shrink();
        assert!(!snake.collides_with_self());
    }

    #[test]
    fn test_occupied_cells() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(snake.contains(Position::new(5, 5))); // head
        assert!(snake.contains(Position::new(4, 5))); // body
        assert!(!snake.contains(Position::new(10, 10))); // empty
        assert_eq!(snake.occupied().len(), 3);
    }
}
