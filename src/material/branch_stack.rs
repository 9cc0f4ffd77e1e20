use super::TransitionCurve;
use crate::base::{RebarError, RebarResult};
use serde::{Deserialize, Serialize};

/// Implements the bounded history of nested transition curves
///
/// The bottom (root) frame is the curve started by a reversal on an envelope. Each frame
/// above it was started by a reversal on the frame below and targets the start of that
/// frame; thus the frames alternate their direction.
///
/// When full, the oldest nested pair (frames 1 and 2) is discarded; the root frame is never evicted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchStack {
    /// Holds the frames from the root (index 0) to the active curve (last)
    frames: Vec<TransitionCurve>,

    /// Holds the maximum number of frames
    capacity: usize,

    /// Holds the direction of the root frame (+1 upwards; -1 downwards; 0 if empty)
    root_direction: f64,
}

impl BranchStack {
    /// Allocates a new instance with capacity for `max_nesting` nested pairs (plus the root frame)
    pub fn new(max_nesting: usize) -> Self {
        let capacity = 2 * usize::max(max_nesting, 1) + 1;
        BranchStack {
            frames: Vec::with_capacity(capacity),
            capacity,
            root_direction: 0.0,
        }
    }

    /// Allocates a new instance from existing frames
    pub fn from_frames(frames: Vec<TransitionCurve>, capacity: usize, root_direction: f64) -> RebarResult<Self> {
        if capacity < 3 || capacity % 2 == 0 {
            return Err(RebarError::InvalidState(format!("stack capacity = {} must be odd and ≥ 3", capacity)));
        }
        if frames.len() > capacity {
            return Err(RebarError::InvalidState(format!(
                "number of frames = {} exceeds the capacity = {}",
                frames.len(),
                capacity
            )));
        }
        let expected = if frames.is_empty() { 0.0 } else { root_direction.signum() };
        if root_direction != expected {
            return Err(RebarError::InvalidState(format!(
                "root direction = {:?} is inconsistent with {} frames",
                root_direction,
                frames.len()
            )));
        }
        let mut stack = BranchStack::new((capacity - 1) / 2);
        stack.frames.extend(frames);
        stack.root_direction = root_direction;
        Ok(stack)
    }

    /// Pushes a new frame moving in `direction`
    ///
    /// Returns true if the oldest nested pair was evicted to make room.
    pub fn push(&mut self, curve: TransitionCurve, direction: f64) -> bool {
        if self.frames.is_empty() {
            self.root_direction = direction.signum();
        }
        let evicted = self.frames.len() == self.capacity;
        if evicted {
            self.frames.drain(1..3);
        }
        self.frames.push(curve);
        evicted
    }

    /// Removes the active frame
    pub fn pop(&mut self) -> Option<TransitionCurve> {
        let curve = self.frames.pop();
        if self.frames.is_empty() {
            self.root_direction = 0.0;
        }
        curve
    }

    /// Replaces the active frame
    pub fn replace_top(&mut self, curve: TransitionCurve) {
        if let Some(top) = self.frames.last_mut() {
            *top = curve;
        }
    }

    /// Removes all frames
    pub fn clear(&mut self) {
        self.frames.clear();
        self.root_direction = 0.0;
    }

    /// Returns the active frame
    pub fn top(&self) -> Option<&TransitionCurve> {
        self.frames.last()
    }

    /// Returns the number of frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Indicates whether there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the maximum number of frames
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the direction of the root frame (+1, -1 or 0 if empty)
    pub fn root_direction(&self) -> f64 {
        self.root_direction
    }

    /// Returns all frames from the root to the active one
    pub fn frames(&self) -> &[TransitionCurve] {
        &self.frames
    }

    /// Returns the direction of the frame at `index`
    pub fn direction_of(&self, index: usize) -> f64 {
        if index % 2 == 0 {
            self.root_direction
        } else {
            -self.root_direction
        }
    }

    /// Returns the direction of the active frame (0 if empty)
    pub fn top_direction(&self) -> f64 {
        match self.frames.len() {
            0 => 0.0,
            n => self.direction_of(n - 1),
        }
    }

    /// Returns the branch id of the active frame
    ///
    /// Ids increase by two per nesting level: 3 and 4 are the first unloading from the
    /// tension and compression envelopes, 5 and 6 the first curves back, and so on.
    /// Returns 0 if empty.
    pub fn branch_id(&self) -> usize {
        if self.frames.is_empty() {
            return 0;
        }
        let parity = if self.root_direction < 0.0 { 0 } else { 1 };
        1 + 2 * self.frames.len() + parity
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::BranchStack;
    use crate::base::{RebarError, Settings};
    use crate::material::{Anchor, TransitionCurve};

    fn linear(ein: f64, eout: f64) -> TransitionCurve {
        TransitionCurve::fit(
            Anchor::new(ein, ein, 1.0),
            Anchor::new(eout, eout, 1.0),
            1.0,
            20.0,
            &Settings::new(),
        )
        .unwrap()
    }

    #[test]
    fn new_works() {
        let stack = BranchStack::new(10);
        assert_eq!(stack.capacity(), 21);
        assert_eq!(stack.depth(), 0);
        assert!(stack.is_empty());
        assert_eq!(stack.branch_id(), 0);
        assert_eq!(stack.top_direction(), 0.0);
        assert!(stack.top().is_none());
    }

    #[test]
    fn push_and_pop_work() {
        let mut stack = BranchStack::new(10);
        assert!(!stack.push(linear(0.02, -0.002), -1.0));
        assert_eq!(stack.branch_id(), 3);
        assert_eq!(stack.top_direction(), -1.0);
        stack.push(linear(0.01, 0.02), 1.0);
        assert_eq!(stack.branch_id(), 5);
        assert_eq!(stack.top_direction(), 1.0);
        stack.push(linear(0.015, 0.01), -1.0);
        assert_eq!(stack.branch_id(), 7);
        assert_eq!(stack.top().map(|c| c.ein), Some(0.015));
        stack.pop();
        stack.pop();
        assert_eq!(stack.branch_id(), 3);
        stack.pop();
        assert_eq!(stack.root_direction(), 0.0);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn compression_side_ids_are_even() {
        let mut stack = BranchStack::new(10);
        stack.push(linear(-0.02, 0.002), 1.0);
        assert_eq!(stack.branch_id(), 4);
        stack.push(linear(-0.01, -0.02), -1.0);
        assert_eq!(stack.branch_id(), 6);
    }

    #[test]
    fn push_evicts_the_oldest_nested_pair() {
        let mut stack = BranchStack::new(1);
        assert_eq!(stack.capacity(), 3);
        stack.push(linear(0.0, -1.0), -1.0);
        stack.push(linear(-0.5, 0.0), 1.0);
        stack.push(linear(-0.2, -0.5), -1.0);
        assert_eq!(stack.branch_id(), 7);
        assert!(stack.push(linear(-0.3, -0.2), 1.0));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.frames()[0].ein, 0.0);
        assert_eq!(stack.frames()[1].ein, -0.3);
        assert_eq!(stack.top_direction(), 1.0);
        assert_eq!(stack.branch_id(), 5);
    }

    #[test]
    fn replace_top_and_clear_work() {
        let mut stack = BranchStack::new(2);
        stack.push(linear(0.0, -1.0), -1.0);
        stack.replace_top(linear(-0.1, -1.0));
        assert_eq!(stack.top().map(|c| c.ein), Some(-0.1));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.root_direction(), 0.0);
    }

    #[test]
    fn from_frames_captures_errors() {
        let frames = vec![linear(0.0, -1.0)];
        assert!(matches!(
            BranchStack::from_frames(frames.clone(), 4, -1.0),
            Err(RebarError::InvalidState(_))
        ));
        assert!(matches!(
            BranchStack::from_frames(frames.clone(), 3, 0.0),
            Err(RebarError::InvalidState(_))
        ));
        assert!(matches!(
            BranchStack::from_frames(Vec::new(), 3, 1.0),
            Err(RebarError::InvalidState(_))
        ));
        let stack = BranchStack::from_frames(frames, 5, -1.0).unwrap();
        assert_eq!(stack.capacity(), 5);
        assert_eq!(stack.branch_id(), 3);
    }
}
