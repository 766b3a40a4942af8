//! Stack-depth step targets, the whole stepping model of the engine.

/// A pending step request, encoded as one signed stack depth.
///
/// The magnitude is the depth to compare against, the sign selects the hook
/// family that may match: a positive target arms the entering hooks, a
/// negative target arms the leaving hooks, zero arms nothing (free run).
/// Splitting enter and leave by sign is what keeps a step from suspending
/// twice on the same statement, once on its enter and again on its leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepTarget(i32);

impl StepTarget {
    /// No step pending, hooks pass through.
    pub const FREE_RUN: StepTarget = StepTarget(0);

    /// Matches the very first entered section, used to stop on entry.
    pub const ENTRY: StepTarget = StepTarget(1);

    /// Target of a step-over issued while the stack holds `stack_size`
    /// frames: the next enter at the same or a shallower depth.
    pub fn over(stack_size: u32) -> Self {
        StepTarget(stack_size as i32)
    }

    /// Target of a step-into: the next enter one level deeper than the
    /// depth this target was armed at.
    pub fn deeper(self) -> Self {
        StepTarget(self.0.abs() + 1)
    }

    /// Target of a step-out: the next leave one level shallower than the
    /// depth this target was armed at.
    pub fn shallower(self) -> Self {
        StepTarget(-(self.0.abs() - 1))
    }

    pub fn is_stepping(self) -> bool {
        self.0 != 0
    }

    /// Does entering a section leave the program at a depth this target
    /// suspends at? `stack_size` counts the entered frame.
    pub fn matches_enter(self, stack_size: u32) -> bool {
        self.0 > 0 && stack_size as i32 <= self.0
    }

    /// Does leaving a section match this target? `stack_size` still counts
    /// the frame being left.
    pub fn matches_leave(self, stack_size: u32) -> bool {
        self.0 < 0 && stack_size as i32 == -self.0
    }
}
