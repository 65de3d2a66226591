//! Pure session arithmetic.

/// Compute the student count for a room.
///
/// The broadcast group contains every member including the mentor, so the
/// count is the group size minus one when a mentor is assigned, and the
/// full group size otherwise.
pub fn student_count(member_count: usize, mentor_assigned: bool) -> usize {
    if mentor_assigned {
        member_count.saturating_sub(1)
    } else {
        member_count
    }
}
