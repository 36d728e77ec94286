/// Maximum number of search workers (primary + secondary).
///
/// The coordination protocol splits the root candidate list between exactly
/// two consumers; a larger pool would not be used.
pub const MAX_WORKERS: usize = 2;
