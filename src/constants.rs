use std::time::Duration;

// -
// Version handling

/// Version sentinel accepted by conditional writes: matches any node version.
pub const ANY_VERSION: i32 = -1;

// -
// Paths

/// Separator between the segments of a node path.
pub(crate) const PATH_SEPARATOR: char = '/';

// -
// Timing

/// Default upper bound on one store round trip.
pub(crate) const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(5_000);
