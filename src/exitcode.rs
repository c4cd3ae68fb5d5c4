/// Standard Unix exit codes for the tagedit CLI.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error - invalid arguments, unreadable script, rejected operation
pub const USAGE: i32 = 64;
