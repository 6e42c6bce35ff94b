//! Domain-level constants.
//!
//! Message patterns are the routing keys shared by the gateway and the
//! auth service. Both sides must agree on them byte for byte.

// =============================================================================
// Message Patterns
// =============================================================================

/// Create a new account from a signup payload
pub const CREATE_USER_PATTERN: &str = "create_user";

/// Look up an account by username
pub const GET_USER_PATTERN: &str = "get_user";

// =============================================================================
// Accounts
// =============================================================================

/// Identifier assigned to the first account in an empty directory
pub const FIRST_ACCOUNT_ID: u64 = 1;
