//! API constants
//!
//! All versioned routes live under [`API_PREFIX`]; handler path annotations in
//! the OpenAPI docs use the same literal.

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version
pub const API_VERSION: &str = "v1";

/// Versioned route prefix
pub const API_PREFIX: &str = "/api/v1";

/// Multipart framing allowance on top of the maximum document size.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
