//! Template helpers for building SQL text.
//!
//! Each macro formats its arguments with [`format!`] and submits the result
//! verbatim. Nothing is bound or escaped: quote text values with
//! [`quote`](crate::quote) before embedding them, or use the `*_with`
//! methods on [`Connection`](crate::Connection) for server-side binding.

/// Format SQL text and run it with [`Connection::query`](crate::Connection::query).
///
/// # Example
///
/// ```ignore
/// let result = xdb::query!(conn, "SELECT id FROM users WHERE id > {}", 10)?;
/// ```
#[macro_export]
macro_rules! query {
    ($conn:expr, $($fmt:tt)+) => {
        $conn.query(&::std::format!($($fmt)+))
    };
}

/// Format SQL text and run it with [`Connection::select`](crate::Connection::select).
#[macro_export]
macro_rules! select {
    ($conn:expr, $($fmt:tt)+) => {
        $conn.select(&::std::format!($($fmt)+))
    };
}

/// Format SQL text and fetch its first row with [`Connection::single`](crate::Connection::single).
#[macro_export]
macro_rules! single {
    ($conn:expr, $($fmt:tt)+) => {
        $conn.single(&::std::format!($($fmt)+))
    };
}

/// Format SQL text and fetch its first value with [`Connection::scalar`](crate::Connection::scalar).
#[macro_export]
macro_rules! scalar {
    ($conn:expr, $($fmt:tt)+) => {
        $conn.scalar(&::std::format!($($fmt)+))
    };
}
