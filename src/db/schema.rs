//! Catalog statements issued on the caller's behalf.

pub(crate) mod queries {
    /// Count of tables named `?` in schema `?`.
    pub const TABLE_EXISTS: &str = r#"
        SELECT COUNT(*)
        FROM information_schema.tables
        WHERE table_schema = ? AND table_name = ?
        "#;
}
