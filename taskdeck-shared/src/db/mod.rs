/// Database utilities
///
/// - `pool`: PostgreSQL connection pool construction

pub mod pool;
