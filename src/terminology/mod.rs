/*!
 * Terminology store for English to Arabic medical vocabulary.
 *
 * - `store`: the two priority-ordered lookup tables
 * - `seed`: built-in vocabulary used when data files cannot be loaded
 * - `loader`: JSON record file loading
 */

pub mod loader;
pub mod seed;
pub mod store;

pub use loader::{TermRecord, load_store, load_table, load_table_async, parse_records};
pub use store::{
    StoreStatus, TableSelector, TermEntry, TermMatch, TermTable, TerminologyStore, normalize_term,
};
