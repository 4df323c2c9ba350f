pub mod apply;
pub mod criteria;

pub use apply::{DISPLAY_LIMIT, exceeds_display_limit, filter_backup};
pub use criteria::FilterCriteria;
