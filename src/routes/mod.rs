//! Asset route baking: mapping virtual `assets://` URLs to mod files.

mod builder;
mod table;
mod validate;

pub use builder::RouteTableBuilder;
pub use table::RouteTable;
pub use validate::{AssetResolver, validate_routes};
