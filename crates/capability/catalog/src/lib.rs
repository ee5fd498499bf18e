//! 设备清单边界。
//!
//! 在加载时一次性完成字段规范化与校验，下游只看到 `DeviceRecord`。

mod catalog;
mod error;
mod normalize;
mod source;

pub use catalog::{Catalog, CatalogReport};
pub use error::CatalogError;
pub use normalize::{
    CatalogRow, DISPLAY_NAME_FIELDS, IDENTIFIER_FIELDS, REGION_FIELD, device_from_row,
    normalize_field_name, normalize_row,
};
pub use source::CatalogSource;
