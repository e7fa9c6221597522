//! Device Current Resolution
//!
//! Estimates the standby and alarm current of a fire-alarm device from
//! whatever the drawing knows about it.
//!
//! # Tiers
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │ Explicit │──▶│ Catalog  │──▶│ Candela  │──▶│ Keyword  │──▶│ Default  │
//! │ currents │   │ lookup   │   │ table    │   │ match    │   │ 4 mA     │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! The first tier that produces a value wins. A tier that cannot read its
//! fields (wrong shape, unparseable number) is treated as not matching.
//!
//! # Usage
//!
//! ```rust
//! use firecalc::devices::{Device, resolve_device_current, DeviceCatalog};
//!
//! let device = Device::named("Wall Horn Strobe");
//! let (standby, alarm) = resolve_device_current(&device, &DeviceCatalog::empty());
//! assert_eq!(standby, 0.0);
//! assert!(alarm > 0.1);
//! ```

pub mod schema;
pub mod catalog;
pub mod resolver;

pub use schema::{Current, Device, DeviceFields, FieldError};
pub use catalog::{CatalogEntry, CatalogError, DeviceCatalog};
pub use resolver::{resolve_device_current, CurrentEstimate, CurrentResolver, CurrentSource};
