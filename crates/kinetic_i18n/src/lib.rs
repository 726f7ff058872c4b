//! Kinetic localization
//!
//! The localization collaborator of the dashboard, specified at its boundary:
//!
//! - [`Locale`] with its [`TextDirection`]
//! - [`Catalog`] key→string lookup with fallbacks and `{name}` placeholders
//! - [`Localizer`] current locale with explicit [`LocaleChanged`] events
//! - [`format_integer`] thousands grouping per locale
//!
//! The animation toolkit only uses [`Locale`] and [`format_integer`]; it never
//! subscribes to locale changes.

pub mod catalog;
pub mod error;
pub mod format;
pub mod locale;
pub mod localizer;

pub use catalog::Catalog;
pub use error::{I18nError, Result};
pub use format::{format_integer, NumberSymbols};
pub use locale::{Locale, TextDirection};
pub use localizer::{LocaleChanged, Localizer, Subscription, SubscriptionId};
