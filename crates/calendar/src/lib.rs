//! # spi-calendar
//!
//! Year/month arithmetic for monthly precipitation records.
//!
//! Every month maps onto a single integer ordinal (`year * 12 + month - 1`),
//! which makes chronological contiguity a plain `+1` check. Accumulation
//! windows use this to decide whether consecutive rows really are adjacent
//! months.
//!
//! ## Quick Start
//!
//! ```
//! use spi_calendar::{YearMonth, month_sequence};
//!
//! let dec = YearMonth::new(1999, 12).unwrap();
//! let jan = dec.next().unwrap();
//! assert_eq!((jan.year(), jan.month()), (2000, 1));
//! assert!(jan.is_successor_of(dec));
//!
//! let months = month_sequence(dec, 3);
//! assert_eq!(months.len(), 3);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `year_month` | Calendar month with year context |
//! | `sequence` | Contiguous month sequence generation |
//! | `error` | Error types |

mod error;
mod sequence;
mod year_month;

pub use error::CalendarError;
pub use sequence::month_sequence;
pub use year_month::YearMonth;
