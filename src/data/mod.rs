/// Data layer: the record table, reading, cleaning and writing it.
///
/// Architecture:
/// ```text
///   mobile_phone_prices.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → RecordTable (types inferred per column)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean   │  drop duplicates, median/mode fill → RecordTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer  │  RecordTable → cleaned_mobile_data.csv
///   └──────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
pub mod writer;
