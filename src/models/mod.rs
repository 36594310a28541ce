//! Input Assembler - schema, field descriptors and record assembly

pub mod record;
pub mod fields;
pub mod form;


pub use record::{AggregateType, Cell, CementType, Column, InputRecord, RecordTable, COLUMNS, COLUMN_COUNT};
pub use fields::{FieldKind, FieldSpec, FIELDS};
pub use form::{collect, PredictionForm};
