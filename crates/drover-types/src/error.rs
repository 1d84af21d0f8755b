/// Errors produced while normalizing foundation types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),

    #[error("day serial out of plausible range: {0}")]
    DaySerialOutOfRange(f64),
}
