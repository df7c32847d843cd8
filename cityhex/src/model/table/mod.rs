mod score_record;
mod score_table;

pub use score_record::ScoreRecord;
pub use score_table::ScoreTable;
