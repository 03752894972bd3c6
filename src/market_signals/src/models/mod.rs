pub mod data_point;
pub mod date_range;
pub mod raw_record;
